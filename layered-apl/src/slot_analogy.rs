//! Role filling by analogy with slots filled elsewhere in the document.
//!
//! Every agent, patient and location filler outside the title sentence is
//! recorded under its normalised surface form, together with the surface
//! forms of informative mentions coreferent with it. Those records then
//!
//! - flip a passive-looking title's agent to patient when the body uses the
//!   same words more often as a patient than as an agent, and
//! - fill empty slots with noun phrases whose surface form matches a record
//!   of the same role and event type.
//!
//! Which slots are empty is read from the event's link lists each time, so
//! the filling step already sees a Patient moved there by the title step.

use std::collections::HashSet;

use layered_events::{
    AnnotationResult, ComponentIndex, ComponentKind, DocumentResolver, EventDocument, EventId,
    LinkId, LinkType, Span,
};
use tracing::debug;

use crate::candidates::{component_for, normalize_surface};

const PROVENANCE: &str = "slot-analogy";
const TITLE_PROVENANCE: &str = "slot-analogy-title";

/// Longest informative mention, in words.
const MAX_INFORMATIVE_WORDS: usize = 4;

const RECORDED_ROLES: [LinkType; 3] = [LinkType::Agent, LinkType::Patient, LinkType::Location];

/// One observation of a surface form filling a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SurfaceRecord {
    form: String,
    link_type: LinkType,
    event_type: String,
    sentence: usize,
    event: EventId,
}

#[derive(Debug, Default)]
pub struct SlotAnalogyFiller;

impl SlotAnalogyFiller {
    pub fn new() -> Self {
        Self
    }

    fn event_sentence(doc: &EventDocument, event: EventId) -> Option<usize> {
        doc.event(event).and_then(|e| doc.sentence_of(e.span))
    }

    /// Named, non-date mention of at most four words that contains a noun.
    fn is_informative(doc: &EventDocument, span: Span, entity_type: Option<&str>) -> bool {
        let Some(entity_type) = entity_type else { return false };
        if entity_type == "DATE" {
            return false;
        }
        let words: Vec<_> = doc.words_of(span).collect();
        words.len() <= MAX_INFORMATIVE_WORDS && words.iter().any(|w| w.is_noun())
    }

    /// Surface forms of informative mentions clustered with any mention
    /// overlapping `span`.
    fn alternate_forms(doc: &EventDocument, span: Span) -> Vec<String> {
        let mut forms = Vec::new();
        for mention in doc.entity_mentions().iter().filter(|m| m.span.overlaps(&span)) {
            let Some(cluster) = mention.cluster.and_then(|c| doc.cluster(c)) else { continue };
            for &mate in &cluster.mentions {
                let Some(mate) = doc.entity_mention(mate) else { continue };
                if !Self::is_informative(doc, mate.span, mate.entity_type.as_deref()) {
                    continue;
                }
                let form = normalize_surface(doc.text_of(mate.span));
                if !forms.contains(&form) {
                    forms.push(form);
                }
            }
        }
        forms
    }

    fn records(doc: &EventDocument) -> Vec<SurfaceRecord> {
        let mut records = Vec::new();
        for event in doc.event_ids() {
            let Some(sentence) = Self::event_sentence(doc, event) else { continue };
            if sentence == 0 {
                continue;
            }
            let Some(event_type) = doc.event(event).map(|e| e.event_type.clone()) else { continue };
            for link_type in RECORDED_ROLES {
                for component in doc.linked_components(event, link_type) {
                    let Some(span) = doc.component(component).map(|c| c.span) else { continue };
                    let mut forms = vec![normalize_surface(doc.text_of(span))];
                    for alternate in Self::alternate_forms(doc, span) {
                        if !forms.contains(&alternate) {
                            forms.push(alternate);
                        }
                    }
                    for form in forms {
                        records.push(SurfaceRecord {
                            form,
                            link_type,
                            event_type: event_type.clone(),
                            sentence,
                            event,
                        });
                    }
                }
            }
        }
        records
    }

    // ========================================================================
    // Title reassignment
    // ========================================================================

    fn looks_passive(doc: &EventDocument, event: EventId) -> bool {
        doc.event(event).map_or(false, |e| {
            doc.words_of(e.span)
                .any(|w| w.is_past_participle() || w.is_past_tense())
        })
    }

    fn substring_match(a: &str, b: &str) -> bool {
        a.contains(b) || b.contains(a)
    }

    fn reassign_title_roles(
        doc: &mut EventDocument,
        index: &mut ComponentIndex,
        records: &[SurfaceRecord],
    ) -> AnnotationResult<()> {
        for event in doc.event_ids().collect::<Vec<_>>() {
            if Self::event_sentence(doc, event) != Some(0) || !Self::looks_passive(doc, event) {
                continue;
            }
            let Some(mention) = doc.event(event) else { continue };
            let event_type = mention.event_type.clone();
            let agent_links: Vec<LinkId> = mention.agent_links.clone();

            for link in agent_links {
                let Some(component) = doc.link(link).map(|l| l.component) else { continue };
                let Some(span) = doc.component(component).map(|c| c.span) else { continue };
                let form = normalize_surface(doc.text_of(span));
                let count = |role: LinkType| {
                    records
                        .iter()
                        .filter(|r| r.link_type == role && r.event_type == event_type)
                        .filter(|r| Self::substring_match(&r.form, &form))
                        .count()
                };
                let (agents, patients) = (count(LinkType::Agent), count(LinkType::Patient));
                if patients <= agents {
                    continue;
                }

                debug!(?event, text = %form, agents, patients, "title agent reassigned to patient");
                if !doc.role_overlaps(event, LinkType::Patient, span) {
                    let head = doc.component(component).and_then(|c| c.head_word);
                    let patient = index.get_or_create(doc, span, head, ComponentKind::Entity, TITLE_PROVENANCE)?;
                    doc.attach_link(event, patient, LinkType::Patient, TITLE_PROVENANCE)?;
                }
                if let Some(orphan) = doc.remove_link(link)? {
                    doc.delete_component(orphan)?;
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Filling
    // ========================================================================

    fn word_distance(doc: &EventDocument, a: Span, b: Span) -> Option<usize> {
        let a = doc.word_range(a)?;
        let b = doc.word_range(b)?;
        Some(if a.end_idx < b.start_idx {
            b.start_idx - a.end_idx
        } else {
            a.start_idx.saturating_sub(b.end_idx)
        })
    }

    /// Closest noun phrase of the event's sentence matching a record for
    /// `role`.
    fn analogous_phrase(
        doc: &EventDocument,
        event: EventId,
        role: LinkType,
        records: &[SurfaceRecord],
    ) -> Option<Span> {
        let mention = doc.event(event)?;
        let sentence = doc.sentence_of(mention.span)?;
        let forms: HashSet<&str> = records
            .iter()
            .filter(|r| r.link_type == role && r.event_type == mention.event_type)
            .filter(|r| match role {
                LinkType::Location => r.event != event,
                _ => r.sentence < sentence,
            })
            .map(|r| r.form.as_str())
            .collect();
        if forms.is_empty() {
            return None;
        }

        doc.noun_phrases()
            .iter()
            .map(|np| np.span)
            .filter(|span| doc.sentence_of(*span) == Some(sentence) && !span.overlaps(&mention.span))
            .filter(|span| forms.contains(normalize_surface(doc.text_of(*span)).as_str()))
            .filter_map(|span| Self::word_distance(doc, span, mention.span).map(|d| (d, span)))
            .min_by_key(|(distance, span)| (*distance, span.begin))
            .map(|(_, span)| span)
    }

    fn fill_missing_roles(
        doc: &mut EventDocument,
        index: &mut ComponentIndex,
        records: &[SurfaceRecord],
    ) -> AnnotationResult<()> {
        for event in doc.event_ids().collect::<Vec<_>>() {
            for role in RECORDED_ROLES {
                if doc.event(event).map_or(true, |e| e.has_links(role)) {
                    continue;
                }
                let Some(span) = Self::analogous_phrase(doc, event, role, records) else { continue };
                let conflict = match role {
                    LinkType::Agent => doc.role_overlaps(event, LinkType::Patient, span),
                    LinkType::Patient => doc.role_overlaps(event, LinkType::Agent, span),
                    _ => false,
                };
                if conflict {
                    continue;
                }
                let kind = match role {
                    LinkType::Location => ComponentKind::location(),
                    _ => ComponentKind::Entity,
                };
                let id = component_for(doc, index, span, kind, PROVENANCE)?;
                debug!(?event, role = role.label(), text = doc.text_of(span), "slot filled by analogy");
                doc.attach_link(event, id, role, PROVENANCE)?;
            }
        }
        Ok(())
    }
}

impl DocumentResolver for SlotAnalogyFiller {
    fn name(&self) -> &'static str {
        "slot-analogy-filler"
    }

    fn resolve(&self, doc: &mut EventDocument) -> AnnotationResult<()> {
        let records = Self::records(doc);
        if records.is_empty() {
            return Ok(());
        }
        let mut index = ComponentIndex::new();
        Self::reassign_title_roles(doc, &mut index, &records)?;
        Self::fill_missing_roles(doc, &mut index, &records)
    }
}
