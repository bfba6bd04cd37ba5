//! Closest-left noun phrase for events still missing an agent or patient.

use layered_events::{
    AnnotationResult, ComponentId, ComponentIndex, ComponentKind, DocumentResolver, EventDocument,
    EventId, LinkType, Span, WordId, WordRange,
};
use tracing::debug;

use crate::candidates::{component_for, has_entity_of_type, AGENT_ENTITY_TYPES};

const PROVENANCE: &str = "adjacency";

/// Attaches the closest preceding person/organisation noun phrase.
///
/// A phrase is eligible when it lies in the event's sentence, ends strictly
/// before the event and at most `slack + 1` words before its first word, and
/// has no punctuation or other event between itself and the event. Among
/// eligible phrases the rightmost wins. A past-participle head takes it as
/// patient, anything else as agent.
#[derive(Debug, Clone)]
pub struct AdjacencyFiller {
    slack: usize,
}

impl Default for AdjacencyFiller {
    fn default() -> Self {
        Self::new(1)
    }
}

impl AdjacencyFiller {
    pub fn new(slack: usize) -> Self {
        Self { slack }
    }

    fn sentence_of_word(doc: &EventDocument, word: usize) -> Option<usize> {
        doc.word(WordId(word)).map(|w| w.sentence)
    }

    /// Punctuation or another event between the phrase and the event.
    fn blocked(doc: &EventDocument, event: EventId, between: std::ops::Range<usize>) -> bool {
        between.into_iter().any(|i| {
            let word = WordId(i);
            doc.word(word).map_or(false, |w| w.is_punctuation())
                || doc.events_covering_word(word).iter().any(|&other| other != event)
        })
    }

    fn closest_left_phrase(&self, doc: &EventDocument, event: EventId) -> Option<Span> {
        let event_range = doc.event(event).and_then(|e| doc.word_range(e.span))?;
        let event_begin = event_range.start_idx;
        let sentence = Self::sentence_of_word(doc, event_begin)?;

        let mut phrases: Vec<(Span, WordRange)> = doc
            .noun_phrases()
            .iter()
            .filter_map(|np| doc.word_range(np.span).map(|range| (np.span, range)))
            .collect();
        phrases.sort_by_key(|(span, _)| (span.begin, span.end));

        let mut closest = None;
        for (span, range) in phrases {
            if Self::sentence_of_word(doc, range.start_idx) != Some(sentence) {
                continue;
            }
            if range.end_idx > event_begin {
                break;
            }
            if range.end_idx == event_begin {
                continue;
            }
            if event_begin - range.end_idx > self.slack + 1 {
                continue;
            }
            if Self::blocked(doc, event, range.end_idx + 1..event_begin) {
                continue;
            }
            if !has_entity_of_type(doc, span, AGENT_ENTITY_TYPES) {
                continue;
            }
            closest = Some(span);
        }
        closest
    }

    /// Last existing non-location component inside `span`.
    fn existing_component(doc: &EventDocument, span: Span) -> Option<ComponentId> {
        let mut inside: Vec<(ComponentId, Span)> = doc
            .components()
            .filter(|(_, c)| !c.kind.is_location() && span.contains(&c.span))
            .map(|(id, c)| (id, c.span))
            .collect();
        inside.sort_by_key(|(_, s)| s.begin);
        inside.last().map(|(id, _)| *id)
    }
}

impl DocumentResolver for AdjacencyFiller {
    fn name(&self) -> &'static str {
        "adjacency-filler"
    }

    fn resolve(&self, doc: &mut EventDocument) -> AnnotationResult<()> {
        let mut index = ComponentIndex::new();
        for event in doc.event_ids().collect::<Vec<_>>() {
            let Some(mention) = doc.event(event) else { continue };
            let missing_agent = !mention.has_links(LinkType::Agent);
            let missing_patient = !mention.has_links(LinkType::Patient);
            if !missing_agent && !missing_patient {
                continue;
            }
            let passive = mention
                .head_word
                .and_then(|w| doc.word(w))
                .map_or(false, |w| w.is_past_participle());

            let Some(phrase) = self.closest_left_phrase(doc, event) else { continue };
            if doc.role_overlaps(event, LinkType::Agent, phrase)
                || doc.role_overlaps(event, LinkType::Patient, phrase)
            {
                continue;
            }

            let role = if passive && missing_patient {
                LinkType::Patient
            } else if missing_agent {
                LinkType::Agent
            } else {
                continue;
            };

            let id = match Self::existing_component(doc, phrase) {
                Some(id) => id,
                None => component_for(doc, &mut index, phrase, ComponentKind::Entity, PROVENANCE)?,
            };
            debug!(?event, role = role.label(), text = doc.text_of(phrase), "adjacent phrase");
            doc.attach_link(event, id, role, PROVENANCE)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_events::DocumentBuilder;

    fn texts(doc: &EventDocument, role: LinkType) -> Vec<String> {
        doc.linked_components(EventId(0), role)
            .into_iter()
            .map(|c| doc.text_of(doc.component(c).unwrap().span).to_string())
            .collect()
    }

    #[test]
    fn closest_phrase_becomes_agent() {
        // The army and police officers attacked
        let mut doc = DocumentBuilder::new()
            .sentence(&[
                ("The", "DT"),
                ("army", "NN"),
                ("and", "CC"),
                ("police", "NN"),
                ("officers", "NNS"),
                ("attacked", "VBD"),
            ])
            .noun_phrase(0, 1)
            .noun_phrase(3, 4)
            .entity(0, 1, "ORGANIZATION")
            .entity(3, 4, "PERSON")
            .event(5, 5, "attack")
            .build()
            .unwrap();
        AdjacencyFiller::default().resolve(&mut doc).unwrap();
        assert_eq!(texts(&doc, LinkType::Agent), vec!["police officers"]);
        assert!(texts(&doc, LinkType::Patient).is_empty());
    }

    #[test]
    fn participle_head_takes_a_patient() {
        // Soldiers killed
        let mut doc = DocumentBuilder::new()
            .sentence(&[("Soldiers", "NNS"), ("killed", "VBN")])
            .noun_phrase(0, 0)
            .entity(0, 0, "PERSON")
            .event(1, 1, "attack")
            .build()
            .unwrap();
        AdjacencyFiller::default().resolve(&mut doc).unwrap();
        assert_eq!(texts(&doc, LinkType::Patient), vec!["Soldiers"]);
        assert!(texts(&doc, LinkType::Agent).is_empty());
    }

    #[test]
    fn punctuation_blocks_the_phrase() {
        // Soldiers , attacked
        let mut doc = DocumentBuilder::new()
            .sentence(&[("Soldiers", "NNS"), (",", ","), ("attacked", "VBD")])
            .noun_phrase(0, 0)
            .entity(0, 0, "PERSON")
            .event(2, 2, "attack")
            .build()
            .unwrap();
        AdjacencyFiller::default().resolve(&mut doc).unwrap();
        assert!(texts(&doc, LinkType::Agent).is_empty());
    }

    #[test]
    fn existing_components_are_reused() {
        let mut doc = DocumentBuilder::new()
            .sentence(&[("Soldiers", "NNS"), ("attacked", "VBD")])
            .noun_phrase(0, 0)
            .entity(0, 0, "PERSON")
            .event(1, 1, "attack")
            .build()
            .unwrap();
        let span = doc.words()[0].span;
        let existing = ComponentIndex::new()
            .get_or_create(&mut doc, span, Some(WordId(0)), ComponentKind::Entity, "earlier")
            .unwrap();
        AdjacencyFiller::default().resolve(&mut doc).unwrap();
        assert_eq!(doc.linked_components(EventId(0), LinkType::Agent), vec![existing]);
        assert_eq!(doc.components().count(), 1);
    }
}
