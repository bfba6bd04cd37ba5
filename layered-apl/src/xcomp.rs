//! Agent sharing across open clausal complements.

use std::collections::HashSet;

use layered_events::{
    AnnotationResult, ComponentIndex, ComponentKind, DependencyBackend, DocumentResolver,
    EventDocument, EventId, LinkType, Span, WordId,
};
use tracing::debug;

use crate::candidates::{component_for, event_head_node, has_entity_of_type, AGENT_ENTITY_TYPES};

const PROVENANCE: &str = "xcomp";

/// Gives an `xcomp` child event the agent of its governing event.
///
/// "X decided to resign": the resignation's agent is X. When a noun phrase
/// between the two verbs looks like the complement's own subject ("they
/// persuaded the police to leave") that phrase is used instead. Reporting
/// events never pass their agent down.
#[derive(Debug, Default)]
pub struct XcompPropagator;

impl XcompPropagator {
    pub fn new() -> Self {
        Self
    }

    fn xcomp_pairs(doc: &EventDocument) -> Vec<(EventId, EventId)> {
        let backend = DependencyBackend::Stanford;
        doc.graph(backend)
            .edges()
            .iter()
            .filter(|edge| edge.relation == "xcomp")
            .filter_map(|edge| {
                let head = doc.word_for_node(backend, edge.head?)?;
                let child = doc.word_for_node(backend, edge.child)?;
                let parent = doc.event_for_word(head)?;
                let child = doc.event_for_word(child)?;
                (parent != child).then_some((parent, child))
            })
            .collect()
    }

    /// Rightmost noun phrase strictly between the two events meeting at
    /// least two of: NP chunk, person/organisation mention, a word governed
    /// by the parent verb.
    fn subject_candidate(doc: &EventDocument, parent: EventId, child: EventId) -> Option<Span> {
        let backend = DependencyBackend::Stanford;
        let parent_range = doc.word_range(doc.event(parent)?.span)?;
        let child_range = doc.word_range(doc.event(child)?.span)?;
        let (first, second) = if parent_range.start_idx <= child_range.start_idx {
            (parent_range, child_range)
        } else {
            (child_range, parent_range)
        };
        let parent_node = event_head_node(doc, backend, parent);
        let graph = doc.graph(backend);

        let mut phrases: Vec<Span> = doc.noun_phrases().iter().map(|np| np.span).collect();
        phrases.extend(doc.chunks().iter().filter(|c| c.is_noun_phrase()).map(|c| c.span));
        phrases.sort_by_key(|span| (span.begin, span.end));
        phrases.dedup();

        let mut candidate = None;
        for span in phrases {
            let Some(range) = doc.word_range(span) else { continue };
            if range.start_idx <= first.end_idx || range.end_idx >= second.start_idx {
                continue;
            }
            let chunk = doc.chunks().iter().any(|c| c.is_noun_phrase() && c.span == span);
            let entity = has_entity_of_type(doc, span, AGENT_ENTITY_TYPES);
            let governed = parent_node.map_or(false, |verb| {
                range.iter().any(|i| {
                    doc.node_for_word(backend, WordId(i))
                        .and_then(|node| graph.parent(node))
                        == Some(verb)
                })
            });
            let score = [chunk, entity, governed].iter().filter(|&&hit| hit).count();
            if score >= 2 {
                candidate = Some(span);
            }
        }
        candidate
    }
}

impl DocumentResolver for XcompPropagator {
    fn name(&self) -> &'static str {
        "xcomp-propagator"
    }

    fn resolve(&self, doc: &mut EventDocument) -> AnnotationResult<()> {
        let mut index = ComponentIndex::new();
        let mut processed: HashSet<Span> = HashSet::new();

        for (parent, child) in Self::xcomp_pairs(doc) {
            let (Some(p), Some(c)) = (doc.event(parent), doc.event(child)) else { continue };
            if p.is_reporting() || c.has_links(LinkType::Agent) {
                continue;
            }
            match Self::subject_candidate(doc, parent, child) {
                None => {
                    let copied = doc.copy_agents(parent, child, PROVENANCE)?;
                    if !copied.is_empty() {
                        debug!(?parent, ?child, count = copied.len(), "shared xcomp agent");
                    }
                }
                Some(span) => {
                    if !processed.insert(span) {
                        continue;
                    }
                    let id = component_for(doc, &mut index, span, ComponentKind::Entity, PROVENANCE)?;
                    debug!(?child, text = doc.text_of(span), "xcomp subject");
                    doc.attach_link(child, id, LinkType::Agent, PROVENANCE)?;
                }
            }
        }
        Ok(())
    }
}
