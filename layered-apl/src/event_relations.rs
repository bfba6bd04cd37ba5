//! Event-to-event relations from the Stanford parse.

use layered_events::{AnnotationResult, DependencyBackend, DocumentResolver, EventDocument, EventId};
use tracing::debug;

/// Adds a `conj*` or `xcomp` [`EventRelation`](layered_events::EventRelation)
/// for every Stanford edge joining two distinct event mentions.
#[derive(Debug, Default)]
pub struct EventRelationAnnotator;

impl EventRelationAnnotator {
    pub fn new() -> Self {
        Self
    }

    fn is_event_relation(relation: &str) -> bool {
        relation.starts_with("conj") || relation == "xcomp"
    }
}

impl DocumentResolver for EventRelationAnnotator {
    fn name(&self) -> &'static str {
        "event-relations"
    }

    fn resolve(&self, doc: &mut EventDocument) -> AnnotationResult<()> {
        let backend = DependencyBackend::Stanford;
        let mut found: Vec<(EventId, EventId, String)> = Vec::new();
        for edge in doc.graph(backend).edges() {
            let Some(head) = edge.head else { continue };
            if !Self::is_event_relation(&edge.relation) {
                continue;
            }
            let head_event = doc
                .word_for_node(backend, head)
                .and_then(|w| doc.event_for_word(w));
            let child_event = doc
                .word_for_node(backend, edge.child)
                .and_then(|w| doc.event_for_word(w));
            if let (Some(h), Some(c)) = (head_event, child_event) {
                if h != c {
                    found.push((h, c, edge.relation.clone()));
                }
            }
        }

        for (head, child, relation_type) in found {
            let exists = doc.event_relations().iter().any(|r| {
                r.head == head && r.child == child && r.relation_type == relation_type
            });
            if !exists {
                debug!(?head, ?child, relation_type = %relation_type, "event relation");
                doc.add_event_relation(head, child, relation_type);
            }
        }
        Ok(())
    }
}
