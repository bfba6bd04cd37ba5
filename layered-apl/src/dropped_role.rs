//! Recover omitted agents from governing events.

use std::collections::HashSet;

use layered_events::{
    AnnotationResult, DependencyBackend, DocumentResolver, EventDocument, EventId, LinkType,
};
use tracing::debug;

use crate::candidates::event_head_node;

const PROVENANCE: &str = "dropped-role";

/// Climbs the Fanse head chain of every agentless event and copies the
/// agents of the first compatible governing event that has some.
///
/// Event types are compatible when equal, or when the lower event is typed
/// `other`. Climbing stops at the first incompatible event.
#[derive(Debug, Default)]
pub struct DroppedRoleFiller;

impl DroppedRoleFiller {
    pub fn new() -> Self {
        Self
    }

    fn compatible(lower: &str, upper: &str) -> bool {
        lower == upper || lower == "other"
    }

    fn donor(doc: &EventDocument, event: EventId) -> Option<EventId> {
        let backend = DependencyBackend::Fanse;
        let graph = doc.graph(backend);
        let event_type = doc.event(event)?.event_type.as_str();
        let mut node = event_head_node(doc, backend, event)?;
        let mut visited = HashSet::from([node]);

        while let Some(parent) = graph.parent(node) {
            if !visited.insert(parent) {
                break;
            }
            node = parent;
            let Some(ancestor) = doc
                .word_for_node(backend, node)
                .and_then(|w| doc.event_for_word(w))
            else {
                continue;
            };
            if ancestor == event {
                continue;
            }
            let mention = doc.event(ancestor)?;
            if !Self::compatible(event_type, &mention.event_type) {
                return None;
            }
            if mention.has_links(LinkType::Agent) {
                return Some(ancestor);
            }
        }
        None
    }
}

impl DocumentResolver for DroppedRoleFiller {
    fn name(&self) -> &'static str {
        "dropped-role-filler"
    }

    fn resolve(&self, doc: &mut EventDocument) -> AnnotationResult<()> {
        for event in doc.event_ids().collect::<Vec<_>>() {
            if doc.event(event).map_or(true, |e| e.has_links(LinkType::Agent)) {
                continue;
            }
            if let Some(donor) = Self::donor(doc, event) {
                debug!(?event, ?donor, "dropped agent recovered");
                doc.copy_agents(donor, event, PROVENANCE)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_events::{ComponentIndex, ComponentKind, DocumentBuilder, WordId};

    /// Rebels attacked the village , burning houses
    fn doc(attack: &str, burning: &str) -> EventDocument {
        let mut doc = DocumentBuilder::new()
            .sentence(&[
                ("Rebels", "NNS"),
                ("attacked", "VBD"),
                ("the", "DT"),
                ("village", "NN"),
                (",", ","),
                ("burning", "VBG"),
                ("houses", "NNS"),
            ])
            .event(1, 1, attack)
            .event(5, 5, burning)
            .fanse_root(1)
            .fanse(1, 0, "nsubj")
            .fanse(1, 3, "dobj")
            .fanse(3, 5, "partmod")
            .fanse(5, 6, "dobj")
            .build()
            .unwrap();
        let span = doc.words()[0].span;
        let id = ComponentIndex::new()
            .get_or_create(&mut doc, span, Some(WordId(0)), ComponentKind::Entity, "test")
            .unwrap();
        doc.attach_link(EventId(0), id, LinkType::Agent, "test").unwrap();
        doc
    }

    #[test]
    fn agent_is_copied_through_intermediate_words() {
        let mut doc = doc("attack", "attack");
        DroppedRoleFiller::new().resolve(&mut doc).unwrap();
        assert_eq!(
            doc.linked_components(EventId(1), LinkType::Agent),
            doc.linked_components(EventId(0), LinkType::Agent)
        );
    }

    #[test]
    fn other_events_inherit_from_concrete_ones() {
        let mut doc = doc("attack", "other");
        DroppedRoleFiller::new().resolve(&mut doc).unwrap();
        assert_eq!(doc.linked_components(EventId(1), LinkType::Agent).len(), 1);
    }

    #[test]
    fn diverging_types_stop_the_climb() {
        let mut doc = doc("attack", "arrest");
        DroppedRoleFiller::new().resolve(&mut doc).unwrap();
        assert!(doc.linked_components(EventId(1), LinkType::Agent).is_empty());
    }
}
