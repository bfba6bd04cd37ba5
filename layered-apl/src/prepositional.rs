//! Location and time slots from prepositional attachment.

use std::collections::HashMap;

use layered_events::{
    AnnotationResult, ComponentIndex, ComponentKind, DependencyBackend, DocumentResolver,
    EventDocument, EventId, LinkType, NodeId, Span,
};
use tracing::debug;

use crate::candidates::{
    component_for, event_nodes, has_entity_of_type, lower_text, noun_phrase_around,
    LOCATION_ENTITY_TYPES, TIME_ENTITY_TYPES,
};

const PROVENANCE: &str = "prepositional";

/// Fills empty location and time slots from `prep`/`pobj` pairs (or collapsed
/// `prep_X` edges) of an event's tokens.
///
/// The object's noun phrase must hold a mention of a location type for a
/// location slot, or of a date/time type for a time slot.
#[derive(Debug, Clone)]
pub struct PrepositionalFiller {
    /// Preposition -> roles it may introduce, tried in order
    role_prepositions: HashMap<&'static str, Vec<LinkType>>,
}

impl Default for PrepositionalFiller {
    fn default() -> Self {
        Self::new()
    }
}

impl PrepositionalFiller {
    pub fn new() -> Self {
        let mut role_prepositions = HashMap::new();

        // Spatial only
        for prep in ["near", "inside", "outside", "throughout", "across", "around", "within", "into"] {
            role_prepositions.insert(prep, vec![LinkType::Location]);
        }

        // Spatial or temporal, decided by the object's entity type
        for prep in ["in", "at", "on"] {
            role_prepositions.insert(prep, vec![LinkType::Location, LinkType::Time]);
        }

        // Temporal only
        for prep in ["during", "before", "after", "since", "until"] {
            role_prepositions.insert(prep, vec![LinkType::Time]);
        }

        Self { role_prepositions }
    }

    /// `(preposition, object node)` pairs hanging off `node`.
    fn prepositional_objects(doc: &EventDocument, node: NodeId) -> Vec<(String, NodeId)> {
        let backend = DependencyBackend::Stanford;
        let graph = doc.graph(backend);
        let mut found = Vec::new();
        for edge in graph.child_edges(node) {
            if edge.relation == "prep" {
                let Some(prep) = doc
                    .word_for_node(backend, edge.child)
                    .and_then(|w| lower_text(doc, w))
                else {
                    continue;
                };
                if let Some(object) = graph.child_with_relation(edge.child, "pobj") {
                    found.push((prep, object));
                }
            } else if let Some(prep) = edge.relation.strip_prefix("prep_") {
                found.push((prep.to_lowercase(), edge.child));
            }
        }
        found
    }

    fn candidates(&self, doc: &EventDocument, event: EventId) -> Vec<(LinkType, Span)> {
        let backend = DependencyBackend::Stanford;
        let Some(event_span) = doc.event(event).map(|e| e.span) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        for node in event_nodes(doc, backend, event) {
            for (prep, object) in Self::prepositional_objects(doc, node) {
                let Some(roles) = self.role_prepositions.get(prep.as_str()) else { continue };
                let Some(phrase) = doc
                    .word_for_node(backend, object)
                    .and_then(|w| noun_phrase_around(doc, w, event_span))
                else {
                    continue;
                };
                if phrase.overlaps(&event_span) {
                    continue;
                }
                let role = roles.iter().copied().find(|role| {
                    let types = match role {
                        LinkType::Time => TIME_ENTITY_TYPES,
                        _ => LOCATION_ENTITY_TYPES,
                    };
                    has_entity_of_type(doc, phrase, types)
                });
                if let Some(role) = role {
                    found.push((role, phrase));
                }
            }
        }
        found
    }
}

impl DocumentResolver for PrepositionalFiller {
    fn name(&self) -> &'static str {
        "prepositional-filler"
    }

    fn resolve(&self, doc: &mut EventDocument) -> AnnotationResult<()> {
        let mut index = ComponentIndex::new();
        for event in doc.event_ids().collect::<Vec<_>>() {
            for (role, phrase) in self.candidates(doc, event) {
                if doc.event(event).map_or(true, |e| e.has_links(role)) {
                    continue;
                }
                let kind = match role {
                    LinkType::Location => ComponentKind::location(),
                    _ => ComponentKind::Entity,
                };
                let id = component_for(doc, &mut index, phrase, kind, PROVENANCE)?;
                debug!(?event, role = role.label(), text = doc.text_of(phrase), "prepositional slot");
                doc.attach_link(event, id, role, PROVENANCE)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_events::DocumentBuilder;

    fn role_text(doc: &EventDocument, role: LinkType) -> Vec<String> {
        doc.linked_components(EventId(0), role)
            .into_iter()
            .map(|c| doc.text_of(doc.component(c).unwrap().span).to_string())
            .collect()
    }

    /// Rebels attacked the town in Syria on Monday
    fn attack() -> DocumentBuilder {
        DocumentBuilder::new()
            .sentence(&[
                ("Rebels", "NNS"),
                ("attacked", "VBD"),
                ("the", "DT"),
                ("town", "NN"),
                ("in", "IN"),
                ("Syria", "NNP"),
                ("on", "IN"),
                ("Monday", "NNP"),
            ])
            .noun_phrase(2, 3)
            .entity(5, 5, "COUNTRY")
            .entity(7, 7, "DATE")
            .event(1, 1, "attack")
            .stanford(1, 3, "dobj")
            .stanford(1, 5, "prep_in")
            .stanford(1, 6, "prep")
            .stanford(6, 7, "pobj")
    }

    #[test]
    fn collapsed_and_basic_prepositions() {
        let mut doc = attack().build().unwrap();
        PrepositionalFiller::new().resolve(&mut doc).unwrap();

        assert_eq!(role_text(&doc, LinkType::Location), vec!["Syria"]);
        assert_eq!(role_text(&doc, LinkType::Time), vec!["Monday"]);
        let location = doc.linked_components(EventId(0), LinkType::Location)[0];
        assert!(doc.component(location).unwrap().kind.is_location());
    }

    #[test]
    fn filled_slots_are_left_alone() {
        let mut doc = attack().build().unwrap();
        PrepositionalFiller::new().resolve(&mut doc).unwrap();
        PrepositionalFiller::new().resolve(&mut doc).unwrap();
        assert_eq!(role_text(&doc, LinkType::Location).len(), 1);
        assert_eq!(role_text(&doc, LinkType::Time).len(), 1);
    }

    #[test]
    fn objects_without_typed_mentions_are_ignored() {
        // Rebels attacked in the night
        let mut doc = DocumentBuilder::new()
            .sentence(&[("Rebels", "NNS"), ("attacked", "VBD"), ("in", "IN"), ("the", "DT"), ("night", "NN")])
            .noun_phrase(3, 4)
            .event(1, 1, "attack")
            .stanford(1, 2, "prep")
            .stanford(2, 4, "pobj")
            .build()
            .unwrap();
        PrepositionalFiller::new().resolve(&mut doc).unwrap();
        assert!(role_text(&doc, LinkType::Location).is_empty());
        assert!(role_text(&doc, LinkType::Time).is_empty());
    }
}
