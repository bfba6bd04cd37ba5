//! Bidirectional link consistency across mixed mutation sequences.

use crate::{
    ComponentIndex, ComponentKind, DocumentBuilder, EventDocument, EventId, LinkType, WordId,
    WordRange,
};

fn assert_consistent(doc: &EventDocument) {
    for (id, link) in doc.all_links() {
        let event = doc.event(link.event).expect("link event exists");
        assert!(
            event.links(link.link_type).contains(&id),
            "{:?} missing from event role list",
            id
        );
        let component = doc.component(link.component).expect("link component exists");
        assert!(
            component.component_links.contains(&id),
            "{:?} missing from component back references",
            id
        );
    }
    for event in doc.events() {
        for link_type in LinkType::ALL {
            for &id in event.links(link_type) {
                let link = doc.link(id).expect("event lists only live links");
                assert_eq!(link.link_type, link_type);
            }
        }
    }
    for (cid, component) in doc.components() {
        for &id in &component.component_links {
            assert_eq!(doc.link(id).expect("component lists only live links").component, cid);
        }
    }
}

/// The army said rebels attacked and burned the village .
fn doc() -> EventDocument {
    DocumentBuilder::new()
        .sentence(&[
            ("The", "DT"),
            ("army", "NN"),
            ("said", "VBD"),
            ("rebels", "NNS"),
            ("attacked", "VBD"),
            ("and", "CC"),
            ("burned", "VBD"),
            ("the", "DT"),
            ("village", "NN"),
            (".", "."),
        ])
        .event(2, 2, "reporting")
        .event(4, 4, "attack")
        .event(6, 6, "attack")
        .build()
        .unwrap()
}

#[test]
fn mixed_mutations_keep_both_sides_in_sync() {
    let mut doc = doc();
    let mut index = ComponentIndex::new();
    let army_span = doc.span_of_words(WordRange::new(0, 1)).unwrap();
    let rebels_span = doc.words()[3].span;
    let village_span = doc.span_of_words(WordRange::new(7, 8)).unwrap();

    let army = index
        .get_or_create(&mut doc, army_span, Some(WordId(1)), ComponentKind::Entity, "test")
        .unwrap();
    let rebels = index
        .get_or_create(&mut doc, rebels_span, Some(WordId(3)), ComponentKind::Entity, "test")
        .unwrap();
    let village = index
        .get_or_create(&mut doc, village_span, Some(WordId(8)), ComponentKind::location(), "test")
        .unwrap();

    doc.attach_link(EventId(0), army, LinkType::Agent, "test").unwrap();
    doc.attach_link(EventId(1), army, LinkType::Agent, "test").unwrap();
    assert_consistent(&doc);

    doc.replace_links(EventId(1), LinkType::Agent, &[rebels], "fix").unwrap();
    assert_consistent(&doc);

    doc.attach_link(EventId(1), village, LinkType::Patient, "test").unwrap();
    doc.copy_agents(EventId(1), EventId(2), "conj").unwrap();
    doc.copy_patients(EventId(1), EventId(2), "conj").unwrap();
    assert_consistent(&doc);

    let first_patient = doc.event(EventId(1)).unwrap().patient_links[0];
    assert_eq!(doc.remove_link(first_patient).unwrap(), None);
    assert_consistent(&doc);

    doc.delete_component(rebels).unwrap();
    assert_consistent(&doc);
    assert!(doc.event(EventId(2)).unwrap().agent_links.is_empty());
    assert_eq!(doc.linked_components(EventId(2), LinkType::Patient), vec![village]);
    assert_eq!(doc.linked_components(EventId(0), LinkType::Agent), vec![army]);
}
