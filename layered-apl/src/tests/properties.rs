//! Boundary behaviour of individual resolvers.

use layered_events::{
    ComponentIndex, ComponentKind, DocumentBuilder, DocumentResolver, EventDocument, EventId,
    LinkType, WordId,
};

use crate::{AdjacencyFiller, SlotAnalogyFiller, XcompPropagator};

fn link(doc: &mut EventDocument, event: usize, word: usize, role: LinkType) {
    let span = doc.words()[word].span;
    let id = ComponentIndex::new()
        .get_or_create(doc, span, Some(WordId(word)), ComponentKind::Entity, "test")
        .unwrap();
    doc.attach_link(EventId(event), id, role, "test").unwrap();
}

fn texts(doc: &EventDocument, event: usize, role: LinkType) -> Vec<String> {
    doc.linked_components(EventId(event), role)
        .into_iter()
        .filter_map(|c| doc.component(c))
        .map(|c| doc.text_of(c.span).to_string())
        .collect()
}

/// Ten filler nouns and an event at word 10, with a one-word person phrase
/// at `phrase`.
fn adjacency_doc(phrase: usize) -> EventDocument {
    let mut tokens = vec![("crowd", "NN"); 10];
    tokens[phrase] = ("Smith", "NNP");
    tokens.push(("attacked", "VBD"));
    DocumentBuilder::new()
        .sentence(&tokens)
        .noun_phrase(phrase, phrase)
        .entity(phrase, phrase, "PERSON")
        .event(10, 10, "attack")
        .build()
        .unwrap()
}

#[test]
fn adjacency_slack_boundary() {
    for (phrase, eligible) in [(9, true), (8, true), (7, false)] {
        let mut doc = adjacency_doc(phrase);
        AdjacencyFiller::new(1).resolve(&mut doc).unwrap();
        let agents = texts(&doc, 0, LinkType::Agent);
        assert_eq!(!agents.is_empty(), eligible, "phrase ending at word {phrase}");
    }

    let mut doc = adjacency_doc(7);
    AdjacencyFiller::new(2).resolve(&mut doc).unwrap();
    assert_eq!(texts(&doc, 0, LinkType::Agent), vec!["Smith"]);
}

#[test]
fn participle_head_takes_a_patient() {
    for (tag, role) in [("VBN", LinkType::Patient), ("VBD", LinkType::Agent)] {
        // Civilians killed
        let mut doc = DocumentBuilder::new()
            .sentence(&[("Civilians", "NNS"), ("killed", tag)])
            .noun_phrase(0, 0)
            .entity(0, 0, "PERSON")
            .event(1, 1, "kill")
            .build()
            .unwrap();
        AdjacencyFiller::default().resolve(&mut doc).unwrap();
        assert_eq!(texts(&doc, 0, role), vec!["Civilians"], "head tagged {tag}");
    }
}

#[test]
fn reporting_events_keep_their_agent() {
    for (head_type, shared) in [("report", false), ("reported-speech", false), ("other", true)] {
        // Officials said to leave
        let mut doc = DocumentBuilder::new()
            .sentence(&[("Officials", "NNS"), ("said", "VBD"), ("to", "TO"), ("leave", "VB")])
            .event(1, 1, head_type)
            .event(3, 3, "other")
            .stanford_root(1)
            .stanford(1, 0, "nsubj")
            .stanford(1, 3, "xcomp")
            .stanford(3, 2, "aux")
            .build()
            .unwrap();
        link(&mut doc, 0, 0, LinkType::Agent);
        XcompPropagator::new().resolve(&mut doc).unwrap();
        assert_eq!(
            doc.event(EventId(1)).unwrap().has_links(LinkType::Agent),
            shared,
            "head event type {head_type}"
        );
    }
}

/// Title "Soldiers Killed" with an agent on "Soldiers", then one body
/// sentence per role using "soldiers" in that role.
fn title_doc(body_roles: &[LinkType]) -> EventDocument {
    let mut builder = DocumentBuilder::new()
        .sentence(&[("Soldiers", "NNS"), ("Killed", "VBN")])
        .event(1, 1, "kill");
    for i in 0..body_roles.len() {
        let first = 2 + 3 * i;
        builder = builder
            .sentence(&[("soldiers", "NNS"), ("fell", "VBD"), (".", ".")])
            .event(first + 1, first + 1, "kill");
    }
    let mut doc = builder.build().unwrap();
    link(&mut doc, 0, 0, LinkType::Agent);
    for (i, &role) in body_roles.iter().enumerate() {
        link(&mut doc, i + 1, 2 + 3 * i, role);
    }
    doc
}

#[test]
fn title_reassignment_needs_more_patients_than_agents() {
    use LinkType::{Agent, Patient};

    let mut doc = title_doc(&[Patient, Agent, Patient, Patient]);
    SlotAnalogyFiller::new().resolve(&mut doc).unwrap();
    assert!(texts(&doc, 0, Agent).is_empty());
    assert_eq!(texts(&doc, 0, Patient), vec!["Soldiers"]);

    let mut doc = title_doc(&[Patient, Agent, Patient, Agent]);
    SlotAnalogyFiller::new().resolve(&mut doc).unwrap();
    assert_eq!(texts(&doc, 0, Agent), vec!["Soldiers"]);
    assert!(texts(&doc, 0, Patient).is_empty());
}
