//! End-to-end runs of the standard pipeline.

use layered_events::{DocumentBuilder, EventDocument, EventId, LinkType, SentenceDisplay};

use crate::Pipeline;

fn texts(doc: &EventDocument, event: usize, role: LinkType) -> Vec<String> {
    doc.linked_components(EventId(event), role)
        .into_iter()
        .filter_map(|c| doc.component(c))
        .map(|c| doc.text_of(c.span).to_string())
        .collect()
}

#[test]
fn semantic_roles_with_quantity() {
    // The bombing killed 12 people .
    let mut doc = DocumentBuilder::new()
        .sentence(&[
            ("The", "DT"),
            ("bombing", "NN"),
            ("killed", "VBD"),
            ("12", "CD"),
            ("people", "NNS"),
            (".", "."),
        ])
        .noun_phrase(0, 1)
        .noun_phrase(3, 4)
        .event(2, 2, "attack")
        .semantic(2, 1, "ARG0")
        .semantic(2, 4, "ARG1")
        .build()
        .unwrap();

    Pipeline::standard().run(&mut doc).unwrap();

    assert_eq!(texts(&doc, 0, LinkType::Agent), vec!["The bombing"]);
    assert_eq!(texts(&doc, 0, LinkType::Patient), vec!["12 people"]);
    let patient = doc.linked_components(EventId(0), LinkType::Patient)[0];
    assert_eq!(doc.component(patient).unwrap().quantity.as_deref(), Some("12"));

    insta::assert_snapshot!(SentenceDisplay::new(&doc, 0).with_events().with_links(), @r###"
    The  bombing  killed  12  people  .
                  ╰────╯Event(attack)
    ╰──────────╯Agent(killed)
                          ╰────────╯Patient(killed)
    "###);
}

#[test]
fn complement_clause_shares_the_agent() {
    // John decided to resign .
    let mut doc = DocumentBuilder::new()
        .sentence(&[
            ("John", "NNP"),
            ("decided", "VBD"),
            ("to", "TO"),
            ("resign", "VB"),
            (".", "."),
        ])
        .entity(0, 0, "PERSON")
        .event(1, 1, "other")
        .event(3, 3, "other")
        .stanford_root(1)
        .stanford(1, 0, "nsubj")
        .stanford(1, 3, "xcomp")
        .stanford(3, 2, "aux")
        .semantic(1, 0, "ARG0")
        .build()
        .unwrap();

    Pipeline::standard().run(&mut doc).unwrap();

    let decided = doc.linked_components(EventId(0), LinkType::Agent);
    assert_eq!(decided.len(), 1);
    assert_eq!(doc.linked_components(EventId(1), LinkType::Agent), decided);
    assert_eq!(doc.components().count(), 1);
    assert_eq!(doc.event_relations().len(), 1);

    insta::assert_snapshot!(SentenceDisplay::new(&doc, 0).with_events().with_links(), @r###"
    John  decided  to  resign  .
          ╰─────╯Event(other)
                       ╰────╯Event(other)
    ╰──╯Agent(decided)
    ╰──╯Agent(resign)
    "###);
}

#[test]
fn title_agent_reassigned_from_body_evidence() {
    // 0: Dozens Killed In Attack
    // 1: Rebels killed dozens of people .
    // 2: Dozens of civilians were killed .
    let mut doc = DocumentBuilder::new()
        .sentence(&[("Dozens", "NNS"), ("Killed", "VBN"), ("In", "IN"), ("Attack", "NN")])
        .sentence(&[
            ("Rebels", "NNS"),
            ("killed", "VBD"),
            ("dozens", "NNS"),
            ("of", "IN"),
            ("people", "NNS"),
            (".", "."),
        ])
        .sentence(&[
            ("Dozens", "NNS"),
            ("of", "IN"),
            ("civilians", "NNS"),
            ("were", "VBD"),
            ("killed", "VBN"),
            (".", "."),
        ])
        .noun_phrase(0, 0)
        .noun_phrase(4, 4)
        .noun_phrase(6, 8)
        .noun_phrase(10, 12)
        .event(1, 1, "kill")
        .event(5, 5, "kill")
        .event(14, 14, "kill")
        // the parser reads the headline as active voice
        .semantic(1, 0, "ARG0")
        .semantic(5, 4, "ARG0")
        .semantic(5, 6, "ARG1")
        .semantic(14, 10, "ARG1")
        .build()
        .unwrap();

    Pipeline::standard().run(&mut doc).unwrap();

    assert!(texts(&doc, 0, LinkType::Agent).is_empty());
    assert_eq!(texts(&doc, 0, LinkType::Patient), vec!["Dozens"]);
    assert_eq!(texts(&doc, 1, LinkType::Agent), vec!["Rebels"]);
    assert_eq!(texts(&doc, 1, LinkType::Patient), vec!["dozens of people"]);
    assert_eq!(texts(&doc, 2, LinkType::Patient), vec!["Dozens of civilians"]);

    insta::assert_snapshot!(SentenceDisplay::new(&doc, 0).with_events().with_links(), @r###"
    Dozens  Killed  In  Attack
            ╰────╯Event(kill)
    ╰────╯Patient(Killed)
    "###);
}
