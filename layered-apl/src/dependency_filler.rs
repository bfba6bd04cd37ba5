//! Agent/patient assignment from dependency and semantic-role evidence.
//!
//! Five passes run in order over one [`ComponentIndex`]:
//!
//! 1. Semantic roles: `ARG0*`/`ARG1*` relations on the Fanse graph. Where
//!    they exist they replace the event's agent or patient list.
//! 2. Prepositions: `between X and Y` adds agents, `by X` replaces them.
//! 3. Modifiers: `*mod` neighbours holding a person or organisation are
//!    appended as agents.
//! 4. Possessives and compounds on nominal events replace the agent list,
//!    possessives taking precedence.
//! 5. Conjunction: conjoined events of the target type share missing
//!    agents and patients.

use std::collections::HashMap;

use layered_events::{
    AnnotationResult, ComponentId, ComponentIndex, ComponentKind, CoverIndex, DependencyBackend,
    DocumentResolver, EventDocument, EventId, LinkType, NodeId, Span, WordId,
};
use tracing::debug;

use crate::candidates::{
    chunk_around, component_for, event_nodes, has_entity_of_type, lower_text, noun_phrase_around,
    valid_agents_in_range, AGENT_ENTITY_TYPES,
};

const SEMANTIC_ROLE: &str = "dependency-srl";
const BETWEEN: &str = "dependency-between";
const BY: &str = "dependency-by";
const MODIFIER: &str = "dependency-modifier";
const POSSESSIVE: &str = "dependency-possessive";
const COMPOUND: &str = "dependency-compound";
const CONJUNCTION: &str = "conj-propagation";

/// A prepositional agent found by the between/by pass.
enum PrepositionalAgent {
    Between {
        event: EventId,
        first: Span,
        second: Option<Span>,
    },
    By {
        event: EventId,
        span: Span,
    },
}

#[derive(Debug, Clone)]
pub struct DependencyFiller {
    target_event_type: String,
}

impl Default for DependencyFiller {
    fn default() -> Self {
        Self::new("event")
    }
}

impl DependencyFiller {
    pub fn new(target_event_type: impl Into<String>) -> Self {
        Self {
            target_event_type: target_event_type.into(),
        }
    }

    // ========================================================================
    // 1. Semantic roles
    // ========================================================================

    /// Argument node standing for the filler: punctuation is dropped and a
    /// passive `by` is replaced by its prepositional object.
    fn resolve_argument(doc: &EventDocument, node: NodeId) -> Option<NodeId> {
        let backend = DependencyBackend::Fanse;
        let word = doc.word_for_node(backend, node)?;
        if doc.word(word)?.is_punctuation() {
            return None;
        }
        if lower_text(doc, word)? == "by" {
            let object = doc.graph(backend).child_with_relation(node, "pobj")?;
            let object_word = doc.word_for_node(backend, object)?;
            if doc.word(object_word)?.is_punctuation() {
                return None;
            }
            return Some(object);
        }
        Some(node)
    }

    fn semantic_role_pass(&self, doc: &mut EventDocument, index: &mut ComponentIndex) -> AnnotationResult<()> {
        let backend = DependencyBackend::Fanse;
        let mut agents: HashMap<NodeId, NodeId> = HashMap::new();
        let mut patients: HashMap<NodeId, NodeId> = HashMap::new();
        for relation in doc.graph(backend).semantic_relations() {
            let (label, inverted) = match relation.label.strip_suffix("-INVERTED") {
                Some(label) => (label, true),
                None => (relation.label.as_str(), false),
            };
            let (predicate, argument) = if inverted {
                (relation.argument, relation.predicate)
            } else {
                (relation.predicate, relation.argument)
            };
            let target = if label.starts_with("ARG0") {
                &mut agents
            } else if label.starts_with("ARG1") {
                &mut patients
            } else {
                continue;
            };
            if let Some(argument) = Self::resolve_argument(doc, argument) {
                target.insert(predicate, argument);
            }
        }
        if agents.is_empty() && patients.is_empty() {
            return Ok(());
        }

        for event in doc.event_ids().collect::<Vec<_>>() {
            let Some(span) = doc.event(event).map(|e| e.span) else { continue };
            let nodes = doc.nodes_for_span(backend, span);
            for (map, link_type) in [(&agents, LinkType::Agent), (&patients, LinkType::Patient)] {
                let mut found: Vec<ComponentId> = Vec::new();
                for node in &nodes {
                    let Some(&argument) = map.get(node) else { continue };
                    let Some(word) = doc.word_for_node(backend, argument) else { continue };
                    let Some(phrase) = noun_phrase_around(doc, word, span) else { continue };
                    if phrase.overlaps(&span) {
                        continue;
                    }
                    let id = component_for(doc, index, phrase, ComponentKind::Entity, SEMANTIC_ROLE)?;
                    if !found.contains(&id) {
                        found.push(id);
                    }
                }
                if !found.is_empty() {
                    debug!(?event, role = link_type.label(), count = found.len(), "semantic role evidence");
                    doc.replace_links(event, link_type, &found, SEMANTIC_ROLE)?;
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // 2. between / by
    // ========================================================================

    /// First conjunct -> second conjunct, for coordinations with "and".
    fn and_partners(doc: &EventDocument) -> HashMap<NodeId, NodeId> {
        let backend = DependencyBackend::Stanford;
        let graph = doc.graph(backend);
        let mut partners = HashMap::new();
        for (i, word) in doc.words().iter().enumerate() {
            if !word.text.eq_ignore_ascii_case("and") {
                continue;
            }
            let Some(node) = doc.node_for_word(backend, WordId(i)) else { continue };
            for edge in graph.head_edges(node) {
                if edge.relation != "cc" {
                    continue;
                }
                let Some(first) = edge.head else { continue };
                if let Some(second) = graph.children_where(first, |r| r.starts_with("conj")).next() {
                    partners.insert(first, second);
                }
            }
        }
        partners
    }

    /// Event a preposition's governor belongs to: one covering the word,
    /// else one inside the word's noun-phrase chunk.
    fn attaching_event(doc: &EventDocument, word: WordId) -> Option<EventId> {
        doc.event_for_word(word).or_else(|| {
            let chunk = chunk_around(doc, word)?;
            doc.event_ids()
                .find(|&id| doc.event(id).map_or(false, |e| chunk.overlaps(&e.span)))
        })
    }

    fn prepositional_agents(doc: &EventDocument) -> Vec<PrepositionalAgent> {
        let backend = DependencyBackend::Stanford;
        let graph = doc.graph(backend);
        let partners = Self::and_partners(doc);
        let mut found = Vec::new();

        for i in 0..doc.words().len() {
            let word = WordId(i);
            let Some(text) = lower_text(doc, word) else { continue };
            if text != "between" && text != "by" {
                continue;
            }
            let Some(node) = doc.node_for_word(backend, word) else { continue };
            let Some(head) = graph.parent(node) else { continue };
            let Some(event) = doc
                .word_for_node(backend, head)
                .and_then(|w| Self::attaching_event(doc, w))
            else {
                continue;
            };
            let Some(event_span) = doc.event(event).map(|e| e.span) else { continue };
            let Some(object) = graph.child_with_relation(node, "pobj") else { continue };
            let Some(phrase) = doc
                .word_for_node(backend, object)
                .and_then(|w| noun_phrase_around(doc, w, event_span))
            else {
                continue;
            };
            if phrase.overlaps(&event_span) {
                continue;
            }

            if text == "between" {
                let second = partners
                    .get(&object)
                    .and_then(|&partner| doc.word_for_node(backend, partner))
                    .and_then(|w| noun_phrase_around(doc, w, event_span))
                    .filter(|span| !span.overlaps(&event_span));
                found.push(PrepositionalAgent::Between {
                    event,
                    first: phrase,
                    second,
                });
            } else {
                found.push(PrepositionalAgent::By { event, span: phrase });
            }
        }
        found
    }

    /// Split a coordinated span at its first `" and "`.
    fn split_at_and(doc: &EventDocument, span: Span) -> Vec<Span> {
        const SEPARATOR: &str = " and ";
        match doc.text_of(span).find(SEPARATOR) {
            Some(pos) if pos > 0 && span.begin + pos + SEPARATOR.len() < span.end => vec![
                Span::new(span.begin, span.begin + pos),
                Span::new(span.begin + pos + SEPARATOR.len(), span.end),
            ],
            _ => vec![span],
        }
    }

    fn between_by_pass(&self, doc: &mut EventDocument, index: &mut ComponentIndex) -> AnnotationResult<()> {
        for agent in Self::prepositional_agents(doc) {
            match agent {
                PrepositionalAgent::Between { event, first, second } => {
                    let spans = match second {
                        Some(second) if second == first => Self::split_at_and(doc, first),
                        Some(second) => vec![first, second],
                        None => vec![first],
                    };
                    for span in spans {
                        if doc.role_overlaps(event, LinkType::Agent, span) {
                            continue;
                        }
                        let id = component_for(doc, index, span, ComponentKind::Entity, BETWEEN)?;
                        doc.attach_link(event, id, LinkType::Agent, BETWEEN)?;
                    }
                }
                PrepositionalAgent::By { event, span } => {
                    let id = component_for(doc, index, span, ComponentKind::Entity, BY)?;
                    doc.replace_links(event, LinkType::Agent, &[id], BY)?;
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // 3. Modifiers
    // ========================================================================

    fn modifier_pass(&self, doc: &mut EventDocument, index: &mut ComponentIndex) -> AnnotationResult<()> {
        let backend = DependencyBackend::Stanford;
        for event in doc.event_ids().collect::<Vec<_>>() {
            let Some(span) = doc.event(event).map(|e| e.span) else { continue };
            let graph = doc.graph(backend);
            let mut neighbours: Vec<NodeId> = Vec::new();
            for node in event_nodes(doc, backend, event) {
                neighbours.extend(graph.children_where(node, |r| r.ends_with("mod")));
                neighbours.extend(
                    graph
                        .head_edges(node)
                        .filter(|edge| edge.relation.ends_with("mod"))
                        .filter_map(|edge| edge.head),
                );
            }

            let mut phrases: Vec<Span> = Vec::new();
            for node in neighbours {
                let Some(word) = doc.word_for_node(backend, node) else { continue };
                let Some(word_span) = doc.word(word).map(|w| w.span) else { continue };
                if span.contains(&word_span) {
                    continue;
                }
                let Some(phrase) = noun_phrase_around(doc, word, span) else { continue };
                if phrase.overlaps(&span) || !has_entity_of_type(doc, phrase, AGENT_ENTITY_TYPES) {
                    continue;
                }
                if !phrases.contains(&phrase) {
                    phrases.push(phrase);
                }
            }

            for phrase in phrases {
                if doc.role_overlaps(event, LinkType::Agent, phrase) {
                    continue;
                }
                let id = component_for(doc, index, phrase, ComponentKind::Entity, MODIFIER)?;
                doc.attach_link(event, id, LinkType::Agent, MODIFIER)?;
            }
        }
        Ok(())
    }

    // ========================================================================
    // 4. Possessives and compounds
    // ========================================================================

    fn possessive_compound_pass(&self, doc: &mut EventDocument, index: &mut ComponentIndex) -> AnnotationResult<()> {
        let backend = DependencyBackend::Stanford;
        let phrase_words = CoverIndex::build(doc, doc.noun_phrases().iter().map(|np| np.span));

        for event in doc.event_ids().collect::<Vec<_>>() {
            let Some(span) = doc.event(event).map(|e| e.span) else { continue };
            let nominal = doc
                .word_range(span)
                .map_or(false, |range| range.iter().any(|w| phrase_words.contains_word(WordId(w))));
            if !nominal {
                continue;
            }
            let nodes = event_nodes(doc, backend, event);
            let graph = doc.graph(backend);

            let possessor = nodes
                .iter()
                .flat_map(|&node| graph.children_where(node, |r| r == "poss" || r == "prep_of"))
                .filter_map(|child| doc.word_for_node(backend, child))
                .find(|&word| doc.word(word).map_or(false, |w| !span.contains(&w.span)));

            // One compound span per event, accumulated over all of its nodes.
            let mut compound: Option<Span> = None;
            for &node in &nodes {
                for child in graph.children_where(node, |r| r == "nn" || r == "compound") {
                    let Some(word_span) = doc
                        .word_for_node(backend, child)
                        .and_then(|w| doc.word(w))
                        .map(|w| w.span)
                    else {
                        continue;
                    };
                    if word_span.overlaps(&span) {
                        continue;
                    }
                    compound = Some(compound.map_or(word_span, |c| c.union(&word_span)));
                }
            }

            let mut possessive_found = false;
            if let Some(word) = possessor {
                let range = chunk_around(doc, word)
                    .filter(|chunk| !chunk.overlaps(&span))
                    .or_else(|| noun_phrase_around(doc, word, span));
                if let Some(range) = range {
                    let agents = valid_agents_in_range(doc, index, range, POSSESSIVE)?;
                    if !agents.is_empty() {
                        debug!(?event, "possessive agent");
                        doc.replace_links(event, LinkType::Agent, &agents, POSSESSIVE)?;
                        possessive_found = true;
                    }
                }
            }

            if let (Some(range), false) = (compound, possessive_found) {
                let agents = valid_agents_in_range(doc, index, range, COMPOUND)?;
                if !agents.is_empty() {
                    debug!(?event, "compound agent");
                    doc.replace_links(event, LinkType::Agent, &agents, COMPOUND)?;
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // 5. Conjunction
    // ========================================================================

    fn conjunction_pass(&self, doc: &mut EventDocument) -> AnnotationResult<()> {
        let pairs: Vec<(EventId, EventId)> = doc
            .event_relations()
            .iter()
            .filter(|r| r.relation_type.starts_with("conj"))
            .map(|r| (r.head, r.child))
            .collect();

        for (a, b) in pairs {
            let (Some(ea), Some(eb)) = (doc.event(a), doc.event(b)) else { continue };
            if ea.event_type != self.target_event_type || eb.event_type != self.target_event_type {
                continue;
            }
            for link_type in [LinkType::Agent, LinkType::Patient] {
                let a_has = doc.event(a).map_or(false, |e| e.has_links(link_type));
                let b_has = doc.event(b).map_or(false, |e| e.has_links(link_type));
                if a_has && !b_has {
                    doc.copy_links(a, b, link_type, CONJUNCTION)?;
                } else if b_has && !a_has {
                    doc.copy_links(b, a, link_type, CONJUNCTION)?;
                }
            }
        }
        Ok(())
    }
}

impl DocumentResolver for DependencyFiller {
    fn name(&self) -> &'static str {
        "dependency-filler"
    }

    fn resolve(&self, doc: &mut EventDocument) -> AnnotationResult<()> {
        let mut index = ComponentIndex::new();
        self.semantic_role_pass(doc, &mut index)?;
        self.between_by_pass(doc, &mut index)?;
        self.modifier_pass(doc, &mut index)?;
        self.possessive_compound_pass(doc, &mut index)?;
        self.conjunction_pass(doc)
    }
}
