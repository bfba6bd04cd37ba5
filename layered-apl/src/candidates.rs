//! Candidate selection shared by the fillers.

use layered_events::{
    AnnotationResult, ComponentId, ComponentIndex, ComponentKind, DependencyBackend,
    EventDocument, EventId, MentionId, NodeId, Span, WordId,
};
use tracing::trace;

/// Entity types that may fill an agent slot.
pub(crate) const AGENT_ENTITY_TYPES: &[&str] = &["PERSON", "ORGANIZATION"];

pub(crate) const LOCATION_ENTITY_TYPES: &[&str] =
    &["LOCATION", "GPE", "COUNTRY", "CITY", "STATE_OR_PROVINCE"];

pub(crate) const TIME_ENTITY_TYPES: &[&str] = &["DATE", "TIME", "DURATION"];

/// Smallest noun phrase holding `word` that does not overlap `avoid`,
/// or the word itself when every such phrase does.
pub(crate) fn noun_phrase_around(doc: &EventDocument, word: WordId, avoid: Span) -> Option<Span> {
    let word_span = doc.word(word)?.span;
    Some(
        doc.noun_phrases()
            .iter()
            .map(|np| np.span)
            .filter(|span| span.contains(&word_span) && !span.overlaps(&avoid))
            .min_by_key(|span| span.len())
            .unwrap_or(word_span),
    )
}

/// Noun-phrase chunk holding `word`, falling back to the word.
pub(crate) fn chunk_around(doc: &EventDocument, word: WordId) -> Option<Span> {
    let word_span = doc.word(word)?.span;
    Some(
        doc.chunks()
            .iter()
            .filter(|chunk| chunk.is_noun_phrase() && chunk.span.contains(&word_span))
            .map(|chunk| chunk.span)
            .min_by_key(|span| span.len())
            .unwrap_or(word_span),
    )
}

pub(crate) fn has_entity_of_type(doc: &EventDocument, span: Span, types: &[&str]) -> bool {
    doc.entity_mentions()
        .iter()
        .any(|m| span.contains(&m.span) && m.has_type(types))
}

/// Get or create a plain component for `span`, headed by its dependency head.
pub(crate) fn component_for(
    doc: &mut EventDocument,
    index: &mut ComponentIndex,
    span: Span,
    kind: ComponentKind,
    provenance: &str,
) -> AnnotationResult<ComponentId> {
    let head = doc.head_word_of(span);
    index.get_or_create(doc, span, head, kind, provenance)
}

/// Record on a component the entity mentions overlapping it, synthesising an
/// untyped mention from the component span when none does.
pub(crate) fn back_with_mentions(doc: &mut EventDocument, id: ComponentId) -> Vec<MentionId> {
    let Some((span, head)) = doc.component(id).map(|c| (c.span, c.head_word)) else {
        return Vec::new();
    };
    let mut mentions: Vec<MentionId> = doc
        .entity_mentions()
        .iter()
        .enumerate()
        .filter(|(_, m)| m.span.overlaps(&span))
        .map(|(i, _)| MentionId(i))
        .collect();
    if mentions.is_empty() {
        let mention = doc.add_entity_mention(span, None);
        if let Some(m) = doc.entity_mention_mut(mention) {
            m.head_word = head;
        }
        trace!(?id, ?mention, "synthesised mention for component");
        mentions.push(mention);
    }
    if let Some(component) = doc.component_mut(id) {
        component.containing_entity_mentions = mentions.clone();
    }
    mentions
}

/// Components for every agent-typed entity mention inside `range`.
pub(crate) fn valid_agents_in_range(
    doc: &mut EventDocument,
    index: &mut ComponentIndex,
    range: Span,
    provenance: &str,
) -> AnnotationResult<Vec<ComponentId>> {
    let mentions: Vec<(Span, Option<WordId>)> = doc
        .entity_mentions()
        .iter()
        .filter(|m| !m.span.is_implicit() && range.contains(&m.span) && m.has_type(AGENT_ENTITY_TYPES))
        .map(|m| (m.span, m.head_word))
        .collect();
    let mut components = Vec::new();
    for (span, head) in mentions {
        let id = index.get_or_create(doc, span, head, ComponentKind::Entity, provenance)?;
        if !components.contains(&id) {
            components.push(id);
        }
    }
    Ok(components)
}

/// Dependency nodes of an event's words.
pub(crate) fn event_nodes(doc: &EventDocument, backend: DependencyBackend, event: EventId) -> Vec<NodeId> {
    doc.event(event)
        .map(|e| doc.nodes_for_span(backend, e.span))
        .unwrap_or_default()
}

/// Dependency node of an event's head word.
pub(crate) fn event_head_node(doc: &EventDocument, backend: DependencyBackend, event: EventId) -> Option<NodeId> {
    let head = doc.event(event)?.head_word?;
    doc.node_for_word(backend, head)
}

/// Lower-cased text with whitespace runs collapsed.
pub(crate) fn normalize_surface(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Word text lower-cased, for function-word tests.
pub(crate) fn lower_text(doc: &EventDocument, word: WordId) -> Option<String> {
    doc.word(word).map(|w| w.text.to_lowercase())
}
