//! Canonicalisation of entity-based components.
//!
//! A [`ComponentIndex`] lives for one filler pass. Every component created
//! through it is registered under each word it covers; asking again for the
//! same span with the same head word returns the existing component.

use std::collections::HashMap;

use tracing::trace;

use crate::{
    AnnotationError, AnnotationResult, ComponentId, ComponentKind, EntityBasedComponent,
    EventDocument, Span, WordId,
};

/// Per-pass `get_or_create` index for components.
#[derive(Debug, Default)]
pub struct ComponentIndex {
    by_word: HashMap<WordId, Vec<ComponentId>>,
    /// Components whose span covers no word at all
    by_span: HashMap<Span, ComponentId>,
}

impl ComponentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the component registered for exactly `span` under `head_word`,
    /// or create one of `kind`.
    ///
    /// Fails with [`AnnotationError::InvalidSpan`] when `span.begin >= span.end`.
    pub fn get_or_create(
        &mut self,
        doc: &mut EventDocument,
        span: Span,
        head_word: Option<WordId>,
        kind: ComponentKind,
        provenance: &str,
    ) -> AnnotationResult<ComponentId> {
        if span.begin >= span.end {
            return Err(AnnotationError::InvalidSpan {
                begin: span.begin,
                end: span.end,
            });
        }

        if let Some(existing) = self.lookup(doc, span, head_word) {
            return Ok(existing);
        }

        let id = doc.insert_component(EntityBasedComponent {
            span,
            head_word,
            quantity: None,
            provenance: provenance.to_string(),
            kind,
            component_links: Vec::new(),
            containing_entity_mentions: Vec::new(),
        });
        trace!(?id, ?span, provenance, "created component");

        let covered = doc.covered_words(span);
        if covered.is_empty() {
            self.by_span.insert(span, id);
        }
        for word in covered {
            self.by_word.entry(word).or_default().push(id);
        }
        Ok(id)
    }

    fn lookup(&self, doc: &EventDocument, span: Span, head_word: Option<WordId>) -> Option<ComponentId> {
        let Some(head) = head_word else {
            return self.by_span.get(&span).copied().or_else(|| {
                self.by_word
                    .values()
                    .flatten()
                    .copied()
                    .find(|&id| doc.component(id).map_or(false, |c| c.span == span))
            });
        };
        self.by_word
            .get(&head)
            .into_iter()
            .flatten()
            .copied()
            .find(|&id| doc.component(id).map_or(false, |c| c.span == span))
    }

    /// Components registered under `word`, in creation order.
    pub fn components_at(&self, word: WordId) -> &[ComponentId] {
        self.by_word.get(&word).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DocumentBuilder;

    fn doc() -> EventDocument {
        DocumentBuilder::new()
            .sentence(&[("The", "DT"), ("rebel", "NN"), ("army", "NN"), ("fled", "VBD")])
            .build()
            .unwrap()
    }

    #[test]
    fn same_span_and_head_returns_same_component() {
        let mut doc = doc();
        let mut index = ComponentIndex::new();
        let span = doc.span_of_words(crate::WordRange::new(0, 2)).unwrap();
        let a = index
            .get_or_create(&mut doc, span, Some(WordId(2)), ComponentKind::Entity, "test")
            .unwrap();
        let b = index
            .get_or_create(&mut doc, span, Some(WordId(2)), ComponentKind::Entity, "other")
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(doc.components().count(), 1);
        assert_eq!(doc.component(a).unwrap().provenance, "test");
    }

    #[test]
    fn different_span_creates_new_component() {
        let mut doc = doc();
        let mut index = ComponentIndex::new();
        let wide = doc.span_of_words(crate::WordRange::new(0, 2)).unwrap();
        let narrow = doc.span_of_words(crate::WordRange::new(1, 2)).unwrap();
        let a = index
            .get_or_create(&mut doc, wide, Some(WordId(2)), ComponentKind::Entity, "test")
            .unwrap();
        let b = index
            .get_or_create(&mut doc, narrow, Some(WordId(2)), ComponentKind::Entity, "test")
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(index.components_at(WordId(2)), &[a, b]);
        assert_eq!(index.components_at(WordId(0)), &[a]);
    }

    #[test]
    fn fresh_index_does_not_see_previous_pass() {
        let mut doc = doc();
        let span = doc.words()[2].span;
        let a = ComponentIndex::new()
            .get_or_create(&mut doc, span, Some(WordId(2)), ComponentKind::Entity, "pass1")
            .unwrap();
        let b = ComponentIndex::new()
            .get_or_create(&mut doc, span, Some(WordId(2)), ComponentKind::Entity, "pass2")
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn invalid_span_is_rejected() {
        let mut doc = doc();
        let mut index = ComponentIndex::new();
        let err = index
            .get_or_create(&mut doc, Span::new(5, 5), None, ComponentKind::Entity, "test")
            .unwrap_err();
        assert_eq!(err, AnnotationError::InvalidSpan { begin: 5, end: 5 });
        assert_eq!(doc.components().count(), 0);
    }

    #[test]
    fn missing_head_falls_back_to_span_lookup() {
        let mut doc = doc();
        let mut index = ComponentIndex::new();
        let span = doc.words()[1].span;
        let a = index
            .get_or_create(&mut doc, span, None, ComponentKind::Entity, "test")
            .unwrap();
        let b = index
            .get_or_create(&mut doc, span, None, ComponentKind::Entity, "test")
            .unwrap();
        assert_eq!(a, b);
    }
}
