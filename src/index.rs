//! Word-level lookups over the annotation store.
//!
//! Rules mostly think in word positions: "the noun phrase ends two words
//! before the event", "the token heading this span". These helpers translate
//! character spans to words and dependency nodes to words, and provide a
//! reusable word -> annotation index.

use std::collections::HashMap;

use crate::{DependencyBackend, EventDocument, EventId, NodeId, Span, Word, WordId, WordRange};

impl EventDocument {
    /// Words lying entirely inside `span`, in text order.
    pub fn covered_words(&self, span: Span) -> Vec<WordId> {
        let words = self.words();
        let start = words.partition_point(|w| w.span.begin < span.begin);
        words[start..]
            .iter()
            .enumerate()
            .take_while(|(_, w)| w.span.begin < span.end)
            .filter(|(_, w)| w.span.end <= span.end)
            .map(|(i, _)| WordId(start + i))
            .collect()
    }

    /// Smallest word whose span contains `span`.
    pub fn covering_word(&self, span: Span) -> Option<WordId> {
        self.words()
            .iter()
            .enumerate()
            .filter(|(_, w)| w.span.begin <= span.begin && span.end <= w.span.end)
            .min_by_key(|(_, w)| w.span.len())
            .map(|(i, _)| WordId(i))
    }

    /// Word positions covered by `span`.
    ///
    /// Falls back to the smallest covering word when the span covers no
    /// whole word (zero-width or misaligned regions).
    pub fn word_range(&self, span: Span) -> Option<WordRange> {
        let covered = self.covered_words(span);
        match (covered.first(), covered.last()) {
            (Some(first), Some(last)) => Some(WordRange::new(first.0, last.0)),
            _ => self.covering_word(span).map(|w| WordRange::single(w.0)),
        }
    }

    /// Character span of a word range.
    pub fn span_of_words(&self, range: WordRange) -> Option<Span> {
        let first = self.word(WordId(range.start_idx))?;
        let last = self.word(WordId(range.end_idx))?;
        Some(first.span.union(&last.span))
    }

    pub fn words_of(&self, span: Span) -> impl Iterator<Item = &Word> {
        self.word_range(span)
            .into_iter()
            .flat_map(|range| range.iter())
            .filter_map(move |i| self.word(WordId(i)))
    }

    /// Sentence holding the first word of `span`.
    pub fn sentence_of(&self, span: Span) -> Option<usize> {
        let range = self.word_range(span)?;
        self.word(WordId(range.start_idx)).map(|w| w.sentence)
    }

    /// Word a dependency node stands for.
    pub fn word_for_node(&self, backend: DependencyBackend, node: NodeId) -> Option<WordId> {
        let span = self.graph(backend).span(node)?;
        self.covered_words(span)
            .first()
            .copied()
            .or_else(|| self.covering_word(span))
    }

    /// Dependency node standing for a word.
    pub fn node_for_word(&self, backend: DependencyBackend, word: WordId) -> Option<NodeId> {
        let span = self.word(word)?.span;
        let graph = self.graph(backend);
        graph.nodes_in(span).first().copied().or_else(|| {
            graph
                .nodes()
                .find(|(_, node)| node.span.contains(&span))
                .map(|(id, _)| id)
        })
    }

    /// Dependency nodes inside `span`, mapped from the span's words.
    pub fn nodes_for_span(&self, backend: DependencyBackend, span: Span) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self
            .word_range(span)
            .into_iter()
            .flat_map(|range| range.iter())
            .filter_map(|i| self.node_for_word(backend, WordId(i)))
            .collect();
        nodes.dedup();
        nodes
    }

    /// Head word of `span` according to one backend.
    pub fn head_word_with(&self, backend: DependencyBackend, span: Span) -> Option<WordId> {
        let graph = self.graph(backend);
        let node = graph.head_node(span)?;
        self.word_for_node(backend, node)
    }

    /// Head word of `span`: Stanford parse first, then Fanse, then the first
    /// covered word.
    pub fn head_word_of(&self, span: Span) -> Option<WordId> {
        self.head_word_with(DependencyBackend::Stanford, span)
            .or_else(|| self.head_word_with(DependencyBackend::Fanse, span))
            .or_else(|| self.word_range(span).map(|r| WordId(r.start_idx)))
    }

    /// Resolve head words of events and entity mentions that lack one.
    pub fn assign_head_words(&mut self) {
        let event_heads: Vec<_> = self
            .events()
            .iter()
            .map(|e| e.head_word.or_else(|| self.head_word_of(e.span)))
            .collect();
        for (i, head) in event_heads.into_iter().enumerate() {
            if let Some(event) = self.event_mut(EventId(i)) {
                event.head_word = head;
            }
        }

        let mention_heads: Vec<_> = self
            .entity_mentions()
            .iter()
            .map(|m| m.head_word.or_else(|| self.head_word_of(m.span)))
            .collect();
        for (i, head) in mention_heads.into_iter().enumerate() {
            if let Some(mention) = self.entity_mention_mut(crate::MentionId(i)) {
                mention.head_word = head;
            }
        }
    }

    /// Events whose span covers `word`.
    pub fn events_covering_word(&self, word: WordId) -> Vec<EventId> {
        let Some(span) = self.word(word).map(|w| w.span) else {
            return Vec::new();
        };
        self.event_ids()
            .filter(|&id| self.event(id).map_or(false, |e| e.span.contains(&span)))
            .collect()
    }

    /// Event standing for a word: the one headed by it, else any covering it.
    pub fn event_for_word(&self, word: WordId) -> Option<EventId> {
        let covering = self.events_covering_word(word);
        covering
            .iter()
            .copied()
            .find(|&id| self.event(id).and_then(|e| e.head_word) == Some(word))
            .or_else(|| covering.first().copied())
    }
}

/// Maps each word to the annotations covering it.
///
/// Built once per filler pass from any sequence of spans; the stored values
/// are positions in that sequence.
#[derive(Debug, Default)]
pub struct CoverIndex {
    by_word: HashMap<WordId, Vec<usize>>,
}

impl CoverIndex {
    pub fn build<I>(doc: &EventDocument, spans: I) -> Self
    where
        I: IntoIterator<Item = Span>,
    {
        let mut by_word: HashMap<WordId, Vec<usize>> = HashMap::new();
        for (idx, span) in spans.into_iter().enumerate() {
            for word in doc.covered_words(span) {
                by_word.entry(word).or_default().push(idx);
            }
        }
        Self { by_word }
    }

    /// Annotation positions covering `word`, in build order.
    pub fn covering(&self, word: WordId) -> &[usize] {
        self.by_word.get(&word).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn contains_word(&self, word: WordId) -> bool {
        !self.covering(word).is_empty()
    }
}
