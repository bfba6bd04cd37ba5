//! Character spans and word ranges.
//!
//! Every annotation in an [`EventDocument`](crate::EventDocument) is anchored
//! by a [`Span`] of character offsets. Rules that reason about adjacency work
//! on [`WordRange`]s instead, which count word positions.

use serde::{Deserialize, Serialize};

/// Half-open character range `[begin, end)` over the document text.
///
/// Spans are value types and double as deduplication keys. A span with
/// `begin >= end` marks an implicit (elided) mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub begin: usize,
    pub end: usize,
}

impl Span {
    pub fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    /// True for zero-width or inverted spans.
    pub fn is_implicit(&self) -> bool {
        self.begin >= self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Non-zero overlap. Touching spans (`a.end == b.begin`) do not overlap.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.begin < other.end && other.begin < self.end
    }

    /// `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Span) -> bool {
        self.begin <= other.begin && other.end <= self.end
    }

    /// Smallest span covering both.
    pub fn union(&self, other: &Span) -> Span {
        Span::new(self.begin.min(other.begin), self.end.max(other.end))
    }
}

/// A range of word positions.
///
/// Both indices are inclusive and refer to word ids (not character offsets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordRange {
    /// Inclusive first word index
    pub start_idx: usize,
    /// Inclusive last word index
    pub end_idx: usize,
}

impl WordRange {
    pub fn new(start_idx: usize, end_idx: usize) -> Self {
        Self { start_idx, end_idx }
    }

    pub fn single(idx: usize) -> Self {
        Self::new(idx, idx)
    }

    /// Number of words covered; zero when `end_idx < start_idx`.
    pub fn len(&self) -> usize {
        (self.end_idx + 1).saturating_sub(self.start_idx)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, idx: usize) -> bool {
        self.start_idx <= idx && idx <= self.end_idx
    }

    pub fn overlaps(&self, other: &WordRange) -> bool {
        self.start_idx <= other.end_idx && other.start_idx <= self.end_idx
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> {
        self.start_idx..=self.end_idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn span_equality_and_hashing() {
        let a = Span::new(0, 5);
        let b = Span::new(0, 5);
        let c = Span::new(1, 5);

        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
        assert!(!set.contains(&c));
    }

    #[test]
    fn overlap_requires_shared_characters() {
        let a = Span::new(0, 5);
        assert!(a.overlaps(&Span::new(4, 9)));
        assert!(a.overlaps(&Span::new(1, 2)));
        assert!(!a.overlaps(&Span::new(5, 9)));
        assert!(!Span::new(5, 9).overlaps(&a));
    }

    #[test]
    fn implicit_spans() {
        assert!(Span::new(0, 0).is_implicit());
        assert!(Span::new(7, 3).is_implicit());
        assert!(!Span::new(0, 3).is_implicit());
    }

    #[test]
    fn containment_and_union() {
        let outer = Span::new(2, 10);
        assert!(outer.contains(&Span::new(2, 10)));
        assert!(outer.contains(&Span::new(3, 4)));
        assert!(!outer.contains(&Span::new(1, 4)));
        assert_eq!(Span::new(2, 4).union(&Span::new(8, 12)), Span::new(2, 12));
    }

    #[test]
    fn word_range_is_inclusive() {
        let range = WordRange::new(3, 5);
        assert_eq!(range.len(), 3);
        assert!(range.contains(3));
        assert!(range.contains(5));
        assert!(!range.contains(6));
        assert_eq!(range.iter().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert!(range.overlaps(&WordRange::single(5)));
        assert!(!range.overlaps(&WordRange::new(6, 8)));
    }

    #[test]
    fn reversed_word_range_is_empty() {
        assert!(!WordRange::single(4).is_empty());
        let reversed = WordRange::new(5, 3);
        assert_eq!(reversed.len(), 0);
        assert!(reversed.is_empty());
    }
}
