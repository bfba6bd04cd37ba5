//! Error types for annotation graph mutation.

use thiserror::Error;

use crate::{ComponentId, EventId, LinkId, NodeId};

/// Structural violations raised by the annotation store.
///
/// Missing evidence (no head word, no dependency node, ...) is never an
/// error: lookups return `Option` and rules skip the case. These variants
/// indicate a bug in whatever produced the input annotations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    /// A component was requested for a span with `begin >= end`.
    #[error("invalid span: begin {begin} must be before end {end}")]
    InvalidSpan { begin: usize, end: usize },

    /// A handle referred to an event that does not exist.
    #[error("unknown event mention {0:?}")]
    UnknownEvent(EventId),

    /// A handle referred to a component that does not exist or was deleted.
    #[error("unknown component {0:?}")]
    UnknownComponent(ComponentId),

    /// A handle referred to a link that does not exist or was removed.
    #[error("unknown link {0:?}")]
    UnknownLink(LinkId),

    /// A dependency node handle outside its graph.
    #[error("unknown dependency node {0:?}")]
    UnknownNode(NodeId),

    /// A word index outside the document.
    #[error("word index {index} out of range ({count} words)")]
    UnknownWord { index: usize, count: usize },
}

/// Result type for annotation store operations.
pub type AnnotationResult<T> = Result<T, AnnotationError>;
