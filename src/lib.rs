#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Annotation store for event-argument resolution.
//!
//! ## Store
//!
//! - [`EventDocument`] - Text plus every annotation layer, addressed by handles
//! - [`DocumentBuilder`] - Builds documents from word-indexed annotations
//! - [`DependencyGraph`] - Stanford / Fanse parses behind one shape
//!
//! ## Role links
//!
//! Event mentions point at [`EntityBasedComponent`]s through typed
//! [`ComponentLink`]s (agent, patient, location, time). Components are
//! canonicalised per pass by [`ComponentIndex`]; links are always written
//! through the link manager methods on [`EventDocument`] so that both ends
//! stay consistent.
//!
//! ## Passes
//!
//! Any [`DocumentResolver`] can be run with [`EventDocument::run_resolver`],
//! and [`SentenceDisplay`] renders the result for snapshot tests.

mod builder;
mod dedup;
mod dependency;
mod display;
mod document;
mod error;
mod index;
mod links;
mod resolver;
mod span;

pub use builder::DocumentBuilder;
pub use dedup::ComponentIndex;
pub use dependency::{
    DependencyBackend, DependencyEdge, DependencyGraph, DependencyNode, NodeId, SemanticRelation,
};
pub use display::SentenceDisplay;
pub use document::{
    ArgumentId, ArgumentLink, Chunk, ClusterId, ComponentId, ComponentKind, ComponentLink,
    EntityBasedComponent, EntityCluster, EntityMention, EventDocument, EventId, EventMention,
    EventRelation, FrameAnnotationSet, FrameLabel, FrameLayer, LinkId, LinkType,
    LocationAttributes, MentionId, NounPhrase, Sentence, Word, WordId,
};
pub use error::{AnnotationError, AnnotationResult};
pub use index::CoverIndex;
pub use resolver::DocumentResolver;
pub use span::{Span, WordRange};
