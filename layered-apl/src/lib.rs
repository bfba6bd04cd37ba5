#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Agent/Patient/Location argument resolution for event mentions.
//!
//! Each resolver reads an [`EventDocument`](layered_events::EventDocument)
//! already carrying words, parses, entity mentions and frames, and writes
//! role links between events and entity-based components.
//!
//! ## Role fillers
//!
//! - [`DependencyFiller`] - Semantic roles, `between`/`by`, modifiers,
//!   possessives, compounds, conjunction
//! - [`PrepositionalFiller`] - Location and time slots
//! - [`AdjacencyFiller`] - Closest person/organisation phrase to the left
//! - [`FrameArgumentExtractor`] - Frame elements mapped to VerbNet/PropBank
//! - [`XcompPropagator`] - Complement clauses share their governor's agent
//! - [`DroppedRoleFiller`] - Omitted agents recovered up the head chain
//! - [`SlotAnalogyFiller`] - Surface-form analogy and title reassignment
//!
//! ## Supporting resolvers
//!
//! - [`EventRelationAnnotator`] - conj/xcomp relations between events
//! - [`NumberAnnotator`] - Quantities on components and events
//! - [`EntityCorefUpdater`] - Relative-pronoun coreference, cluster types
//! - [`ComponentMentionUpdater`] - Entity mentions behind each component
//!
//! [`Pipeline`] runs them in order:
//!
//! ```
//! use layered_apl::Pipeline;
//! use layered_events::{DocumentBuilder, EventId, LinkType};
//!
//! // The bombing killed 12 people .
//! let mut doc = DocumentBuilder::new()
//!     .sentence(&[("The", "DT"), ("bombing", "NN"), ("killed", "VBD"), ("12", "CD"), ("people", "NNS"), (".", ".")])
//!     .noun_phrase(0, 1)
//!     .noun_phrase(3, 4)
//!     .event(2, 2, "attack")
//!     .semantic(2, 1, "ARG0")
//!     .semantic(2, 4, "ARG1")
//!     .build()
//!     .unwrap();
//!
//! Pipeline::standard().run(&mut doc).unwrap();
//!
//! let patient = doc.linked_components(EventId(0), LinkType::Patient)[0];
//! assert_eq!(doc.component(patient).unwrap().quantity.as_deref(), Some("12"));
//! ```

mod adjacency;
mod candidates;
mod config;
mod coreference;
mod dependency_filler;
mod dropped_role;
mod entity_mentions;
mod error;
mod event_relations;
mod frame_extractor;
pub mod logging;
mod pipeline;
mod prepositional;
mod quantity;
mod slot_analogy;
mod xcomp;

pub use adjacency::AdjacencyFiller;
pub use config::AplConfig;
pub use coreference::EntityCorefUpdater;
pub use dependency_filler::DependencyFiller;
pub use dropped_role::DroppedRoleFiller;
pub use entity_mentions::{update_component_entity_mentions, ComponentMentionUpdater};
pub use error::{NumberRuleError, PipelineError, PipelineResult};
pub use event_relations::EventRelationAnnotator;
pub use frame_extractor::FrameArgumentExtractor;
pub use logging::init_logging;
pub use pipeline::Pipeline;
pub use prepositional::PrepositionalFiller;
pub use quantity::{compare_quantities, NumberAnnotator, NumberRules};
pub use slot_analogy::SlotAnalogyFiller;
pub use xcomp::XcompPropagator;

#[cfg(test)]
mod tests {
    mod properties;
    mod scenarios;
}
