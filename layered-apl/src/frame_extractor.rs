//! Frame-semantic arguments mapped to VerbNet and PropBank roles.

use std::sync::Arc;

use layered_events::{
    AnnotationResult, ArgumentLink, ComponentIndex, ComponentKind, DocumentResolver, EventDocument,
    EventId, Span, WordRange,
};
use layered_frames::FrameResources;
use tracing::debug;

use crate::candidates::{back_with_mentions, component_for};

const PROVENANCE: &str = "frame";

/// A frame target aligned to words, with its frame elements.
#[derive(Debug)]
struct FrameTarget {
    frame: String,
    words: WordRange,
    elements: Vec<(String, Span)>,
}

/// Attaches [`ArgumentLink`]s for the frame whose target falls on an event.
///
/// The event's `frame_name` is set whenever a target is found, even if no
/// frame element maps to a VerbNet role. Argument components are backed by
/// the entity mentions they overlap, or by a synthesised untyped mention.
#[derive(Debug, Clone)]
pub struct FrameArgumentExtractor {
    resources: Arc<FrameResources>,
    reduce_verbnet: bool,
}

impl FrameArgumentExtractor {
    pub fn new(resources: Arc<FrameResources>, reduce_verbnet: bool) -> Self {
        Self {
            resources,
            reduce_verbnet,
        }
    }

    fn targets(doc: &EventDocument) -> Vec<FrameTarget> {
        let mut targets = Vec::new();
        for set in doc.frames() {
            let elements: Vec<(String, Span)> = set
                .layer("FE")
                .map(|layer| layer.labels.iter().map(|l| (l.name.clone(), l.span)).collect())
                .unwrap_or_default();
            let Some(target_layer) = set.layer("Target") else { continue };
            for label in &target_layer.labels {
                let Some(words) = doc.word_range(label.span) else { continue };
                targets.push(FrameTarget {
                    frame: set.frame_name.clone(),
                    words,
                    elements: elements.clone(),
                });
            }
        }
        targets
    }

    /// Target for an event: the one on its head word if several overlap it,
    /// else the first.
    fn choose<'t>(doc: &EventDocument, event: EventId, targets: &'t [FrameTarget]) -> Option<&'t FrameTarget> {
        let mention = doc.event(event)?;
        let range = doc.word_range(mention.span)?;
        let overlapping: Vec<&FrameTarget> = targets.iter().filter(|t| t.words.overlaps(&range)).collect();
        if overlapping.len() > 1 {
            if let Some(head) = mention.head_word {
                let on_head: Vec<&FrameTarget> =
                    overlapping.iter().copied().filter(|t| t.words.contains(head.0)).collect();
                if on_head.len() > 1 {
                    debug!(?event, count = on_head.len(), "several frame targets on the head word");
                }
                if let Some(&target) = on_head.first() {
                    return Some(target);
                }
            }
        }
        overlapping.first().copied()
    }
}

impl DocumentResolver for FrameArgumentExtractor {
    fn name(&self) -> &'static str {
        "frame-arguments"
    }

    fn resolve(&self, doc: &mut EventDocument) -> AnnotationResult<()> {
        let targets = Self::targets(doc);
        if targets.is_empty() {
            return Ok(());
        }
        let mut index = ComponentIndex::new();

        for event in doc.event_ids().collect::<Vec<_>>() {
            let Some(target) = Self::choose(doc, event, &targets) else { continue };
            if let Some(mention) = doc.event_mut(event) {
                mention.frame_name = Some(target.frame.clone());
            }

            for (element, span) in &target.elements {
                let Some(role) = self.resources.resolve(&target.frame, element, self.reduce_verbnet) else {
                    continue;
                };
                let Some(aligned) = doc.word_range(*span).and_then(|r| doc.span_of_words(r)) else {
                    continue;
                };
                let component = component_for(doc, &mut index, aligned, ComponentKind::Entity, PROVENANCE)?;
                back_with_mentions(doc, component);
                let known = doc.event(event).map_or(false, |e| {
                    e.arguments.iter().any(|&a| {
                        doc.argument(a)
                            .map_or(false, |arg| arg.component == component && &arg.frame_element == element)
                    })
                });
                if known {
                    continue;
                }
                debug!(?event, frame = %target.frame, element = %element, verbnet = %role.verbnet_role, "frame argument");
                doc.add_argument(ArgumentLink {
                    event,
                    component,
                    verbnet_role: role.verbnet_role,
                    frame_element: element.clone(),
                    propbank_role: role.propbank_role,
                    super_frame_elements: role.super_frame_elements,
                    provenance: PROVENANCE.to_string(),
                })?;
            }
        }
        Ok(())
    }
}
