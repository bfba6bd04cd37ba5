use tracing::debug_span;

use crate::{AnnotationResult, EventDocument};

/// A document-level annotation pass.
///
/// Resolvers mutate the shared store in place; later resolvers observe
/// everything earlier ones wrote.
pub trait DocumentResolver {
    /// Short identifier used in logs and as link provenance.
    fn name(&self) -> &'static str;

    fn resolve(&self, doc: &mut EventDocument) -> AnnotationResult<()>;
}

impl EventDocument {
    /// Run one resolver inside a `debug` span named after it.
    pub fn run_resolver<R: DocumentResolver + ?Sized>(&mut self, resolver: &R) -> AnnotationResult<()> {
        let span = debug_span!("resolver", name = resolver.name());
        let _entered = span.enter();
        resolver.resolve(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DocumentBuilder, EventId};

    struct Retype;

    impl DocumentResolver for Retype {
        fn name(&self) -> &'static str {
            "retype"
        }

        fn resolve(&self, doc: &mut EventDocument) -> AnnotationResult<()> {
            for id in doc.event_ids().collect::<Vec<_>>() {
                if let Some(event) = doc.event_mut(id) {
                    event.event_type = "attack".to_string();
                }
            }
            Ok(())
        }
    }

    #[test]
    fn resolvers_mutate_in_place() {
        let mut doc = DocumentBuilder::new()
            .sentence(&[("Rebels", "NNS"), ("attacked", "VBD")])
            .event(1, 1, "event")
            .build()
            .unwrap();
        doc.run_resolver(&Retype).unwrap();
        assert_eq!(doc.event(EventId(0)).unwrap().event_type, "attack");
    }
}
