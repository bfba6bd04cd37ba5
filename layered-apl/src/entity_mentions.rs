//! Resolve which entity mentions each component stands for.

use layered_events::{
    AnnotationResult, ComponentId, ComponentKind, DocumentResolver, EventDocument, MentionId,
};

use crate::candidates::back_with_mentions;

/// Fills `containing_entity_mentions` for every component, synthesising an
/// untyped mention from the component span when nothing overlaps it.
///
/// Location components also collect the surface forms of their mentions'
/// cluster mates as alternate names, and take a `COUNTRY` mention's text as
/// their country.
#[derive(Debug, Default)]
pub struct ComponentMentionUpdater;

impl ComponentMentionUpdater {
    pub fn new() -> Self {
        Self
    }

    fn alternate_names(doc: &EventDocument, id: ComponentId, mentions: &[MentionId]) -> Vec<String> {
        let own = doc.component(id).map(|c| doc.text_of(c.span)).unwrap_or_default();
        let mut names: Vec<String> = Vec::new();
        for &mention in mentions {
            let Some(cluster) = doc
                .entity_mention(mention)
                .and_then(|m| m.cluster)
                .and_then(|c| doc.cluster(c))
            else {
                continue;
            };
            for &mate in &cluster.mentions {
                let Some(text) = doc.entity_mention(mate).map(|m| doc.text_of(m.span).trim()) else {
                    continue;
                };
                if text.is_empty() || text.eq_ignore_ascii_case(own) || names.iter().any(|n| n == text) {
                    continue;
                }
                names.push(text.to_string());
            }
        }
        names
    }

    fn country(doc: &EventDocument, mentions: &[MentionId]) -> Option<String> {
        mentions
            .iter()
            .filter_map(|&m| doc.entity_mention(m))
            .find(|m| m.has_type(&["COUNTRY"]))
            .map(|m| doc.text_of(m.span).to_string())
    }
}

impl DocumentResolver for ComponentMentionUpdater {
    fn name(&self) -> &'static str {
        "component-mentions"
    }

    fn resolve(&self, doc: &mut EventDocument) -> AnnotationResult<()> {
        update_component_entity_mentions(doc);
        Ok(())
    }
}

/// Point every component at the entity mentions it stands for.
///
/// See [`ComponentMentionUpdater`].
pub fn update_component_entity_mentions(doc: &mut EventDocument) {
    let components: Vec<ComponentId> = doc.components().map(|(id, _)| id).collect();
    for id in components {
        let mentions = back_with_mentions(doc, id);

        let is_location = doc.component(id).map_or(false, |c| c.kind.is_location());
        let (alternates, country) = if is_location {
            (
                ComponentMentionUpdater::alternate_names(doc, id, &mentions),
                ComponentMentionUpdater::country(doc, &mentions),
            )
        } else {
            (Vec::new(), None)
        };

        let Some(component) = doc.component_mut(id) else { continue };
        if let ComponentKind::Location(attributes) = &mut component.kind {
            for name in alternates {
                if !attributes.alternate_names.contains(&name) {
                    attributes.alternate_names.push(name);
                }
            }
            if attributes.country.is_none() {
                attributes.country = country;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_events::{ComponentIndex, DocumentBuilder, LocationAttributes, Span, WordId};

    fn component(doc: &mut EventDocument, first: usize, last: usize, kind: ComponentKind) -> ComponentId {
        let span: Span = doc.words()[first].span.union(&doc.words()[last].span);
        ComponentIndex::new()
            .get_or_create(doc, span, Some(WordId(last)), kind, "test")
            .unwrap()
    }

    #[test]
    fn overlapping_mentions_or_a_synthesised_one() {
        // Rebels hit the town
        let mut doc = DocumentBuilder::new()
            .sentence(&[("Rebels", "NNS"), ("hit", "VBD"), ("the", "DT"), ("town", "NN")])
            .entity(0, 0, "ORGANIZATION")
            .build()
            .unwrap();
        let rebels = component(&mut doc, 0, 0, ComponentKind::Entity);
        let town = component(&mut doc, 2, 3, ComponentKind::Entity);

        let updater = ComponentMentionUpdater::new();
        updater.resolve(&mut doc).unwrap();
        updater.resolve(&mut doc).unwrap();

        assert_eq!(doc.component(rebels).unwrap().containing_entity_mentions, vec![MentionId(0)]);
        assert_eq!(doc.component(town).unwrap().containing_entity_mentions, vec![MentionId(1)]);
        assert_eq!(doc.entity_mentions().len(), 2);
        let synthesised = doc.entity_mention(MentionId(1)).unwrap();
        assert_eq!(doc.text_of(synthesised.span), "the town");
        assert_eq!(synthesised.entity_type, None);
    }

    #[test]
    fn locations_collect_alternate_names_and_country() {
        // Syria and the country
        let mut doc = DocumentBuilder::new()
            .sentence(&[("Syria", "NNP"), ("and", "CC"), ("the", "DT"), ("country", "NN")])
            .entity(0, 0, "COUNTRY")
            .untyped_entity(2, 3)
            .cluster(&[0, 1])
            .build()
            .unwrap();
        let syria = component(&mut doc, 0, 0, ComponentKind::location());

        ComponentMentionUpdater::new().resolve(&mut doc).unwrap();
        assert_eq!(
            doc.component(syria).unwrap().kind,
            ComponentKind::Location(LocationAttributes {
                country: Some("Syria".to_string()),
                alternate_names: vec!["the country".to_string()],
            })
        );
    }
}
