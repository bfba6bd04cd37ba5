//! Controlled writes to entity coreference clusters.

use std::collections::HashMap;

use layered_events::{
    AnnotationResult, ClusterId, DependencyBackend, DocumentResolver, EventDocument, MentionId,
    WordId,
};
use tracing::debug;

const WH_TAGS: &[&str] = &["WDT", "WP"];
const WH_RELATIONS: &[&str] = &["nsubj", "nsubjpass", "dobj"];

/// Joins relative pronouns to their antecedent's cluster ("the rebels who
/// attacked"), then gives every mention of a cluster the cluster's majority
/// entity type.
#[derive(Debug, Default)]
pub struct EntityCorefUpdater;

impl EntityCorefUpdater {
    pub fn new() -> Self {
        Self
    }

    /// `(antecedent word, wh word)` pairs from `rcmod` edges.
    fn relative_pronouns(doc: &EventDocument) -> Vec<(WordId, WordId)> {
        let backend = DependencyBackend::Stanford;
        let graph = doc.graph(backend);
        let mut pairs = Vec::new();
        for edge in graph.edges().iter().filter(|e| e.relation == "rcmod") {
            let Some(antecedent) = edge.head.and_then(|h| doc.word_for_node(backend, h)) else {
                continue;
            };
            let wh = graph
                .children_where(edge.child, |r| WH_RELATIONS.contains(&r))
                .filter_map(|child| doc.word_for_node(backend, child))
                .find(|&w| doc.word(w).map_or(false, |word| WH_TAGS.contains(&word.pos.as_str())));
            if let Some(wh) = wh {
                pairs.push((antecedent, wh));
            }
        }
        pairs
    }

    /// Smallest mention containing `word`.
    fn mention_containing(doc: &EventDocument, word: WordId) -> Option<MentionId> {
        let span = doc.word(word)?.span;
        doc.entity_mentions()
            .iter()
            .enumerate()
            .filter(|(_, m)| m.span.contains(&span))
            .min_by_key(|(_, m)| m.span.len())
            .map(|(i, _)| MentionId(i))
    }

    fn wh_mention(doc: &mut EventDocument, word: WordId) -> Option<MentionId> {
        let span = doc.word(word)?.span;
        if let Some(i) = doc.entity_mentions().iter().position(|m| m.span == span) {
            return Some(MentionId(i));
        }
        let id = doc.add_entity_mention(span, None);
        if let Some(mention) = doc.entity_mention_mut(id) {
            mention.head_word = Some(word);
        }
        Some(id)
    }

    fn link_relative_pronouns(doc: &mut EventDocument) {
        for (antecedent, wh) in Self::relative_pronouns(doc) {
            let Some(antecedent) = Self::mention_containing(doc, antecedent) else { continue };
            let Some(wh) = Self::wh_mention(doc, wh) else { continue };
            if wh == antecedent {
                continue;
            }
            let cluster = match doc.entity_mention(antecedent).and_then(|m| m.cluster) {
                Some(cluster) => cluster,
                None => doc.add_cluster(vec![antecedent]),
            };
            match doc.entity_mention(wh).and_then(|m| m.cluster) {
                Some(existing) if existing == cluster => {}
                Some(existing) => {
                    debug!(?existing, ?cluster, "relative pronoun already in another cluster, not merging");
                }
                None => {
                    debug!(?wh, ?cluster, "relative pronoun joins antecedent cluster");
                    if let Some(c) = doc.cluster_mut(cluster) {
                        c.mentions.push(wh);
                    }
                    if let Some(m) = doc.entity_mention_mut(wh) {
                        m.cluster = Some(cluster);
                    }
                }
            }
        }
    }

    /// Most frequent non-null type, ties going to the earliest seen.
    fn majority_type(doc: &EventDocument, cluster: ClusterId) -> Option<String> {
        let mentions = &doc.cluster(cluster)?.mentions;
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        for (order, &id) in mentions.iter().enumerate() {
            let Some(entity_type) = doc.entity_mention(id).and_then(|m| m.entity_type.as_deref()) else {
                continue;
            };
            counts.entry(entity_type).or_insert((0, order)).0 += 1;
        }
        counts
            .into_iter()
            .max_by(|(_, (ca, oa)), (_, (cb, ob))| ca.cmp(cb).then(ob.cmp(oa)))
            .map(|(t, _)| t.to_string())
    }

    fn unify_types(doc: &mut EventDocument) {
        for i in 0..doc.clusters().len() {
            let cluster = ClusterId(i);
            let Some(entity_type) = Self::majority_type(doc, cluster) else { continue };
            let mentions = doc.cluster(cluster).map(|c| c.mentions.clone()).unwrap_or_default();
            for id in mentions {
                if let Some(mention) = doc.entity_mention_mut(id) {
                    mention.entity_type = Some(entity_type.clone());
                }
            }
        }
    }
}

impl DocumentResolver for EntityCorefUpdater {
    fn name(&self) -> &'static str {
        "entity-coreference"
    }

    fn resolve(&self, doc: &mut EventDocument) -> AnnotationResult<()> {
        Self::link_relative_pronouns(doc);
        Self::unify_types(doc);
        Ok(())
    }
}
