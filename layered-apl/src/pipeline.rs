//! Pipeline presets for running the argument resolvers in order.
//!
//! Every resolver reads the links written by the ones before it, so order
//! matters. Mapping tables and number rules are loaded once when the
//! pipeline is built and shared by every document it runs on.

use std::sync::Arc;

use layered_events::{DocumentResolver, EventDocument};
use layered_frames::FrameResources;
use tracing::{debug, info};

use crate::{
    AdjacencyFiller, AplConfig, ComponentMentionUpdater, DependencyFiller, DroppedRoleFiller,
    EntityCorefUpdater, EventRelationAnnotator, FrameArgumentExtractor, NumberAnnotator,
    NumberRules, PipelineResult, PrepositionalFiller, SlotAnalogyFiller, XcompPropagator,
};

/// Ordered set of resolvers plus the resources they share.
///
/// - `minimal()` - dependency and adjacency fillers only
/// - `standard()` - every resolver, built-in resources
/// - `from_config()` - every resolver, resources loaded from the config
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Resolvers to run (in order)
    resolvers: Vec<ResolverType>,
    config: AplConfig,
    resources: Arc<FrameResources>,
    number_rules: Arc<NumberRules>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResolverType {
    EventRelations,
    Dependency,
    Prepositional,
    Adjacency,
    FrameArguments,
    Xcomp,
    DroppedRole,
    SlotAnalogy,
    Numbers,
    EntityCoreference,
    ComponentMentions,
}

const STANDARD_ORDER: [ResolverType; 11] = [
    ResolverType::EventRelations,
    ResolverType::Dependency,
    ResolverType::Prepositional,
    ResolverType::Adjacency,
    ResolverType::FrameArguments,
    ResolverType::Xcomp,
    ResolverType::DroppedRole,
    ResolverType::SlotAnalogy,
    ResolverType::Numbers,
    ResolverType::EntityCoreference,
    ResolverType::ComponentMentions,
];

impl Pipeline {
    fn with_resolvers(resolvers: Vec<ResolverType>) -> Self {
        Self {
            resolvers,
            config: AplConfig::default(),
            resources: Arc::new(FrameResources::empty()),
            number_rules: Arc::new(NumberRules::builtin()),
        }
    }

    /// Dependency and adjacency fillers only.
    pub fn minimal() -> Self {
        Self::with_resolvers(vec![ResolverType::Dependency, ResolverType::Adjacency])
    }

    /// Full resolution with default configuration and empty mapping tables.
    ///
    /// Runs resolvers in dependency order:
    /// 1. EventRelations - conj/xcomp links between events (no deps)
    /// 2. Dependency - semantic roles, prepositions, modifiers, conjunction
    /// 3. Prepositional - location and time slots
    /// 4. Adjacency - closest-left phrase for remaining gaps
    /// 5. FrameArguments - VerbNet/PropBank arguments from frames
    /// 6. Xcomp - complement clauses inherit agents (needs 2-4)
    /// 7. DroppedRole - agents down the Fanse head chain (needs 2-6)
    /// 8. SlotAnalogy - surface-form analogy (needs every role filler)
    /// 9. Numbers - quantities on components created above
    /// 10. EntityCoreference - relative pronouns and cluster types
    /// 11. ComponentMentions - mentions behind each component (needs 10)
    pub fn standard() -> Self {
        Self::with_resolvers(STANDARD_ORDER.to_vec())
    }

    /// Standard order with resources loaded from the paths in `config`.
    ///
    /// Fails if any configured file cannot be read or parsed.
    pub fn from_config(config: &AplConfig) -> PipelineResult<Self> {
        let resources = FrameResources::load(
            config.fn_vn_mapping.as_deref(),
            config.vn_pb_mapping.as_deref(),
            config.frame_relations.as_deref(),
        )?;
        let number_rules = match &config.number_rules {
            Some(path) => NumberRules::load(path)?,
            None => NumberRules::builtin(),
        };
        info!(
            fn_vn = resources.fn_vn().len(),
            vn_pb = resources.vn_pb().len(),
            frame_relations = resources.relations().len(),
            "loaded frame resources"
        );
        Ok(Self {
            resolvers: STANDARD_ORDER.to_vec(),
            config: config.clone(),
            resources: Arc::new(resources),
            number_rules: Arc::new(number_rules),
        })
    }

    pub fn with_frame_resources(mut self, resources: Arc<FrameResources>) -> Self {
        self.resources = resources;
        self
    }

    pub fn with_number_rules(mut self, rules: Arc<NumberRules>) -> Self {
        self.number_rules = rules;
        self
    }

    pub fn config(&self) -> &AplConfig {
        &self.config
    }

    fn build(&self, resolver_type: ResolverType) -> Box<dyn DocumentResolver> {
        match resolver_type {
            ResolverType::EventRelations => Box::new(EventRelationAnnotator::new()),
            ResolverType::Dependency => Box::new(DependencyFiller::new(self.config.target_event_type.clone())),
            ResolverType::Prepositional => Box::new(PrepositionalFiller::new()),
            ResolverType::Adjacency => Box::new(AdjacencyFiller::new(self.config.adjacency_slack)),
            ResolverType::FrameArguments => Box::new(FrameArgumentExtractor::new(
                Arc::clone(&self.resources),
                self.config.reduce_verbnet,
            )),
            ResolverType::Xcomp => Box::new(XcompPropagator::new()),
            ResolverType::DroppedRole => Box::new(DroppedRoleFiller::new()),
            ResolverType::SlotAnalogy => Box::new(SlotAnalogyFiller::new()),
            ResolverType::Numbers => Box::new(NumberAnnotator::new(Arc::clone(&self.number_rules))),
            ResolverType::EntityCoreference => Box::new(EntityCorefUpdater::new()),
            ResolverType::ComponentMentions => Box::new(ComponentMentionUpdater::new()),
        }
    }

    /// Names of the resolvers this pipeline runs, in order.
    pub fn resolver_names(&self) -> Vec<&'static str> {
        self.resolvers.iter().map(|&r| self.build(r).name()).collect()
    }

    /// Run every resolver on `doc` in order.
    pub fn run(&self, doc: &mut EventDocument) -> PipelineResult<()> {
        debug!(resolvers = self.resolvers.len(), words = doc.words().len(), "running pipeline");
        for &resolver_type in &self.resolvers {
            let resolver = self.build(resolver_type);
            doc.run_resolver(resolver.as_ref())?;
        }
        Ok(())
    }
}
