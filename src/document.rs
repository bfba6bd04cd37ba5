//! The annotation store.
//!
//! `EventDocument` owns the text plus every annotation layered over it:
//! words, sentences, phrases, event mentions, entity mentions, dependency
//! graphs, frame labels and the role links the fillers write. All
//! cross-references are integer handles into arenas held here, so a filler
//! takes `&mut EventDocument` and later fillers observe earlier writes.

use serde::{Deserialize, Serialize};

use crate::{AnnotationError, AnnotationResult, DependencyBackend, DependencyGraph, Span, WordRange};

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub usize);
    };
}

handle!(
    /// Position of a word in the document (its `wordId`).
    WordId
);
handle!(EventId);
handle!(ComponentId);
handle!(LinkId);
handle!(MentionId);
handle!(ClusterId);
handle!(ArgumentId);

// ============================================================================
// Input layers
// ============================================================================

/// Smallest token unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub span: Span,
    pub text: String,
    pub lemma: String,
    /// Penn Treebank part-of-speech tag
    pub pos: String,
    /// Index of the sentence holding this word
    pub sentence: usize,
}

impl Word {
    pub fn is_noun(&self) -> bool {
        self.pos.starts_with("NN")
    }

    pub fn is_past_participle(&self) -> bool {
        self.pos == "VBN"
    }

    pub fn is_past_tense(&self) -> bool {
        self.pos == "VBD"
    }

    /// Punctuation by tag or, failing that, by surface form.
    pub fn is_punctuation(&self) -> bool {
        const PUNCT_TAGS: &[&str] = &[
            ".", ",", ":", "``", "''", "-LRB-", "-RRB-", "-LSB-", "-RSB-", "HYPH", "#", "PUNCT",
        ];
        PUNCT_TAGS.contains(&self.pos.as_str())
            || (!self.text.is_empty() && self.text.chars().all(|c| c.is_ascii_punctuation()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    pub span: Span,
    pub words: WordRange,
}

/// A parser noun phrase. Noun phrases may nest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NounPhrase {
    pub span: Span,
}

/// A flat chunker segment (`NP`, `VP`, `PP`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub span: Span,
    pub tag: String,
}

impl Chunk {
    pub fn is_noun_phrase(&self) -> bool {
        self.tag == "NP"
    }
}

/// A named or nominal entity mention from an entity recogniser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMention {
    pub span: Span,
    /// `PERSON`, `ORGANIZATION`, `NUMBER`, `DATE`, ...
    pub entity_type: Option<String>,
    pub head_word: Option<WordId>,
    pub cluster: Option<ClusterId>,
}

impl EntityMention {
    pub fn has_type(&self, types: &[&str]) -> bool {
        self.entity_type
            .as_deref()
            .map_or(false, |t| types.contains(&t))
    }
}

/// Equivalence class of entity mentions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityCluster {
    pub mentions: Vec<MentionId>,
}

/// Typed relation between two event mentions (`conj_and`, `xcomp`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRelation {
    pub head: EventId,
    pub child: EventId,
    pub relation_type: String,
}

/// A labelled span inside one frame layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameLabel {
    pub name: String,
    pub span: Span,
}

/// One layer of a frame annotation set (`Target`, `FE`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameLayer {
    pub name: String,
    pub labels: Vec<FrameLabel>,
}

/// Frame-semantic parse of one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAnnotationSet {
    pub frame_name: String,
    pub layers: Vec<FrameLayer>,
}

impl FrameAnnotationSet {
    pub fn layer(&self, name: &str) -> Option<&FrameLayer> {
        self.layers.iter().find(|layer| layer.name == name)
    }
}

// ============================================================================
// Output layers
// ============================================================================

/// Role an entity-based component plays for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkType {
    Agent,
    Patient,
    Location,
    Time,
}

impl LinkType {
    pub const ALL: [LinkType; 4] = [
        LinkType::Agent,
        LinkType::Patient,
        LinkType::Location,
        LinkType::Time,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LinkType::Agent => "agent",
            LinkType::Patient => "patient",
            LinkType::Location => "location",
            LinkType::Time => "time",
        }
    }
}

/// Geography attributes carried by location components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationAttributes {
    pub country: Option<String>,
    pub alternate_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComponentKind {
    Entity,
    Location(LocationAttributes),
}

impl ComponentKind {
    pub fn location() -> Self {
        ComponentKind::Location(LocationAttributes::default())
    }

    pub fn is_location(&self) -> bool {
        matches!(self, ComponentKind::Location(_))
    }
}

/// Canonical slot filler (usually a noun phrase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityBasedComponent {
    pub span: Span,
    pub head_word: Option<WordId>,
    pub quantity: Option<String>,
    /// Rule that created this component
    pub provenance: String,
    pub kind: ComponentKind,
    /// Back references to every link pointing here
    pub component_links: Vec<LinkId>,
    pub containing_entity_mentions: Vec<MentionId>,
}

/// Typed edge between an event and a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentLink {
    pub event: EventId,
    pub component: ComponentId,
    pub link_type: LinkType,
    pub provenance: String,
}

/// Frame-derived argument edge carrying VerbNet/PropBank role names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentLink {
    pub event: EventId,
    pub component: ComponentId,
    pub verbnet_role: String,
    pub frame_element: String,
    pub propbank_role: Option<String>,
    /// Super frame elements traversed to find the VerbNet role
    pub super_frame_elements: Vec<String>,
    pub provenance: String,
}

/// A predicate or event trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMention {
    pub span: Span,
    /// Domain event type, `reporting`, or `other`
    pub event_type: String,
    pub head_word: Option<WordId>,
    pub agent_links: Vec<LinkId>,
    pub patient_links: Vec<LinkId>,
    pub location_links: Vec<LinkId>,
    pub time_links: Vec<LinkId>,
    pub arguments: Vec<ArgumentId>,
    pub frame_name: Option<String>,
    pub quantity: Option<String>,
}

impl EventMention {
    pub fn new(span: Span, event_type: impl Into<String>) -> Self {
        Self {
            span,
            event_type: event_type.into(),
            head_word: None,
            agent_links: Vec::new(),
            patient_links: Vec::new(),
            location_links: Vec::new(),
            time_links: Vec::new(),
            arguments: Vec::new(),
            frame_name: None,
            quantity: None,
        }
    }

    pub fn links(&self, link_type: LinkType) -> &[LinkId] {
        match link_type {
            LinkType::Agent => &self.agent_links,
            LinkType::Patient => &self.patient_links,
            LinkType::Location => &self.location_links,
            LinkType::Time => &self.time_links,
        }
    }

    pub fn links_mut(&mut self, link_type: LinkType) -> &mut Vec<LinkId> {
        match link_type {
            LinkType::Agent => &mut self.agent_links,
            LinkType::Patient => &mut self.patient_links,
            LinkType::Location => &mut self.location_links,
            LinkType::Time => &mut self.time_links,
        }
    }

    pub fn has_links(&self, link_type: LinkType) -> bool {
        !self.links(link_type).is_empty()
    }

    pub fn is_reporting(&self) -> bool {
        self.event_type.starts_with("report")
    }
}

// ============================================================================
// Store
// ============================================================================

/// A document and all of its annotations.
#[derive(Clone, Default)]
pub struct EventDocument {
    text: String,
    words: Vec<Word>,
    sentences: Vec<Sentence>,
    noun_phrases: Vec<NounPhrase>,
    chunks: Vec<Chunk>,
    events: Vec<EventMention>,
    components: Vec<Option<EntityBasedComponent>>,
    links: Vec<Option<ComponentLink>>,
    arguments: Vec<ArgumentLink>,
    entity_mentions: Vec<EntityMention>,
    clusters: Vec<EntityCluster>,
    event_relations: Vec<EventRelation>,
    frames: Vec<FrameAnnotationSet>,
    stanford: DependencyGraph,
    fanse: DependencyGraph,
}

impl std::fmt::Debug for EventDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDocument")
            .field("text_len", &self.text.len())
            .field("words", &self.words.len())
            .field("sentences", &self.sentences.len())
            .field("events", &self.events.len())
            .field("components", &self.components().count())
            .field("links", &self.links.iter().flatten().count())
            .finish()
    }
}

impl EventDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Covered text, or `""` for spans outside the document.
    pub fn text_of(&self, span: Span) -> &str {
        if span.is_implicit() {
            return "";
        }
        self.text.get(span.begin..span.end).unwrap_or("")
    }

    // ------------------------------------------------------------------
    // Ingestion
    // ------------------------------------------------------------------

    /// Append a word. Words must be pushed in text order.
    pub fn push_word(
        &mut self,
        span: Span,
        pos: impl Into<String>,
        lemma: impl Into<String>,
        sentence: usize,
    ) -> WordId {
        let text = self.text_of(span).to_string();
        self.words.push(Word {
            span,
            text,
            lemma: lemma.into(),
            pos: pos.into(),
            sentence,
        });
        WordId(self.words.len() - 1)
    }

    pub fn push_sentence(&mut self, words: WordRange) -> AnnotationResult<usize> {
        let first = self.word_checked(words.start_idx)?.span;
        let last = self.word_checked(words.end_idx)?.span;
        self.sentences.push(Sentence {
            span: first.union(&last),
            words,
        });
        Ok(self.sentences.len() - 1)
    }

    pub fn add_noun_phrase(&mut self, span: Span) {
        self.noun_phrases.push(NounPhrase { span });
    }

    pub fn add_chunk(&mut self, span: Span, tag: impl Into<String>) {
        self.chunks.push(Chunk {
            span,
            tag: tag.into(),
        });
    }

    pub fn add_event(&mut self, event: EventMention) -> EventId {
        self.events.push(event);
        EventId(self.events.len() - 1)
    }

    pub fn add_entity_mention(&mut self, span: Span, entity_type: Option<String>) -> MentionId {
        self.entity_mentions.push(EntityMention {
            span,
            entity_type,
            head_word: None,
            cluster: None,
        });
        MentionId(self.entity_mentions.len() - 1)
    }

    /// Create a cluster holding `mentions`, pointing each mention back at it.
    pub fn add_cluster(&mut self, mentions: Vec<MentionId>) -> ClusterId {
        let id = ClusterId(self.clusters.len());
        for mention in &mentions {
            if let Some(m) = self.entity_mentions.get_mut(mention.0) {
                m.cluster = Some(id);
            }
        }
        self.clusters.push(EntityCluster { mentions });
        id
    }

    pub fn add_event_relation(&mut self, head: EventId, child: EventId, relation_type: impl Into<String>) {
        self.event_relations.push(EventRelation {
            head,
            child,
            relation_type: relation_type.into(),
        });
    }

    pub fn add_frame_set(&mut self, frame: FrameAnnotationSet) {
        self.frames.push(frame);
    }

    // ------------------------------------------------------------------
    // Input accessors
    // ------------------------------------------------------------------

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn word(&self, id: WordId) -> Option<&Word> {
        self.words.get(id.0)
    }

    pub(crate) fn word_checked(&self, index: usize) -> AnnotationResult<&Word> {
        self.words.get(index).ok_or(AnnotationError::UnknownWord {
            index,
            count: self.words.len(),
        })
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn noun_phrases(&self) -> &[NounPhrase] {
        &self.noun_phrases
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn entity_mentions(&self) -> &[EntityMention] {
        &self.entity_mentions
    }

    pub fn entity_mention(&self, id: MentionId) -> Option<&EntityMention> {
        self.entity_mentions.get(id.0)
    }

    pub fn entity_mention_mut(&mut self, id: MentionId) -> Option<&mut EntityMention> {
        self.entity_mentions.get_mut(id.0)
    }

    pub fn clusters(&self) -> &[EntityCluster] {
        &self.clusters
    }

    pub fn cluster(&self, id: ClusterId) -> Option<&EntityCluster> {
        self.clusters.get(id.0)
    }

    pub fn cluster_mut(&mut self, id: ClusterId) -> Option<&mut EntityCluster> {
        self.clusters.get_mut(id.0)
    }

    pub fn event_relations(&self) -> &[EventRelation] {
        &self.event_relations
    }

    pub fn frames(&self) -> &[FrameAnnotationSet] {
        &self.frames
    }

    pub fn graph(&self, backend: DependencyBackend) -> &DependencyGraph {
        match backend {
            DependencyBackend::Stanford => &self.stanford,
            DependencyBackend::Fanse => &self.fanse,
        }
    }

    pub fn graph_mut(&mut self, backend: DependencyBackend) -> &mut DependencyGraph {
        match backend {
            DependencyBackend::Stanford => &mut self.stanford,
            DependencyBackend::Fanse => &mut self.fanse,
        }
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub fn events(&self) -> &[EventMention] {
        &self.events
    }

    pub fn event_ids(&self) -> impl Iterator<Item = EventId> {
        (0..self.events.len()).map(EventId)
    }

    pub fn event(&self, id: EventId) -> Option<&EventMention> {
        self.events.get(id.0)
    }

    pub fn event_mut(&mut self, id: EventId) -> Option<&mut EventMention> {
        self.events.get_mut(id.0)
    }

    pub(crate) fn event_checked(&self, id: EventId) -> AnnotationResult<&EventMention> {
        self.events.get(id.0).ok_or(AnnotationError::UnknownEvent(id))
    }

    pub(crate) fn event_checked_mut(&mut self, id: EventId) -> AnnotationResult<&mut EventMention> {
        self.events.get_mut(id.0).ok_or(AnnotationError::UnknownEvent(id))
    }

    // ------------------------------------------------------------------
    // Components, links and arguments
    // ------------------------------------------------------------------

    /// Live components in creation order.
    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &EntityBasedComponent)> {
        self.components
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_ref().map(|c| (ComponentId(i), c)))
    }

    pub fn component(&self, id: ComponentId) -> Option<&EntityBasedComponent> {
        self.components.get(id.0).and_then(Option::as_ref)
    }

    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut EntityBasedComponent> {
        self.components.get_mut(id.0).and_then(Option::as_mut)
    }

    pub(crate) fn component_checked_mut(
        &mut self,
        id: ComponentId,
    ) -> AnnotationResult<&mut EntityBasedComponent> {
        self.component_mut(id)
            .ok_or(AnnotationError::UnknownComponent(id))
    }

    pub(crate) fn insert_component(&mut self, component: EntityBasedComponent) -> ComponentId {
        self.components.push(Some(component));
        ComponentId(self.components.len() - 1)
    }

    pub(crate) fn take_component(&mut self, id: ComponentId) -> Option<EntityBasedComponent> {
        self.components.get_mut(id.0).and_then(Option::take)
    }

    pub fn link(&self, id: LinkId) -> Option<&ComponentLink> {
        self.links.get(id.0).and_then(Option::as_ref)
    }

    /// Live links in creation order.
    pub fn all_links(&self) -> impl Iterator<Item = (LinkId, &ComponentLink)> {
        self.links
            .iter()
            .enumerate()
            .filter_map(|(i, l)| l.as_ref().map(|l| (LinkId(i), l)))
    }

    pub(crate) fn insert_link(&mut self, link: ComponentLink) -> LinkId {
        self.links.push(Some(link));
        LinkId(self.links.len() - 1)
    }

    pub(crate) fn take_link(&mut self, id: LinkId) -> Option<ComponentLink> {
        self.links.get_mut(id.0).and_then(Option::take)
    }

    /// Components linked to `event` under `link_type`, in list order.
    pub fn linked_components(&self, event: EventId, link_type: LinkType) -> Vec<ComponentId> {
        self.event(event)
            .map(|e| {
                e.links(link_type)
                    .iter()
                    .filter_map(|&l| self.link(l).map(|link| link.component))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn arguments(&self) -> &[ArgumentLink] {
        &self.arguments
    }

    pub fn argument(&self, id: ArgumentId) -> Option<&ArgumentLink> {
        self.arguments.get(id.0)
    }

    /// Record a frame argument and append it to its event.
    pub fn add_argument(&mut self, argument: ArgumentLink) -> AnnotationResult<ArgumentId> {
        let event = argument.event;
        self.event_checked(event)?;
        let id = ArgumentId(self.arguments.len());
        self.arguments.push(argument);
        self.event_checked_mut(event)?.arguments.push(id);
        Ok(id)
    }
}
