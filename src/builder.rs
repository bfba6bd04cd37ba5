//! Word-indexed construction of [`EventDocument`]s.
//!
//! Upstream collaborators (tokeniser, parsers, recognisers) usually report
//! their output against token positions. `DocumentBuilder` accepts exactly
//! that and computes character offsets by joining tokens with single spaces.
//!
//! ```
//! use layered_events::DocumentBuilder;
//!
//! let doc = DocumentBuilder::new()
//!     .sentence(&[("John", "NNP"), ("resigned", "VBD")])
//!     .entity(0, 0, "PERSON")
//!     .event(1, 1, "event")
//!     .stanford(1, 0, "nsubj")
//!     .build()
//!     .unwrap();
//! assert_eq!(doc.text(), "John resigned");
//! ```

use crate::{
    AnnotationError, AnnotationResult, DependencyBackend, EventDocument, EventMention,
    FrameAnnotationSet, FrameLabel, FrameLayer, MentionId, NodeId, Span, WordRange,
};

struct PendingFrame {
    frame_name: String,
    target: (usize, usize),
    elements: Vec<(String, usize, usize)>,
}

/// Builder over word indices (global across sentences, inclusive ranges).
#[derive(Default)]
pub struct DocumentBuilder {
    /// `(text, pos, lemma)` per token
    sentences: Vec<Vec<(String, String, String)>>,
    noun_phrases: Vec<(usize, usize)>,
    chunks: Vec<(usize, usize, String)>,
    events: Vec<(usize, usize, String)>,
    entities: Vec<(usize, usize, Option<String>)>,
    clusters: Vec<Vec<usize>>,
    stanford: Vec<(Option<usize>, usize, String)>,
    fanse: Vec<(Option<usize>, usize, String)>,
    semantic: Vec<(usize, usize, String)>,
    frames: Vec<PendingFrame>,
    event_relations: Vec<(usize, usize, String)>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sentence of `(text, pos)` tokens, lemmatised by lower-casing.
    pub fn sentence(mut self, tokens: &[(&str, &str)]) -> Self {
        self.sentences.push(
            tokens
                .iter()
                .map(|(text, pos)| (text.to_string(), pos.to_string(), text.to_lowercase()))
                .collect(),
        );
        self
    }

    /// Append a sentence of `(text, pos, lemma)` tokens.
    pub fn sentence_with_lemmas(mut self, tokens: &[(&str, &str, &str)]) -> Self {
        self.sentences.push(
            tokens
                .iter()
                .map(|(text, pos, lemma)| (text.to_string(), pos.to_string(), lemma.to_string()))
                .collect(),
        );
        self
    }

    pub fn noun_phrase(mut self, first: usize, last: usize) -> Self {
        self.noun_phrases.push((first, last));
        self
    }

    pub fn chunk(mut self, first: usize, last: usize, tag: &str) -> Self {
        self.chunks.push((first, last, tag.to_string()));
        self
    }

    pub fn event(mut self, first: usize, last: usize, event_type: &str) -> Self {
        self.events.push((first, last, event_type.to_string()));
        self
    }

    pub fn entity(mut self, first: usize, last: usize, entity_type: &str) -> Self {
        self.entities.push((first, last, Some(entity_type.to_string())));
        self
    }

    pub fn untyped_entity(mut self, first: usize, last: usize) -> Self {
        self.entities.push((first, last, None));
        self
    }

    /// Cluster entity mentions by the order they were added.
    pub fn cluster(mut self, mentions: &[usize]) -> Self {
        self.clusters.push(mentions.to_vec());
        self
    }

    pub fn stanford(mut self, head: usize, child: usize, relation: &str) -> Self {
        self.stanford.push((Some(head), child, relation.to_string()));
        self
    }

    pub fn stanford_root(mut self, word: usize) -> Self {
        self.stanford.push((None, word, "root".to_string()));
        self
    }

    pub fn fanse(mut self, head: usize, child: usize, relation: &str) -> Self {
        self.fanse.push((Some(head), child, relation.to_string()));
        self
    }

    pub fn fanse_root(mut self, word: usize) -> Self {
        self.fanse.push((None, word, "root".to_string()));
        self
    }

    /// Semantic relation on the Fanse graph, e.g. `ARG0` or `ARG1-INVERTED`.
    pub fn semantic(mut self, predicate: usize, argument: usize, label: &str) -> Self {
        self.semantic.push((predicate, argument, label.to_string()));
        self
    }

    pub fn frame(mut self, frame_name: &str, target: (usize, usize), elements: &[(&str, usize, usize)]) -> Self {
        self.frames.push(PendingFrame {
            frame_name: frame_name.to_string(),
            target,
            elements: elements
                .iter()
                .map(|(name, first, last)| (name.to_string(), *first, *last))
                .collect(),
        });
        self
    }

    /// Relation between events by the order they were added.
    pub fn event_relation(mut self, head: usize, child: usize, relation_type: &str) -> Self {
        self.event_relations.push((head, child, relation_type.to_string()));
        self
    }

    pub fn build(self) -> AnnotationResult<EventDocument> {
        let mut text = String::new();
        let mut spans = Vec::new();
        let mut sentence_of = Vec::new();
        for (s_idx, sentence) in self.sentences.iter().enumerate() {
            for (token, _, _) in sentence {
                if !text.is_empty() {
                    text.push(' ');
                }
                let begin = text.len();
                text.push_str(token);
                spans.push(Span::new(begin, text.len()));
                sentence_of.push(s_idx);
            }
        }

        let mut doc = EventDocument::new(text);
        let mut next = 0;
        for (s_idx, sentence) in self.sentences.iter().enumerate() {
            if sentence.is_empty() {
                continue;
            }
            let first = next;
            for (_, pos, lemma) in sentence {
                doc.push_word(spans[next], pos.clone(), lemma.clone(), s_idx);
                next += 1;
            }
            doc.push_sentence(WordRange::new(first, next - 1))?;
        }

        let range = |first: usize, last: usize| -> AnnotationResult<Span> {
            if first > last {
                return Err(AnnotationError::InvalidSpan {
                    begin: first,
                    end: last,
                });
            }
            let count = spans.len();
            let start = spans
                .get(first)
                .ok_or(AnnotationError::UnknownWord { index: first, count })?;
            let end = spans
                .get(last)
                .ok_or(AnnotationError::UnknownWord { index: last, count })?;
            Ok(start.union(end))
        };

        for &(first, last) in &self.noun_phrases {
            doc.add_noun_phrase(range(first, last)?);
        }
        for (first, last, tag) in &self.chunks {
            doc.add_chunk(range(*first, *last)?, tag.clone());
        }
        for (first, last, event_type) in &self.events {
            doc.add_event(EventMention::new(range(*first, *last)?, event_type.clone()));
        }
        for (first, last, entity_type) in &self.entities {
            doc.add_entity_mention(range(*first, *last)?, entity_type.clone());
        }
        for cluster in &self.clusters {
            let mentions = cluster.iter().map(|&m| MentionId(m)).collect();
            doc.add_cluster(mentions);
        }

        for backend in [DependencyBackend::Stanford, DependencyBackend::Fanse] {
            let graph = doc.graph_mut(backend);
            for span in &spans {
                graph.add_node(*span);
            }
            let edges = match backend {
                DependencyBackend::Stanford => &self.stanford,
                DependencyBackend::Fanse => &self.fanse,
            };
            for (head, child, relation) in edges {
                graph.add_edge(head.map(NodeId), NodeId(*child), relation.clone())?;
            }
        }
        for (predicate, argument, label) in &self.semantic {
            doc.graph_mut(DependencyBackend::Fanse).add_semantic_relation(
                NodeId(*predicate),
                NodeId(*argument),
                label.clone(),
            )?;
        }

        for frame in &self.frames {
            let target = FrameLayer {
                name: "Target".to_string(),
                labels: vec![FrameLabel {
                    name: "Target".to_string(),
                    span: range(frame.target.0, frame.target.1)?,
                }],
            };
            let mut elements = Vec::new();
            for (name, first, last) in &frame.elements {
                elements.push(FrameLabel {
                    name: name.clone(),
                    span: range(*first, *last)?,
                });
            }
            doc.add_frame_set(FrameAnnotationSet {
                frame_name: frame.frame_name.clone(),
                layers: vec![
                    target,
                    FrameLayer {
                        name: "FE".to_string(),
                        labels: elements,
                    },
                ],
            });
        }

        for (head, child, relation_type) in &self.event_relations {
            doc.add_event_relation(crate::EventId(*head), crate::EventId(*child), relation_type.clone());
        }

        doc.assign_head_words();
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_join_tokens_with_spaces() {
        let doc = DocumentBuilder::new()
            .sentence(&[("Dozens", "NNS"), ("Killed", "VBN")])
            .sentence(&[("Police", "NNS"), ("said", "VBD"), (".", ".")])
            .build()
            .unwrap();
        assert_eq!(doc.text(), "Dozens Killed Police said .");
        assert_eq!(doc.words()[2].span, Span::new(14, 20));
        assert_eq!(doc.words()[2].sentence, 1);
        assert_eq!(doc.sentences()[1].words, WordRange::new(2, 4));
        assert_eq!(doc.words()[0].lemma, "dozens");
    }

    #[test]
    fn explicit_lemmas() {
        let doc = DocumentBuilder::new()
            .sentence_with_lemmas(&[("Rebels", "NNS", "rebel"), ("fled", "VBD", "flee")])
            .build()
            .unwrap();
        assert_eq!(doc.words()[1].lemma, "flee");
        assert_eq!(doc.words()[1].text, "fled");
    }

    #[test]
    fn out_of_range_annotations_fail() {
        let err = DocumentBuilder::new()
            .sentence(&[("Hi", "UH")])
            .event(0, 3, "event")
            .build()
            .unwrap_err();
        assert_eq!(err, AnnotationError::UnknownWord { index: 3, count: 1 });
    }

    #[test]
    fn frames_get_target_and_fe_layers() {
        let doc = DocumentBuilder::new()
            .sentence(&[("Troops", "NNS"), ("attacked", "VBD"), ("Kabul", "NNP")])
            .frame("Attack", (1, 1), &[("Assailant", 0, 0), ("Victim", 2, 2)])
            .build()
            .unwrap();
        let frame = &doc.frames()[0];
        assert_eq!(frame.layer("Target").unwrap().labels.len(), 1);
        let fes = &frame.layer("FE").unwrap().labels;
        assert_eq!(fes[1].name, "Victim");
        assert_eq!(doc.text_of(fes[1].span), "Kabul");
    }
}
