//! Text rendering of one sentence and the annotations over it.
//!
//! ```text
//! Rebels  attacked  the  town
//!         ╰──────╯Event(attack)
//! ╰────╯Agent(attacked)
//!                   ╰───────╯Patient(attacked)
//! ```

use std::fmt::Write;

use unicode_width::UnicodeWidthStr;

use crate::{EventDocument, LinkType, Span, WordRange};

pub struct SentenceDisplay<'a> {
    doc: &'a EventDocument,
    sentence: usize,
    /// Included annotations as sentence-local word ranges and labels
    lines: Vec<(WordRange, String)>,
}

impl<'a> SentenceDisplay<'a> {
    pub fn new(doc: &'a EventDocument, sentence: usize) -> Self {
        SentenceDisplay {
            doc,
            sentence,
            lines: Vec::new(),
        }
    }

    /// Sentence-local word range of `span`, if it lies inside this sentence.
    fn local_range(&self, span: Span) -> Option<WordRange> {
        let bounds = self.doc.sentences().get(self.sentence)?.words;
        let range = self.doc.word_range(span)?;
        if range.start_idx < bounds.start_idx || range.end_idx > bounds.end_idx {
            return None;
        }
        Some(WordRange::new(
            range.start_idx - bounds.start_idx,
            range.end_idx - bounds.start_idx,
        ))
    }

    pub fn include_events(&mut self) {
        for event in self.doc.events() {
            if let Some(range) = self.local_range(event.span) {
                self.lines.push((range, format!("Event({})", event.event_type)));
            }
        }
    }

    /// Role links of events in this sentence whose component is also here.
    pub fn include_links(&mut self) {
        for id in self.doc.event_ids() {
            let Some(event) = self.doc.event(id) else {
                continue;
            };
            if self.local_range(event.span).is_none() {
                continue;
            }
            let trigger = self.doc.text_of(event.span);
            for link_type in LinkType::ALL {
                for component in self.doc.linked_components(id, link_type) {
                    let Some(span) = self.doc.component(component).map(|c| c.span) else {
                        continue;
                    };
                    if let Some(range) = self.local_range(span) {
                        self.lines.push((range, format!("{:?}({})", link_type, trigger)));
                    }
                }
            }
        }
    }

    pub fn include_entities(&mut self) {
        for mention in self.doc.entity_mentions() {
            if let Some(range) = self.local_range(mention.span) {
                let label = mention.entity_type.as_deref().unwrap_or("?");
                self.lines.push((range, format!("Entity({})", label)));
            }
        }
    }

    pub fn with_events(mut self) -> Self {
        self.include_events();
        self
    }

    pub fn with_links(mut self) -> Self {
        self.include_links();
        self
    }

    pub fn with_entities(mut self) -> Self {
        self.include_entities();
        self
    }
}

impl<'a> std::fmt::Display for SentenceDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const SPACE_PADDING: usize = 2;
        let Some(sentence) = self.doc.sentences().get(self.sentence) else {
            return Ok(());
        };

        let mut starts = Vec::new();
        let mut ends = Vec::new();
        let mut opening_line = String::new();
        for (i, word) in sentence
            .words
            .iter()
            .filter_map(|w| self.doc.word(crate::WordId(w)))
            .enumerate()
        {
            if i > 0 {
                opening_line.extend(std::iter::repeat(' ').take(SPACE_PADDING));
            }
            starts.push(UnicodeWidthStr::width(&*opening_line));
            opening_line.push_str(&word.text);
            ends.push(UnicodeWidthStr::width(&*opening_line));
        }
        f.write_str(&opening_line)?;

        for (range, label) in &self.lines {
            let (Some(&start), Some(&end)) = (starts.get(range.start_idx), ends.get(range.end_idx)) else {
                continue;
            };
            f.write_char('\n')?;
            for _ in 0..start {
                f.write_char(' ')?;
            }
            f.write_char('╰')?;
            for _ in (start + 1)..end.saturating_sub(1) {
                f.write_char('─')?;
            }
            if end - start > 1 {
                f.write_char('╯')?;
            }
            f.write_str(label)?;
        }

        Ok(())
    }
}
