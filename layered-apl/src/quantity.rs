//! Quantities for components and events.
//!
//! Digits are normalised by dropping group separators ("1,200" -> "1200").
//! Number words go through [`NumberRules`]: cardinals up to twenty, the
//! tens, "dozen", and the multipliers hundred/thousand/million/billion are
//! built in, and a rule file can add more.
//!
//! Rule file format, one rule per line:
//!
//! ```text
//! # word<TAB>value
//! score	20
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use layered_events::{
    AnnotationResult, ComponentId, DependencyBackend, DocumentResolver, EventDocument, EventId,
};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, error, warn};

use crate::candidates::event_head_node;
use crate::NumberRuleError;

static DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?$").expect("valid regex"));

const BUILTIN_WORDS: &[(&str, u64)] = &[
    ("zero", 0),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
    ("sixteen", 16),
    ("seventeen", 17),
    ("eighteen", 18),
    ("nineteen", 19),
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
    ("dozen", 12),
    ("hundred", 100),
    ("thousand", 1_000),
    ("million", 1_000_000),
    ("billion", 1_000_000_000),
];

/// Word -> value table used to normalise spelled-out numbers.
#[derive(Debug, Clone)]
pub struct NumberRules {
    words: HashMap<String, u64>,
}

impl Default for NumberRules {
    fn default() -> Self {
        Self::builtin()
    }
}

impl NumberRules {
    pub fn builtin() -> Self {
        Self {
            words: BUILTIN_WORDS.iter().map(|&(w, v)| (w.to_string(), v)).collect(),
        }
    }

    /// Built-in rules extended by the rule file at `path`.
    pub fn load(path: &Path) -> Result<Self, NumberRuleError> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            error!(path = %path.display(), %source, "cannot read number rules");
            NumberRuleError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::parse(&text, path)
    }

    pub fn parse(text: &str, path: &Path) -> Result<Self, NumberRuleError> {
        let mut rules = Self::builtin();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let parsed = line
                .split_once('\t')
                .and_then(|(word, value)| Some((word.trim(), value.trim().parse::<u64>().ok()?)))
                .filter(|(word, _)| !word.is_empty());
            let Some((word, value)) = parsed else {
                error!(path = %path.display(), line = i + 1, "malformed number rule");
                return Err(NumberRuleError::Malformed {
                    path: path.to_path_buf(),
                    line: i + 1,
                    content: line.to_string(),
                });
            };
            rules.insert(word, value);
        }
        Ok(rules)
    }

    pub fn insert(&mut self, word: &str, value: u64) {
        self.words.insert(word.to_lowercase(), value);
    }

    pub fn value_of(&self, word: &str) -> Option<u64> {
        self.words.get(&word.to_lowercase()).copied()
    }

    /// Canonical digit string for `text`, if it reads as a number.
    pub fn normalize(&self, text: &str) -> Option<String> {
        let text = text.trim();
        if DIGITS.is_match(text) {
            return Some(text.replace(',', ""));
        }
        self.spelled_out(text).map(|v| v.to_string())
    }

    /// "twenty-five", "two hundred and ten", "3 million" style numbers.
    fn spelled_out(&self, text: &str) -> Option<u64> {
        let mut total: u64 = 0;
        let mut current: u64 = 0;
        let mut seen = false;
        for token in text.split(|c: char| c.is_whitespace() || c == '-').filter(|t| !t.is_empty()) {
            if token.eq_ignore_ascii_case("and") && seen {
                continue;
            }
            let named = self.value_of(token);
            let value = match named {
                Some(value) => value,
                None => token.parse::<u64>().ok()?,
            };
            seen = true;
            match named {
                Some(100) => current = current.max(1).checked_mul(100)?,
                Some(multiplier) if multiplier >= 1_000 => {
                    total = total.checked_add(current.max(1).checked_mul(multiplier)?)?;
                    current = 0;
                }
                _ => current = current.checked_add(value)?,
            }
        }
        if seen {
            total.checked_add(current)
        } else {
            None
        }
    }
}

/// Order two quantities numerically.
///
/// `None` when either side is unset or does not parse.
pub fn compare_quantities(a: Option<&str>, b: Option<&str>) -> Option<Ordering> {
    let (a, b) = (a?, b?);
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y),
        _ => {
            warn!(a, b, "cannot compare quantities");
            None
        }
    }
}

/// Sets `quantity` on components from a `CD` token or a `NUMBER` mention,
/// and on events from a `num`/`nummod` dependent of their head.
///
/// Existing quantities are never overwritten.
#[derive(Debug, Clone, Default)]
pub struct NumberAnnotator {
    rules: Arc<NumberRules>,
}

impl NumberAnnotator {
    pub fn new(rules: Arc<NumberRules>) -> Self {
        Self { rules }
    }

    fn component_quantity(&self, doc: &EventDocument, id: ComponentId) -> Option<String> {
        let span = doc.component(id)?.span;
        let from_token = doc
            .words_of(span)
            .find(|w| w.pos == "CD")
            .and_then(|w| self.rules.normalize(&w.text));
        from_token.or_else(|| {
            doc.entity_mentions()
                .iter()
                .filter(|m| span.contains(&m.span) && m.has_type(&["NUMBER"]))
                .find_map(|m| self.rules.normalize(doc.text_of(m.span)))
        })
    }

    fn event_quantity(&self, doc: &EventDocument, id: EventId) -> Option<String> {
        let backend = DependencyBackend::Stanford;
        let head = event_head_node(doc, backend, id)?;
        doc.graph(backend)
            .children_where(head, |r| r == "num" || r == "nummod")
            .filter_map(|child| doc.word_for_node(backend, child))
            .filter_map(|w| doc.word(w))
            .find_map(|w| self.rules.normalize(&w.text))
    }
}

impl DocumentResolver for NumberAnnotator {
    fn name(&self) -> &'static str {
        "number-annotator"
    }

    fn resolve(&self, doc: &mut EventDocument) -> AnnotationResult<()> {
        let components: Vec<ComponentId> = doc
            .components()
            .filter(|(_, c)| c.quantity.is_none())
            .map(|(id, _)| id)
            .collect();
        for id in components {
            if let Some(quantity) = self.component_quantity(doc, id) {
                debug!(?id, %quantity, "component quantity");
                if let Some(component) = doc.component_mut(id) {
                    component.quantity = Some(quantity);
                }
            }
        }

        for id in doc.event_ids().collect::<Vec<_>>() {
            if doc.event(id).map_or(true, |e| e.quantity.is_some()) {
                continue;
            }
            if let Some(quantity) = self.event_quantity(doc, id) {
                debug!(?id, %quantity, "event quantity");
                if let Some(event) = doc.event_mut(id) {
                    event.quantity = Some(quantity);
                }
            }
        }
        Ok(())
    }
}
