//! Heading/body classification of generated text blocks.
//!
//! Generated text carries no markup, so headings are recognised with an ordered list of
//! heuristic rules. The first rule that returns a verdict wins; a block no rule claims is body
//! text. Misclassification is harmless: it only changes formatting.

use crate::constants::{HEADING_KEYWORDS, HEADING_MAX_CHARS};
use regex::Regex;
use std::sync::OnceLock;

/// Visual role of a block in the exported document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Heading,
    Body,
}

/// One heuristic in the classifier's priority list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationRule {
    /// Blocks longer than `max_chars` characters are body text.
    LongBlock { max_chars: usize },
    /// Blocks containing any keyword (case-sensitive substring) are headings.
    Keywords(Vec<String>),
    /// Blocks made only of ASCII uppercase letters and whitespace are headings.
    AllCaps,
    /// Blocks starting with a decimal number followed by a period (`1.`, `12.`) are headings.
    NumberedPrefix,
}

impl ClassificationRule {
    /// Returns a verdict when the rule matches `block`, `None` to defer to the next rule.
    pub fn evaluate(&self, block: &str) -> Option<Classification> {
        match self {
            Self::LongBlock { max_chars } => {
                (block.chars().count() > *max_chars).then_some(Classification::Body)
            }
            Self::Keywords(keywords) => keywords
                .iter()
                .any(|keyword| block.contains(keyword.as_str()))
                .then_some(Classification::Heading),
            Self::AllCaps => all_caps_re()
                .is_match(block)
                .then_some(Classification::Heading),
            Self::NumberedPrefix => numbered_prefix_re()
                .is_match(block)
                .then_some(Classification::Heading),
        }
    }
}

fn all_caps_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z\s]+$").expect("static regex"))
}

fn numbered_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+\.").expect("static regex"))
}

/// Priority-ordered rule list deciding whether a block is a heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    rules: Vec<ClassificationRule>,
}

impl Classifier {
    /// Creates a classifier from an explicit rule list, evaluated in order.
    pub fn new(rules: Vec<ClassificationRule>) -> Self {
        Self { rules }
    }

    /// The discovery-document rule set with a custom heading length limit.
    pub fn with_heading_limit(max_chars: usize) -> Self {
        Self::new(vec![
            ClassificationRule::LongBlock { max_chars },
            ClassificationRule::Keywords(HEADING_KEYWORDS.iter().map(|k| k.to_string()).collect()),
            ClassificationRule::AllCaps,
            ClassificationRule::NumberedPrefix,
        ])
    }

    /// Classifies a single block. The block is trimmed before the rules see it.
    pub fn classify(&self, block: &str) -> Classification {
        let block = block.trim();
        if block.is_empty() {
            return Classification::Body;
        }
        self.rules
            .iter()
            .find_map(|rule| rule.evaluate(block))
            .unwrap_or(Classification::Body)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::with_heading_limit(HEADING_MAX_CHARS)
    }
}
