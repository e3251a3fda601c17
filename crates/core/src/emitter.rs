//! Turns generated text plus case metadata into the ordered paragraph list of the export.
//!
//! Output order: header paragraphs for each present metadata field, one spacing paragraph,
//! then the content blocks in the order they appear in the text. Headings become a single
//! bold run; body blocks go through the splitter and become one justified paragraph per chunk.
//! The result depends only on the inputs.

use crate::classify::{Classification, Classifier};
use crate::config::CoreConfig;
use crate::constants::{BODY_FONT_SIZE, HEADER_FONT_SIZE, HEADING_FONT_SIZE, TITLE_FONT_SIZE};
use crate::document::{Alignment, CaseMetadata, Paragraph, ParagraphKind, Run};
use crate::split::split_paragraph;
use discovery_types::NonEmptyText;
use regex::Regex;
use std::sync::OnceLock;

/// Twips of space after content paragraphs.
const CONTENT_SPACING_AFTER: u32 = 120;

fn blank_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\r?\n[ \t]*\r?\n").expect("static regex"))
}

/// Partitions text into trimmed, non-empty blocks on blank-line boundaries.
pub fn split_blocks(text: &str) -> impl Iterator<Item = &str> {
    blank_line_re()
        .split(text)
        .map(str::trim)
        .filter(|block| !block.is_empty())
}

#[derive(Debug, Clone)]
pub struct DocumentEmitter {
    classifier: Classifier,
    max_run_length: usize,
}

impl DocumentEmitter {
    pub fn new(classifier: Classifier, max_run_length: usize) -> Self {
        Self {
            classifier,
            max_run_length,
        }
    }

    pub fn from_config(cfg: &CoreConfig) -> Self {
        Self::new(Classifier::default(), cfg.max_run_length())
    }

    /// Emits the full paragraph sequence for an export.
    ///
    /// `content` is non-empty by construction; callers reject blank text before reaching here.
    pub fn emit(&self, content: &NonEmptyText, metadata: &CaseMetadata) -> Vec<Paragraph> {
        let mut paragraphs = header_paragraphs(metadata);
        paragraphs.push(spacing_paragraph());
        paragraphs.extend(self.content_paragraphs(content.as_str()));

        tracing::debug!(
            paragraphs = paragraphs.len(),
            max_run_length = self.max_run_length,
            "emitted document paragraphs"
        );
        paragraphs
    }

    /// Classifies and formats every block of `text`.
    pub fn content_paragraphs(&self, text: &str) -> Vec<Paragraph> {
        let mut paragraphs = Vec::new();
        for block in split_blocks(text) {
            match self.classifier.classify(block) {
                Classification::Heading => paragraphs.push(
                    Paragraph::new(
                        ParagraphKind::Heading,
                        Alignment::Left,
                        vec![Run::new(block, true, HEADING_FONT_SIZE)],
                    )
                    .with_spacing_after(CONTENT_SPACING_AFTER),
                ),
                Classification::Body => {
                    paragraphs.extend(split_paragraph(block, self.max_run_length).into_iter().map(
                        |chunk| {
                            Paragraph::new(
                                ParagraphKind::Body,
                                Alignment::Justify,
                                vec![Run::new(chunk, false, BODY_FONT_SIZE)],
                            )
                            .with_spacing_after(CONTENT_SPACING_AFTER)
                        },
                    ))
                }
            }
        }
        paragraphs
    }
}

impl Default for DocumentEmitter {
    fn default() -> Self {
        Self::from_config(&CoreConfig::default())
    }
}

/// Title, case number and jurisdiction lines; absent fields produce no paragraph.
pub fn header_paragraphs(metadata: &CaseMetadata) -> Vec<Paragraph> {
    let mut paragraphs = Vec::with_capacity(3);
    if let Some(title) = &metadata.case_title {
        paragraphs.push(Paragraph::new(
            ParagraphKind::Title,
            Alignment::Center,
            vec![Run::new(title.as_str(), true, TITLE_FONT_SIZE)],
        ));
    }
    if let Some(number) = &metadata.case_number {
        paragraphs.push(Paragraph::new(
            ParagraphKind::Header,
            Alignment::Center,
            vec![Run::new(
                format!("Case No.: {number}"),
                false,
                HEADER_FONT_SIZE,
            )],
        ));
    }
    if let Some(jurisdiction) = &metadata.jurisdiction {
        paragraphs.push(Paragraph::new(
            ParagraphKind::Header,
            Alignment::Center,
            vec![Run::new(jurisdiction.as_str(), false, HEADER_FONT_SIZE)],
        ));
    }
    paragraphs
}

fn spacing_paragraph() -> Paragraph {
    Paragraph::new(
        ParagraphKind::Spacing,
        Alignment::Left,
        vec![Run::new("", false, BODY_FONT_SIZE)],
    )
}
