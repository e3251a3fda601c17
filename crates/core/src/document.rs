//! In-memory document model and its WordprocessingML rendering.
//!
//! A document body is an ordered list of [`Paragraph`]s, each holding formatted [`Run`]s.
//! Rendering is a straight walk over that list; every text value is cleared of characters XML
//! cannot carry and then goes through [`escape_xml`] exactly once, here.

use crate::escape::{escape_xml, replace_invalid_xml_chars};
use discovery_types::NonEmptyText;

/// Raw text returned by the AI collaborator. Paragraphs are separated by blank lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    pub text: String,
}

impl GeneratedDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Optional header fields shown at the top of the exported document.
///
/// Blank values are normalised to `None` so no empty header paragraph is ever emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseMetadata {
    pub case_title: Option<NonEmptyText>,
    pub case_number: Option<NonEmptyText>,
    pub jurisdiction: Option<NonEmptyText>,
}

impl CaseMetadata {
    pub fn from_fields(
        case_title: Option<impl AsRef<str>>,
        case_number: Option<impl AsRef<str>>,
        jurisdiction: Option<impl AsRef<str>>,
    ) -> Self {
        Self {
            case_title: NonEmptyText::from_optional(case_title),
            case_number: NonEmptyText::from_optional(case_number),
            jurisdiction: NonEmptyText::from_optional(jurisdiction),
        }
    }
}

impl From<&api_shared::CaseMetadataData> for CaseMetadata {
    fn from(data: &api_shared::CaseMetadataData) -> Self {
        Self::from_fields(
            data.case_title.as_deref(),
            data.case_number.as_deref(),
            data.jurisdiction.as_deref(),
        )
    }
}

/// A contiguous span of text sharing one set of formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    /// Font size in half-points (`22` is 11pt).
    pub size: u32,
}

impl Run {
    pub fn new(text: impl Into<String>, bold: bool, size: u32) -> Self {
        Self {
            text: text.into(),
            bold,
            size,
        }
    }

    fn write_xml(&self, out: &mut String) {
        out.push_str("<w:r><w:rPr>");
        if self.bold {
            out.push_str("<w:b/>");
        }
        out.push_str(&format!(r#"<w:sz w:val="{}"/>"#, self.size));
        out.push_str(r#"</w:rPr><w:t xml:space="preserve">"#);
        out.push_str(&escape_xml(&replace_invalid_xml_chars(&self.text)));
        out.push_str("</w:t></w:r>");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Justify,
}

impl Alignment {
    fn ooxml_value(self) -> Option<&'static str> {
        match self {
            Self::Left => None,
            Self::Center => Some("center"),
            Self::Justify => Some("both"),
        }
    }
}

/// Where a paragraph came from; used by the preview and by tests, not by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParagraphKind {
    Title,
    Header,
    Spacing,
    Heading,
    Body,
}

impl ParagraphKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Header => "header",
            Self::Spacing => "spacing",
            Self::Heading => "heading",
            Self::Body => "body",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub kind: ParagraphKind,
    pub alignment: Alignment,
    /// Space after the paragraph, in twentieths of a point.
    pub spacing_after: Option<u32>,
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn new(kind: ParagraphKind, alignment: Alignment, runs: Vec<Run>) -> Self {
        Self {
            kind,
            alignment,
            spacing_after: None,
            runs,
        }
    }

    pub fn with_spacing_after(mut self, twips: u32) -> Self {
        self.spacing_after = Some(twips);
        self
    }

    /// Concatenated text of every run.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    fn write_xml(&self, out: &mut String) {
        out.push_str("<w:p>");
        let jc = self.alignment.ooxml_value();
        if jc.is_some() || self.spacing_after.is_some() {
            out.push_str("<w:pPr>");
            if let Some(after) = self.spacing_after {
                out.push_str(&format!(r#"<w:spacing w:after="{after}"/>"#));
            }
            if let Some(jc) = jc {
                out.push_str(&format!(r#"<w:jc w:val="{jc}"/>"#));
            }
            out.push_str("</w:pPr>");
        }
        for run in &self.runs {
            run.write_xml(out);
        }
        out.push_str("</w:p>");
    }
}

/// Renders the main document part: one `w:body` whose only children are the given paragraphs.
pub fn render_document_xml(paragraphs: &[Paragraph]) -> String {
    let mut out = String::with_capacity(256 + paragraphs.len() * 160);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(&format!(
        r#"<w:document xmlns:w="{}"><w:body>"#,
        crate::constants::WORDPROCESSING_NS
    ));
    for paragraph in paragraphs {
        paragraph.write_xml(&mut out);
    }
    out.push_str("</w:body></w:document>");
    out
}
