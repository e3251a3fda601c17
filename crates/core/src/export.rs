//! End-to-end export of generated text to a `.docx` download.

use crate::constants::{EXPORT_FILENAME_FALLBACK, EXPORT_FILENAME_PREFIX};
use crate::document::{CaseMetadata, Paragraph};
use crate::emitter::DocumentEmitter;
use crate::package::PackageAssembler;
use crate::{CoreConfig, DiscoveryError, DiscoveryResult};
use discovery_types::NonEmptyText;

/// A finished export, ready to be sent as an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub paragraph_count: usize,
}

/// Replaces every character outside `[A-Za-z0-9]` with `_`.
pub fn sanitize_filename_component(input: &str) -> String {
    input
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// `Discovery_Request_<sanitised case number>.docx`, or `Discovery_Request_Document.docx`
/// when the case number is absent.
pub fn export_filename(metadata: &CaseMetadata) -> String {
    let stem = metadata
        .case_number
        .as_ref()
        .map(|number| sanitize_filename_component(number.as_str()))
        .unwrap_or_else(|| EXPORT_FILENAME_FALLBACK.to_string());
    format!("{EXPORT_FILENAME_PREFIX}{stem}.docx")
}

/// Drives emitter and assembler for one export request. Holds no per-request state.
#[derive(Debug, Clone, Default)]
pub struct ExportService {
    emitter: DocumentEmitter,
    assembler: PackageAssembler,
}

impl ExportService {
    pub fn new(emitter: DocumentEmitter) -> Self {
        Self {
            emitter,
            assembler: PackageAssembler::new(),
        }
    }

    pub fn from_config(cfg: &CoreConfig) -> Self {
        Self::new(DocumentEmitter::from_config(cfg))
    }

    /// Classified paragraphs for `content`, exactly as the export would lay them out.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::NoContent` if `content` is absent or blank.
    pub fn preview(
        &self,
        content: Option<&str>,
        metadata: &CaseMetadata,
    ) -> DiscoveryResult<Vec<Paragraph>> {
        let content = require_content(content)?;
        Ok(self.emitter.emit(&content, metadata))
    }

    /// Builds the `.docx` package for `content`.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::NoContent` if `content` is absent or blank, and a package error
    /// if the archive cannot be written. No partial output is returned.
    pub fn export(
        &self,
        content: Option<&str>,
        metadata: &CaseMetadata,
    ) -> DiscoveryResult<ExportedDocument> {
        let content = require_content(content)?;
        tracing::info!(
            content_length = content.as_str().len(),
            case_number = metadata.case_number.as_ref().map(NonEmptyText::as_str),
            "DOCX generation started"
        );

        let paragraphs = self.emitter.emit(&content, metadata);
        let package = self.assembler.assemble(&paragraphs, metadata)?;
        let bytes = package.to_bytes()?;

        let exported = ExportedDocument {
            filename: export_filename(metadata),
            bytes,
            paragraph_count: paragraphs.len(),
        };
        tracing::info!(
            filename = %exported.filename,
            bytes = exported.bytes.len(),
            paragraphs = exported.paragraph_count,
            "DOCX generated"
        );
        Ok(exported)
    }
}

fn require_content(content: Option<&str>) -> DiscoveryResult<NonEmptyText> {
    content
        .and_then(|text| NonEmptyText::new(text).ok())
        .ok_or(DiscoveryError::NoContent)
}
