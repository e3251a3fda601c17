//! Minimal OOXML WordprocessingML package assembly.
//!
//! A `.docx` file is a zip archive of XML parts tied together by two manifests:
//!
//! ```text
//! [Content_Types].xml            # default extensions + per-part overrides
//! _rels/.rels                    # package relationships -> document, core properties
//! docProps/core.xml              # title/subject metadata
//! word/document.xml              # w:document/w:body/w:p*
//! word/_rels/document.xml.rels   # document relationships (none needed)
//! ```
//!
//! Both manifests are generated from the part list, and [`Package::validate`] re-checks that
//! every relationship target and required part exists before any bytes are written.

use crate::constants::{
    CONTENT_TYPES_NS, CONTENT_TYPES_PART, CORE_PROPERTIES_CONTENT_TYPE, CORE_PROPERTIES_PART,
    CORE_PROPERTIES_REL_TYPE, DOCUMENT_MAIN_CONTENT_TYPE, DOCUMENT_PART, DOCUMENT_RELS_PART,
    OFFICE_DOCUMENT_REL_TYPE, PACKAGE_RELATIONSHIPS_NS, PACKAGE_RELS_PART,
    RELATIONSHIPS_CONTENT_TYPE, XML_CONTENT_TYPE,
};
use crate::document::{render_document_xml, CaseMetadata, Paragraph, ParagraphKind};
use crate::escape::{escape_xml, replace_invalid_xml_chars};
use crate::{DiscoveryError, DiscoveryResult};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Subject written to the core properties of every export.
const DOCUMENT_SUBJECT: &str = "Discovery Request";

/// A named part of the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagePart {
    /// Zip entry name, without a leading slash.
    pub name: String,
    /// Explicit content type, declared as an `Override`. `None` falls back to the defaults.
    pub content_type: Option<&'static str>,
    pub data: Vec<u8>,
}

/// A relationship from the package root to one of its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: &'static str,
    pub target: String,
}

/// In-memory package: every part plus the package-level relationships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    parts: Vec<PackagePart>,
    relationships: Vec<Relationship>,
}

impl Package {
    pub fn parts(&self) -> &[PackagePart] {
        &self.parts
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn part(&self, name: &str) -> Option<&PackagePart> {
        self.parts.iter().find(|part| part.name == name)
    }

    /// Checks that the manifests only reference parts that exist.
    pub fn validate(&self) -> DiscoveryResult<()> {
        for rel in &self.relationships {
            if self.part(&rel.target).is_none() {
                return Err(DiscoveryError::InvalidPackage(format!(
                    "relationship {} targets missing part {}",
                    rel.id, rel.target
                )));
            }
        }
        for required in [CONTENT_TYPES_PART, PACKAGE_RELS_PART, DOCUMENT_PART] {
            if self.part(required).is_none() {
                return Err(DiscoveryError::InvalidPackage(format!(
                    "package is missing required part {required}"
                )));
            }
        }
        Ok(())
    }

    /// Serialises the package into a deflate-compressed zip archive.
    ///
    /// Entries carry a fixed timestamp so identical packages produce identical bytes.
    pub fn to_bytes(&self) -> DiscoveryResult<Vec<u8>> {
        self.validate()?;

        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for part in &self.parts {
            zip.start_file(part.name.as_str(), options)?;
            zip.write_all(&part.data)?;
        }
        let bytes = zip.finish()?.into_inner();

        tracing::debug!(parts = self.parts.len(), bytes = bytes.len(), "package written");
        Ok(bytes)
    }
}

/// Builds the package for a paragraph sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageAssembler;

impl PackageAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Assembles the package parts for `paragraphs`.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::NoContent` when `paragraphs` holds no heading or body paragraph.
    pub fn assemble(
        &self,
        paragraphs: &[Paragraph],
        metadata: &CaseMetadata,
    ) -> DiscoveryResult<Package> {
        let has_content = paragraphs
            .iter()
            .any(|p| matches!(p.kind, ParagraphKind::Heading | ParagraphKind::Body));
        if !has_content {
            return Err(DiscoveryError::NoContent);
        }

        let content_parts = vec![
            PackagePart {
                name: CORE_PROPERTIES_PART.into(),
                content_type: Some(CORE_PROPERTIES_CONTENT_TYPE),
                data: core_properties_xml(metadata).into_bytes(),
            },
            PackagePart {
                name: DOCUMENT_PART.into(),
                content_type: Some(DOCUMENT_MAIN_CONTENT_TYPE),
                data: render_document_xml(paragraphs).into_bytes(),
            },
            PackagePart {
                name: DOCUMENT_RELS_PART.into(),
                content_type: None,
                data: relationships_xml(&[]).into_bytes(),
            },
        ];

        let relationships = vec![
            Relationship {
                id: "rId1".into(),
                rel_type: OFFICE_DOCUMENT_REL_TYPE,
                target: DOCUMENT_PART.into(),
            },
            Relationship {
                id: "rId2".into(),
                rel_type: CORE_PROPERTIES_REL_TYPE,
                target: CORE_PROPERTIES_PART.into(),
            },
        ];

        let mut parts = Vec::with_capacity(content_parts.len() + 2);
        parts.push(PackagePart {
            name: CONTENT_TYPES_PART.into(),
            content_type: None,
            data: content_types_xml(&content_parts).into_bytes(),
        });
        parts.push(PackagePart {
            name: PACKAGE_RELS_PART.into(),
            content_type: None,
            data: relationships_xml(&relationships).into_bytes(),
        });
        parts.extend(content_parts);

        let package = Package {
            parts,
            relationships,
        };
        package.validate()?;
        Ok(package)
    }
}

fn content_types_xml(parts: &[PackagePart]) -> String {
    let mut out = format!(r#"{XML_DECLARATION}<Types xmlns="{CONTENT_TYPES_NS}">"#);
    out.push_str(&format!(
        r#"<Default Extension="rels" ContentType="{RELATIONSHIPS_CONTENT_TYPE}"/>"#
    ));
    out.push_str(&format!(
        r#"<Default Extension="xml" ContentType="{XML_CONTENT_TYPE}"/>"#
    ));
    for part in parts {
        if let Some(content_type) = part.content_type {
            out.push_str(&format!(
                r#"<Override PartName="/{}" ContentType="{content_type}"/>"#,
                escape_xml(&part.name)
            ));
        }
    }
    out.push_str("</Types>");
    out
}

fn relationships_xml(relationships: &[Relationship]) -> String {
    let mut out = format!(r#"{XML_DECLARATION}<Relationships xmlns="{PACKAGE_RELATIONSHIPS_NS}">"#);
    for rel in relationships {
        out.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            escape_xml(&rel.id),
            rel.rel_type,
            escape_xml(&rel.target)
        ));
    }
    out.push_str("</Relationships>");
    out
}

fn core_properties_xml(metadata: &CaseMetadata) -> String {
    let mut out = format!(
        concat!(
            "{}<cp:coreProperties",
            r#" xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties""#,
            r#" xmlns:dc="http://purl.org/dc/elements/1.1/""#,
            r#" xmlns:dcterms="http://purl.org/dc/terms/""#,
            r#" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#
        ),
        XML_DECLARATION
    );
    if let Some(title) = &metadata.case_title {
        out.push_str(&format!(
            "<dc:title>{}</dc:title>",
            escape_xml(&replace_invalid_xml_chars(title.as_str()))
        ));
    }
    out.push_str(&format!("<dc:subject>{DOCUMENT_SUBJECT}</dc:subject>"));
    if let Some(number) = &metadata.case_number {
        out.push_str(&format!(
            "<dc:identifier>{}</dc:identifier>",
            escape_xml(&replace_invalid_xml_chars(number.as_str()))
        ));
    }
    out.push_str("</cp:coreProperties>");
    out
}
