//! # Discovery Core
//!
//! Core business logic for the discovery document generator.
//!
//! This crate contains the pure document pipeline and the AI collaborator:
//! - XML escaping, heading/body classification and sentence-bounded splitting
//! - The document emitter that lays out header and content paragraphs
//! - OOXML package assembly and `.docx` export
//! - Prompt templating and the chat-completion client used for generation
//!
//! **No API concerns**: HTTP routing, status codes and OpenAPI docs belong in `api-rest`;
//! wire types live in `api-shared`.

pub mod classify;
pub mod config;
pub mod constants;
pub mod document;
pub mod emitter;
pub mod error;
pub mod escape;
pub mod export;
pub mod generation;
pub mod package;
pub mod prompt;
pub mod split;

pub use api_shared::wire;
pub use discovery_types::{NonEmptyText, TextError};

pub use classify::{Classification, ClassificationRule, Classifier};
pub use config::CoreConfig;
pub use constants::{DEFAULT_MAX_RUN_LENGTH, DOCX_CONTENT_TYPE};
pub use document::{CaseMetadata, GeneratedDocument, Paragraph, ParagraphKind, Run};
pub use emitter::DocumentEmitter;
pub use error::{DiscoveryError, DiscoveryResult};
pub use escape::{escape_xml, replace_invalid_xml_chars};
pub use export::{export_filename, sanitize_filename_component, ExportService, ExportedDocument};
pub use generation::{GenerationService, OpenAiClient, TextGenerator};
pub use package::{Package, PackageAssembler};
pub use prompt::{build_prompt, DiscoveryForm, DiscoveryRequest, DiscoveryType, Prompt};
pub use split::split_paragraph;
