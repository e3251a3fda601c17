//! Constants used throughout the discovery core crate.
//!
//! Package part names, OOXML namespaces and content types, formatting sizes and the
//! configuration defaults live here so the emitter, assembler and services agree on them.

/// Default character budget for a single body run before the splitter breaks it up.
pub const DEFAULT_MAX_RUN_LENGTH: usize = 1000;

/// Blocks longer than this many characters are never treated as headings.
pub const HEADING_MAX_CHARS: usize = 150;

/// Substrings that mark a block as a section heading.
pub const HEADING_KEYWORDS: [&str; 4] = ["INTERROGATOR", "REQUEST", "DEFINITION", "INSTRUCTION"];

/// Default OpenAI-compatible API root.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model used for generation.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";

/// Default hard timeout for the AI call, in seconds.
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 120;

/// Completion token ceiling sent with every generation request.
pub const GENERATION_MAX_TOKENS: u32 = 3000;

/// Sampling temperature sent with every generation request.
pub const GENERATION_TEMPERATURE: f32 = 0.3;

/// Font sizes, in half-points.
pub const TITLE_FONT_SIZE: u32 = 32;
pub const HEADER_FONT_SIZE: u32 = 24;
pub const HEADING_FONT_SIZE: u32 = 24;
pub const BODY_FONT_SIZE: u32 = 22;

/// MIME type of the exported file.
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Prefix of every exported filename.
pub const EXPORT_FILENAME_PREFIX: &str = "Discovery_Request_";

/// Filename stem used when the case number is absent.
pub const EXPORT_FILENAME_FALLBACK: &str = "Document";

pub const WORDPROCESSING_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub const PACKAGE_RELATIONSHIPS_NS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";
pub const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
pub const PACKAGE_RELS_PART: &str = "_rels/.rels";
pub const DOCUMENT_PART: &str = "word/document.xml";
pub const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";
pub const CORE_PROPERTIES_PART: &str = "docProps/core.xml";

pub const RELATIONSHIPS_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-package.relationships+xml";
pub const XML_CONTENT_TYPE: &str = "application/xml";
pub const DOCUMENT_MAIN_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
pub const CORE_PROPERTIES_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-package.core-properties+xml";

pub const OFFICE_DOCUMENT_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub const CORE_PROPERTIES_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
