//! JSON request and response bodies.
//!
//! Field names are camelCase on the wire to match the browser client. Optional form fields
//! arrive as empty strings when left blank; validation into domain types happens in
//! `discovery-core`, not here.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscoveryFormData {
    pub case_title: Option<String>,
    pub case_number: Option<String>,
    pub requesting_party: Option<String>,
    pub responding_party: Option<String>,
    /// One of `interrogatories`, `document-requests`, `admissions`, `depositions`, `combined`.
    pub discovery_type: Option<String>,
    pub subject: Option<String>,
    pub timeframe: Option<String>,
    pub specific_requests: Option<String>,
    pub jurisdiction: Option<String>,
    pub additional_instructions: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateDiscoveryReq {
    pub form_data: DiscoveryFormData,
    pub file_count: u32,
    pub file_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GenerateDiscoveryRes {
    pub content: String,
}

/// Header fields of an export. Extra form fields sent by the client are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseMetadataData {
    pub case_title: Option<String>,
    pub case_number: Option<String>,
    pub jurisdiction: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportDocxReq {
    pub content: Option<String>,
    pub discovery_data: Option<CaseMetadataData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PreviewParagraph {
    /// `title`, `header`, `spacing`, `heading` or `body`.
    pub kind: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PreviewRes {
    pub paragraphs: Vec<PreviewParagraph>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorRes {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
    pub generation_available: bool,
}
