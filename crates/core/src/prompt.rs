//! Validated discovery form data and the prompt sent to the AI provider.

use crate::document::CaseMetadata;
use crate::{DiscoveryError, DiscoveryResult};
use api_shared::{DiscoveryFormData, GenerateDiscoveryReq};
use discovery_types::NonEmptyText;
use std::fmt::Write as _;

/// System message fixing the assistant's role for every generation.
pub const SYSTEM_PROMPT: &str = "You are a legal assistant expert in litigation discovery. \
Generate professional, court-ready discovery documents with proper legal formatting and language.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscoveryType {
    #[default]
    Interrogatories,
    DocumentRequests,
    Admissions,
    Depositions,
    Combined,
}

impl DiscoveryType {
    /// Wire identifier, as sent by the form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Interrogatories => "interrogatories",
            Self::DocumentRequests => "document-requests",
            Self::Admissions => "admissions",
            Self::Depositions => "depositions",
            Self::Combined => "combined",
        }
    }

    /// Human wording used inside the prompt.
    pub fn prompt_label(self) -> String {
        self.as_str().replace('-', " ")
    }
}

impl std::str::FromStr for DiscoveryType {
    type Err = DiscoveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "interrogatories" => Ok(Self::Interrogatories),
            "document-requests" => Ok(Self::DocumentRequests),
            "admissions" => Ok(Self::Admissions),
            "depositions" => Ok(Self::Depositions),
            "combined" => Ok(Self::Combined),
            other => Err(DiscoveryError::InvalidInput(format!(
                "unknown discovery type: {other:?}"
            ))),
        }
    }
}

impl std::fmt::Display for DiscoveryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case details with required fields checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryForm {
    pub case_title: NonEmptyText,
    pub case_number: Option<NonEmptyText>,
    pub requesting_party: NonEmptyText,
    pub responding_party: NonEmptyText,
    pub discovery_type: DiscoveryType,
    pub subject: NonEmptyText,
    pub timeframe: Option<NonEmptyText>,
    pub specific_requests: Option<NonEmptyText>,
    pub jurisdiction: Option<NonEmptyText>,
    pub additional_instructions: Option<NonEmptyText>,
}

impl DiscoveryForm {
    /// Header fields for the exported document.
    pub fn case_metadata(&self) -> CaseMetadata {
        CaseMetadata {
            case_title: Some(self.case_title.clone()),
            case_number: self.case_number.clone(),
            jurisdiction: self.jurisdiction.clone(),
        }
    }
}

fn required(value: Option<String>, field: &str) -> DiscoveryResult<NonEmptyText> {
    NonEmptyText::from_optional(value)
        .ok_or_else(|| DiscoveryError::InvalidInput(format!("{field} is required")))
}

impl TryFrom<DiscoveryFormData> for DiscoveryForm {
    type Error = DiscoveryError;

    fn try_from(data: DiscoveryFormData) -> Result<Self, Self::Error> {
        let discovery_type = match NonEmptyText::from_optional(data.discovery_type) {
            Some(value) => value.as_str().parse()?,
            None => DiscoveryType::default(),
        };

        Ok(Self {
            case_title: required(data.case_title, "caseTitle")?,
            case_number: NonEmptyText::from_optional(data.case_number),
            requesting_party: required(data.requesting_party, "requestingParty")?,
            responding_party: required(data.responding_party, "respondingParty")?,
            discovery_type,
            subject: required(data.subject, "subject")?,
            timeframe: NonEmptyText::from_optional(data.timeframe),
            specific_requests: NonEmptyText::from_optional(data.specific_requests),
            jurisdiction: NonEmptyText::from_optional(data.jurisdiction),
            additional_instructions: NonEmptyText::from_optional(data.additional_instructions),
        })
    }
}

/// Everything the prompt is built from. Uploaded files contribute only their names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryRequest {
    pub form: DiscoveryForm,
    pub file_names: Vec<String>,
}

impl DiscoveryRequest {
    pub fn file_count(&self) -> usize {
        self.file_names.len()
    }
}

impl TryFrom<GenerateDiscoveryReq> for DiscoveryRequest {
    type Error = DiscoveryError;

    fn try_from(req: GenerateDiscoveryReq) -> Result<Self, Self::Error> {
        let file_names: Vec<String> = req
            .file_names
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        if req.file_count as usize != file_names.len() {
            tracing::warn!(
                file_count = req.file_count,
                file_names = file_names.len(),
                "fileCount disagrees with fileNames; using fileNames"
            );
        }

        Ok(Self {
            form: DiscoveryForm::try_from(req.form_data)?,
            file_names,
        })
    }
}

/// System and user messages for one chat completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

fn or_default<'a>(value: &'a Option<NonEmptyText>, fallback: &'a str) -> &'a str {
    value.as_ref().map(NonEmptyText::as_str).unwrap_or(fallback)
}

/// Renders the generation prompt for `request`.
pub fn build_prompt(request: &DiscoveryRequest) -> Prompt {
    let mut user = String::with_capacity(3072);
    // String's fmt::Write impl never fails.
    let _ = write_user_prompt(&mut user, request);
    Prompt {
        system: SYSTEM_PROMPT.to_string(),
        user,
    }
}

fn write_user_prompt(out: &mut String, request: &DiscoveryRequest) -> std::fmt::Result {
    let form = &request.form;
    let label = form.discovery_type.prompt_label();
    let has_files = request.file_count() > 0;

    writeln!(
        out,
        "You are a legal assistant specializing in discovery document generation for litigation \
cases. Based on the following case information and uploaded documents, generate a professional \
discovery document."
    )?;
    writeln!(out)?;
    writeln!(out, "CASE INFORMATION:")?;
    writeln!(out, "- Case Title: {}", form.case_title)?;
    writeln!(out, "- Case Number: {}", or_default(&form.case_number, "Not provided"))?;
    writeln!(out, "- Requesting Party: {}", form.requesting_party)?;
    writeln!(out, "- Responding Party: {}", form.responding_party)?;
    writeln!(out, "- Discovery Type: {}", form.discovery_type)?;
    writeln!(out, "- Subject Matter: {}", form.subject)?;
    writeln!(out, "- Jurisdiction: {}", or_default(&form.jurisdiction, "Not specified"))?;
    writeln!(
        out,
        "- Relevant Timeframe: {}",
        or_default(&form.timeframe, "Not specified")
    )?;
    writeln!(
        out,
        "- Specific Requests: {}",
        or_default(&form.specific_requests, "General discovery")
    )?;
    writeln!(
        out,
        "- Additional Instructions: {}",
        or_default(&form.additional_instructions, "Standard professional format")
    )?;
    writeln!(out)?;

    if has_files {
        writeln!(
            out,
            "UPLOADED DOCUMENTS: {} files uploaded ({})",
            request.file_count(),
            request.file_names.join(", ")
        )?;
    } else {
        writeln!(
            out,
            "UPLOADED DOCUMENTS: No documents uploaded - generating based on case information only"
        )?;
    }
    writeln!(out)?;

    writeln!(out, "INSTRUCTIONS:")?;
    let instructions = [
        format!("Generate a professional {label} document appropriate for litigation"),
        "Include proper legal formatting and numbering".to_string(),
        "Create specific, targeted requests based on the case information provided".to_string(),
        format!("Ensure requests are relevant to the subject matter: {}", form.subject),
        "Include appropriate time limitations and scope".to_string(),
        "Use formal legal language and structure".to_string(),
        "Include standard discovery definitions and instructions".to_string(),
        "Make requests specific enough to be enforceable but broad enough to capture relevant \
information"
            .to_string(),
        "If timeframe is provided, incorporate those date ranges into the requests".to_string(),
        "Consider the jurisdiction's discovery rules and practices".to_string(),
        if has_files {
            "Reference the uploaded documents and create targeted requests based on their likely \
content"
                .to_string()
        } else {
            "Create comprehensive discovery requests based solely on the case information and \
subject matter provided"
                .to_string()
        },
    ];
    for (index, instruction) in instructions.iter().enumerate() {
        writeln!(out, "{}. {instruction}", index + 1)?;
    }
    writeln!(out)?;

    writeln!(out, "FORMAT REQUIREMENTS:")?;
    for requirement in [
        "Use proper legal document formatting",
        "Number all requests consecutively",
        "Include definitions section if appropriate",
        "Add standard discovery instructions",
        "Include proper signature blocks and service information",
        "Ensure compliance with discovery rules",
    ] {
        writeln!(out, "- {requirement}")?;
    }
    writeln!(out)?;
    write!(
        out,
        "Generate a complete, professional discovery document that would be suitable for filing \
in court."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_data() -> DiscoveryFormData {
        DiscoveryFormData {
            case_title: Some("Smith v. Jones".into()),
            case_number: Some("".into()),
            requesting_party: Some("Plaintiff John Smith".into()),
            responding_party: Some("Defendant Acme Corp".into()),
            discovery_type: Some("document-requests".into()),
            subject: Some("Breach of supply contract".into()),
            timeframe: Some("January 2022 - March 2023".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_discovery_type_parsing_and_labels() {
        assert_eq!(
            "document-requests".parse::<DiscoveryType>().unwrap(),
            DiscoveryType::DocumentRequests
        );
        assert_eq!(DiscoveryType::DocumentRequests.prompt_label(), "document requests");
        assert_eq!(DiscoveryType::Combined.prompt_label(), "combined");
        assert!(matches!(
            "subpoena".parse::<DiscoveryType>(),
            Err(DiscoveryError::InvalidInput(msg)) if msg.contains("subpoena")
        ));
    }

    #[test]
    fn test_form_requires_core_fields() {
        for field in ["caseTitle", "requestingParty", "respondingParty", "subject"] {
            let mut data = form_data();
            match field {
                "caseTitle" => data.case_title = Some("  ".into()),
                "requestingParty" => data.requesting_party = None,
                "respondingParty" => data.responding_party = Some(String::new()),
                _ => data.subject = None,
            }
            let err = DiscoveryForm::try_from(data).expect_err("missing field should fail");
            assert!(
                matches!(&err, DiscoveryError::InvalidInput(msg) if msg.contains(field)),
                "{err}"
            );
        }
    }

    #[test]
    fn test_form_defaults_discovery_type() {
        let mut data = form_data();
        data.discovery_type = None;
        let form = DiscoveryForm::try_from(data).unwrap();
        assert_eq!(form.discovery_type, DiscoveryType::Interrogatories);
        assert_eq!(form.case_number, None);
    }

    #[test]
    fn test_case_metadata_from_form() {
        let mut data = form_data();
        data.jurisdiction = Some("Superior Court of California".into());
        let metadata = DiscoveryForm::try_from(data).unwrap().case_metadata();
        assert_eq!(metadata.case_title.unwrap().as_str(), "Smith v. Jones");
        assert!(metadata.case_number.is_none());
        assert_eq!(
            metadata.jurisdiction.unwrap().as_str(),
            "Superior Court of California"
        );
    }

    #[test]
    fn test_prompt_without_files() {
        let request = DiscoveryRequest {
            form: DiscoveryForm::try_from(form_data()).unwrap(),
            file_names: Vec::new(),
        };
        let prompt = build_prompt(&request);

        assert_eq!(prompt.system, SYSTEM_PROMPT);
        assert!(prompt.user.contains("- Case Title: Smith v. Jones\n"));
        assert!(prompt.user.contains("- Case Number: Not provided\n"));
        assert!(prompt.user.contains("- Discovery Type: document-requests\n"));
        assert!(prompt.user.contains("- Jurisdiction: Not specified\n"));
        assert!(prompt.user.contains("- Relevant Timeframe: January 2022 - March 2023\n"));
        assert!(prompt.user.contains("- Specific Requests: General discovery\n"));
        assert!(prompt
            .user
            .contains("- Additional Instructions: Standard professional format\n"));
        assert!(prompt.user.contains("No documents uploaded"));
        assert!(prompt
            .user
            .contains("1. Generate a professional document requests document"));
        assert!(prompt
            .user
            .contains("11. Create comprehensive discovery requests based solely"));
    }

    #[test]
    fn test_prompt_with_files() {
        let request = DiscoveryRequest::try_from(GenerateDiscoveryReq {
            form_data: form_data(),
            file_count: 2,
            file_names: vec!["contract.pdf".into(), " emails.txt ".into()],
        })
        .unwrap();
        let prompt = build_prompt(&request);

        assert!(prompt
            .user
            .contains("UPLOADED DOCUMENTS: 2 files uploaded (contract.pdf, emails.txt)"));
        assert!(prompt.user.contains("11. Reference the uploaded documents"));
        assert!(prompt.user.ends_with("suitable for filing in court."));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let request = DiscoveryRequest {
            form: DiscoveryForm::try_from(form_data()).unwrap(),
            file_names: vec!["a.txt".into()],
        };
        assert_eq!(build_prompt(&request), build_prompt(&request));
    }
}
