use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use api_shared::{DiscoveryFormData, GenerateDiscoveryReq};
use discovery_core::{
    CaseMetadata, Classifier, CoreConfig, DiscoveryRequest, DocumentEmitter, ExportService,
    GenerationService, DEFAULT_MAX_RUN_LENGTH,
};

#[derive(Parser)]
#[command(name = "discovery")]
#[command(about = "Discovery request document generator CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export discovery text as a .docx file
    Export {
        /// Text file holding the discovery content
        #[arg(long)]
        content: PathBuf,
        /// Output path (defaults to Discovery_Request_<case number>.docx)
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        case: CaseArgs,
        /// Maximum characters per body paragraph
        #[arg(long, default_value_t = DEFAULT_MAX_RUN_LENGTH)]
        max_run_length: usize,
    },
    /// Print the paragraphs an export would contain
    Preview {
        /// Text file holding the discovery content
        #[arg(long)]
        content: PathBuf,
        #[command(flatten)]
        case: CaseArgs,
    },
    /// Generate discovery text from a case form using the configured AI provider
    Generate {
        /// JSON file with the case form (camelCase field names)
        #[arg(long)]
        form: PathBuf,
        /// Names of supporting documents to mention in the prompt
        #[arg(long = "file")]
        files: Vec<String>,
        /// Write the generated text here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug, Default)]
struct CaseArgs {
    /// Case title shown as the document title
    #[arg(long)]
    case_title: Option<String>,
    /// Case number, also used in the default file name
    #[arg(long)]
    case_number: Option<String>,
    /// Jurisdiction line under the title
    #[arg(long)]
    jurisdiction: Option<String>,
}

impl CaseArgs {
    fn metadata(&self) -> CaseMetadata {
        CaseMetadata::from_fields(
            self.case_title.as_deref(),
            self.case_number.as_deref(),
            self.jurisdiction.as_deref(),
        )
    }
}

fn read_content(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Writes the exported package and returns where it went.
fn export(
    content: &Path,
    out: Option<&Path>,
    case: &CaseArgs,
    max_run_length: usize,
) -> anyhow::Result<PathBuf> {
    anyhow::ensure!(max_run_length > 0, "--max-run-length must be positive");
    let text = read_content(content)?;
    let service = ExportService::new(DocumentEmitter::new(Classifier::default(), max_run_length));
    let exported = service.export(Some(text.as_str()), &case.metadata())?;

    let path = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&exported.filename));
    std::fs::write(&path, &exported.bytes)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// One `kind<TAB>text` line per paragraph.
fn preview(content: &Path, case: &CaseArgs) -> anyhow::Result<Vec<String>> {
    let text = read_content(content)?;
    let paragraphs = ExportService::default().preview(Some(text.as_str()), &case.metadata())?;
    Ok(paragraphs
        .iter()
        .map(|paragraph| format!("{}\t{}", paragraph.kind.as_str(), paragraph.text()))
        .collect())
}

fn load_request(form: &Path, files: Vec<String>) -> anyhow::Result<DiscoveryRequest> {
    let raw = read_content(form)?;
    let form_data: DiscoveryFormData =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", form.display()))?;
    let req = GenerateDiscoveryReq {
        form_data,
        file_count: u32::try_from(files.len())?,
        file_names: files,
    };
    Ok(DiscoveryRequest::try_from(req)?)
}

async fn generate(form: &Path, files: Vec<String>, out: Option<&Path>) -> anyhow::Result<()> {
    let request = load_request(form, files)?;
    let cfg = CoreConfig::from_env_values(
        std::env::var("OPENAI_API_KEY").ok(),
        std::env::var("OPENAI_BASE_URL").ok(),
        std::env::var("OPENAI_MODEL").ok(),
        std::env::var("DISCOVERY_AI_TIMEOUT_SECS").ok(),
        None,
    )?;
    let document = GenerationService::from_config(&cfg)?
        .generate(&request)
        .await?;

    match out {
        Some(path) => std::fs::write(path, &document.text)
            .with_context(|| format!("writing {}", path.display()))?,
        None => println!("{}", document.text),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            content,
            out,
            case,
            max_run_length,
        } => {
            let path = export(&content, out.as_deref(), &case, max_run_length)?;
            println!("Wrote {}", path.display());
        }
        Commands::Preview { content, case } => {
            for line in preview(&content, &case)? {
                println!("{line}");
            }
        }
        Commands::Generate { form, files, out } => {
            generate(&form, files, out.as_deref()).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_cli_parses_export_arguments() {
        let cli = Cli::try_parse_from([
            "discovery",
            "export",
            "--content",
            "draft.txt",
            "--case-number",
            "CV-1",
            "--max-run-length",
            "200",
        ])
        .unwrap();
        match cli.command {
            Commands::Export {
                case,
                max_run_length,
                out,
                ..
            } => {
                assert_eq!(case.case_number.as_deref(), Some("CV-1"));
                assert_eq!(max_run_length, 200);
                assert!(out.is_none());
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn test_export_writes_docx() {
        let dir = tempfile::tempdir().unwrap();
        let content = write_file(
            dir.path(),
            "draft.txt",
            "INTERROGATORIES\n\n1. Identify every witness.",
        );
        let out = dir.path().join("out.docx");

        let path = export(&content, Some(out.as_path()), &CaseArgs::default(), 1000).unwrap();
        assert_eq!(path, out);

        let mut archive = zip::ZipArchive::new(std::fs::File::open(&out).unwrap()).unwrap();
        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        assert!(xml.contains("Identify every witness."));
    }

    #[test]
    fn test_export_rejects_blank_content() {
        let dir = tempfile::tempdir().unwrap();
        let content = write_file(dir.path(), "blank.txt", "   \n\n  ");
        let out = dir.path().join("out.docx");

        let err = export(&content, Some(out.as_path()), &CaseArgs::default(), 1000).unwrap_err();
        assert!(err.to_string().contains("no content"));
        assert!(!out.exists());
    }

    #[test]
    fn test_preview_lines() {
        let dir = tempfile::tempdir().unwrap();
        let content = write_file(dir.path(), "draft.txt", "DEFINITIONS\n\nA short body.");
        let case = CaseArgs {
            case_title: Some("Smith v. Jones".into()),
            ..Default::default()
        };

        let lines = preview(&content, &case).unwrap();
        assert_eq!(
            lines,
            [
                "title\tSmith v. Jones",
                "spacing\t",
                "heading\tDEFINITIONS",
                "body\tA short body."
            ]
        );
    }

    #[test]
    fn test_load_request_validates_form() {
        let dir = tempfile::tempdir().unwrap();
        let complete = write_file(
            dir.path(),
            "form.json",
            r#"{"caseTitle":"Smith v. Jones","requestingParty":"Plaintiff","respondingParty":"Defendant","subject":"Fraud"}"#,
        );
        let request = load_request(&complete, vec!["contract.pdf".into()]).unwrap();
        assert_eq!(request.file_count(), 1);

        let partial = write_file(dir.path(), "partial.json", r#"{"caseTitle":"Smith"}"#);
        assert!(load_request(&partial, Vec::new()).is_err());
    }
}
