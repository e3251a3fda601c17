//! Discovery text generation through an OpenAI-compatible chat completion API.
//!
//! The AI provider sits behind [`TextGenerator`] so the REST layer and tests can swap in other
//! implementations. One request per generation: no streaming, no retry, a hard timeout.

use crate::constants::{GENERATION_MAX_TOKENS, GENERATION_TEMPERATURE};
use crate::document::GeneratedDocument;
use crate::prompt::{build_prompt, DiscoveryRequest, Prompt};
use crate::{CoreConfig, DiscoveryError, DiscoveryResult};
use async_trait::async_trait;
use discovery_types::NonEmptyText;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Something that turns a prompt into generated text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the generated text. Implementations must not return blank text; they report
    /// `DiscoveryError::EmptyCompletion` instead.
    async fn generate(&self, prompt: &Prompt) -> DiscoveryResult<String>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderError,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: String,
}

/// Chat completion client for OpenAI and API-compatible providers.
pub struct OpenAiClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: NonEmptyText,
}

impl OpenAiClient {
    /// Create a client from the startup configuration.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::MissingApiKey` when no credential is configured and
    /// `DiscoveryError::Http` if the HTTP client cannot be built.
    pub fn new(cfg: &CoreConfig) -> DiscoveryResult<Self> {
        let api_key = cfg
            .openai_api_key()
            .cloned()
            .ok_or(DiscoveryError::MissingApiKey)?;
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("discovery-core/", env!("CARGO_PKG_VERSION")))
            .timeout(cfg.ai_timeout())
            .build()?;

        Ok(Self {
            http_client,
            base_url: cfg.openai_base_url().to_string(),
            model: cfg.openai_model().to_string(),
            api_key,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(&self, prompt: &Prompt) -> DiscoveryResult<String> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: GENERATION_MAX_TOKENS,
            temperature: GENERATION_TEMPERATURE,
        };

        tracing::info!(model = %self.model, prompt_length = prompt.user.len(), "requesting completion");
        let response = self
            .http_client
            .post(self.completions_url())
            .bearer_auth(self.api_key.as_str())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ProviderErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            return Err(DiscoveryError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&text)?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(DiscoveryError::EmptyCompletion)
    }
}

/// Builds prompts and forwards them to the configured generator.
#[derive(Clone, Default)]
pub struct GenerationService {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl GenerationService {
    /// A service backed by [`OpenAiClient`], or with no generator when no key is configured.
    ///
    /// A missing key is not a startup failure: export keeps working and generation requests
    /// report the configuration error.
    pub fn from_config(cfg: &CoreConfig) -> DiscoveryResult<Self> {
        if !cfg.has_api_key() {
            tracing::warn!("OPENAI_API_KEY is not set; generation requests will fail");
            return Ok(Self::default());
        }
        let client = OpenAiClient::new(cfg)?;
        tracing::info!(client = ?client, "generation enabled");
        Ok(Self::with_generator(Arc::new(client)))
    }

    pub fn with_generator(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    pub fn is_available(&self) -> bool {
        self.generator.is_some()
    }

    /// Generates the discovery document text for `request`.
    ///
    /// # Errors
    ///
    /// - `MissingApiKey` if no generator is configured.
    /// - `EmptyCompletion` if the provider answered with blank text.
    /// - `Upstream`/`Http` if the provider call failed.
    pub async fn generate(&self, request: &DiscoveryRequest) -> DiscoveryResult<GeneratedDocument> {
        let generator = self
            .generator
            .as_ref()
            .ok_or(DiscoveryError::MissingApiKey)?;

        let prompt = build_prompt(request);
        let text = generator.generate(&prompt).await?;
        if text.trim().is_empty() {
            return Err(DiscoveryError::EmptyCompletion);
        }

        tracing::info!(
            content_length = text.len(),
            file_count = request.file_count(),
            discovery_type = %request.form.discovery_type,
            "discovery document generated"
        );
        Ok(GeneratedDocument::new(text))
    }
}
