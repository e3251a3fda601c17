//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Request handling never reads process-wide environment variables;
//! binaries read them once and hand the raw values to the parsing helpers below.

use crate::constants::{
    DEFAULT_AI_TIMEOUT_SECS, DEFAULT_MAX_RUN_LENGTH, DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL,
};
use crate::{DiscoveryError, DiscoveryResult};
use discovery_types::NonEmptyText;
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone)]
pub struct CoreConfig {
    openai_api_key: Option<NonEmptyText>,
    openai_base_url: String,
    openai_model: String,
    ai_timeout: Duration,
    max_run_length: usize,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::InvalidInput` if the base URL or model are blank, the timeout
    /// is zero, or the run-length budget is zero.
    pub fn new(
        openai_api_key: Option<NonEmptyText>,
        openai_base_url: String,
        openai_model: String,
        ai_timeout: Duration,
        max_run_length: usize,
    ) -> DiscoveryResult<Self> {
        if openai_base_url.trim().is_empty() {
            return Err(DiscoveryError::InvalidInput(
                "OpenAI base URL cannot be empty".into(),
            ));
        }
        if openai_model.trim().is_empty() {
            return Err(DiscoveryError::InvalidInput(
                "OpenAI model cannot be empty".into(),
            ));
        }
        if ai_timeout.is_zero() {
            return Err(DiscoveryError::InvalidInput(
                "AI timeout must be greater than zero".into(),
            ));
        }
        if max_run_length == 0 {
            return Err(DiscoveryError::InvalidInput(
                "max run length must be greater than zero".into(),
            ));
        }

        Ok(Self {
            openai_api_key,
            openai_base_url: openai_base_url.trim().trim_end_matches('/').to_string(),
            openai_model: openai_model.trim().to_string(),
            ai_timeout,
            max_run_length,
        })
    }

    /// Builds a configuration from raw (possibly unset) environment values.
    ///
    /// Blank values fall back to the defaults in [`crate::constants`].
    pub fn from_env_values(
        api_key: Option<String>,
        base_url: Option<String>,
        model: Option<String>,
        timeout_secs: Option<String>,
        max_run_length: Option<String>,
    ) -> DiscoveryResult<Self> {
        Self::new(
            NonEmptyText::from_optional(api_key),
            non_blank(base_url).unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.into()),
            non_blank(model).unwrap_or_else(|| DEFAULT_OPENAI_MODEL.into()),
            Duration::from_secs(parse_env_number(
                "DISCOVERY_AI_TIMEOUT_SECS",
                timeout_secs,
                DEFAULT_AI_TIMEOUT_SECS,
            )?),
            parse_env_number(
                "DISCOVERY_MAX_RUN_LENGTH",
                max_run_length,
                DEFAULT_MAX_RUN_LENGTH,
            )?,
        )
    }

    pub fn openai_api_key(&self) -> Option<&NonEmptyText> {
        self.openai_api_key.as_ref()
    }

    pub fn has_api_key(&self) -> bool {
        self.openai_api_key.is_some()
    }

    pub fn openai_base_url(&self) -> &str {
        &self.openai_base_url
    }

    pub fn openai_model(&self) -> &str {
        &self.openai_model
    }

    pub fn ai_timeout(&self) -> Duration {
        self.ai_timeout
    }

    pub fn max_run_length(&self) -> usize {
        self.max_run_length
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.into(),
            openai_model: DEFAULT_OPENAI_MODEL.into(),
            ai_timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
            max_run_length: DEFAULT_MAX_RUN_LENGTH,
        }
    }
}

// The credential must never reach the logs.
impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field("ai_timeout", &self.ai_timeout)
            .field("max_run_length", &self.max_run_length)
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a numeric setting from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns `default`.
fn parse_env_number<T>(name: &str, value: Option<String>, default: T) -> DiscoveryResult<T>
where
    T: std::str::FromStr,
{
    match non_blank(value) {
        None => Ok(default),
        Some(v) => v.parse::<T>().map_err(|_| {
            DiscoveryError::InvalidInput(format!("{name} must be a non-negative integer, got {v:?}"))
        }),
    }
}
