use crate::services::providers::gemini::{GeminiConfig, GEMINI_API_BASE};
use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

const DEFAULT_OFFICIAL_EMAIL: &str = "YOUR_OFFICIAL_EMAIL";
/// Older deployments set the email under this name.
const LEGACY_EMAIL_VAR: &str = "CHITKARA_EMAIL";
const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash-lite";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Deserialize)]
pub struct BfhlConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    /// Echoed in every response envelope.
    pub official_email: String,
    pub models: ModelConfig,
    pub google: GoogleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Model used for the `AI` operation (e.g., gemini-2.5-flash-lite)
    pub text_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    /// Missing key is not fatal: only `AI` requests fail without it.
    pub api_key: Option<Secret<String>>,
    pub api_base: String,
    pub request_timeout_secs: u64,
}

impl BfhlConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        Self::from_lookup(common_config, |key| env::var(key).ok())
    }

    /// Build from any key lookup; `load` uses the process environment.
    pub fn from_lookup(
        common: core_config::Config,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let is_prod = lookup("ENVIRONMENT").as_deref() == Some("prod");
        let var = |key: &str, default: Option<&str>| get_env(&lookup, key, default, is_prod);

        let request_timeout_secs = var(
            "GENAI_REQUEST_TIMEOUT_SECS",
            Some(&DEFAULT_REQUEST_TIMEOUT_SECS.to_string()),
        )?
        .parse()
        .map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "GENAI_REQUEST_TIMEOUT_SECS must be a whole number of seconds: {}",
                e
            ))
        })?;

        let official_email = match lookup(LEGACY_EMAIL_VAR) {
            Some(email) if lookup("OFFICIAL_EMAIL").is_none() => email,
            _ => var("OFFICIAL_EMAIL", Some(DEFAULT_OFFICIAL_EMAIL))?,
        };

        Ok(BfhlConfig {
            common,
            official_email,
            models: ModelConfig {
                text_model: var("GENAI_TEXT_MODEL", Some(DEFAULT_TEXT_MODEL))?,
            },
            google: GoogleConfig {
                api_key: lookup("GEMINI_API_KEY")
                    .filter(|key| !key.trim().is_empty())
                    .map(Secret::new),
                api_base: lookup("GEMINI_API_BASE").unwrap_or_else(|| GEMINI_API_BASE.to_string()),
                request_timeout_secs,
            },
        })
    }

    /// Gemini settings, or `None` when no API key is configured.
    pub fn gemini_config(&self) -> Option<GeminiConfig> {
        self.google.api_key.as_ref().map(|api_key| GeminiConfig {
            api_key: api_key.clone(),
            model: self.models.text_model.clone(),
            api_base: self.google.api_base.clone(),
            timeout: Duration::from_secs(self.google.request_timeout_secs),
        })
    }
}

/// Read `key`; in production every key without a safe default must be set.
fn get_env(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Option<&str>,
    is_prod: bool,
) -> Result<String, AppError> {
    match lookup(key) {
        Some(val) => Ok(val),
        None => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
