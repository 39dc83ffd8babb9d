//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is read first when present.
//!
//! # Environment Variables
//!
//! - `TAILOR_API_KEY` - Generative Language API key (falls back to
//!   `GEMINI_API_KEY`, then `API_KEY`). Optional: without it the first image
//!   or video request prompts for one.
//! - `TAILOR_API_BASE` - API base URL (default: Generative Language v1beta)
//! - `TAILOR_TEXT_MODEL` - analysis model (default: gemini-3-pro-preview)
//! - `TAILOR_IMAGE_MODEL` - image model (default: gemini-3-pro-image-preview)
//! - `TAILOR_VIDEO_MODEL` - video model (default: veo-3.1-fast-generate-preview)
//! - `TAILOR_LOADING_MS` - skeleton display duration on view entry (default: 800)

use crate::navigation::LOADING_DURATION;
use secrecy::SecretString;
use std::time::Duration;
use thiserror::Error;

pub const API_KEY_VARS: [&str; 3] = ["TAILOR_API_KEY", "GEMINI_API_KEY", "API_KEY"];

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TEXT_MODEL: &str = "gemini-3-pro-preview";
const DEFAULT_IMAGE_MODEL: &str = "gemini-3-pro-image-preview";
const DEFAULT_VIDEO_MODEL: &str = "veo-3.1-fast-generate-preview";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub api_base: String,
    pub text_model: String,
    pub image_model: String,
    pub video_model: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            video_model: DEFAULT_VIDEO_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: Option<SecretString>,
    pub models: ModelConfig,
    pub loading_duration: Duration,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                tracing::warn!(error = %err, "failed to read .env file");
            }
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str, default: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let loading_duration = match lookup("TAILOR_LOADING_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|err| ConfigError::InvalidEnvVar("TAILOR_LOADING_MS".into(), err.to_string()))?,
            None => LOADING_DURATION,
        };

        Ok(Self {
            api_key: api_key_from(&lookup),
            models: ModelConfig {
                api_base: get("TAILOR_API_BASE", DEFAULT_API_BASE)
                    .trim_end_matches('/')
                    .to_string(),
                text_model: get("TAILOR_TEXT_MODEL", DEFAULT_TEXT_MODEL),
                image_model: get("TAILOR_IMAGE_MODEL", DEFAULT_IMAGE_MODEL),
                video_model: get("TAILOR_VIDEO_MODEL", DEFAULT_VIDEO_MODEL),
            },
            loading_duration,
        })
    }
}

/// First non-blank key among [`API_KEY_VARS`].
pub fn api_key_from_env() -> Option<SecretString> {
    api_key_from(&|name: &str| std::env::var(name).ok())
}

fn api_key_from(lookup: &impl Fn(&str) -> Option<String>) -> Option<SecretString> {
    API_KEY_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .map(SecretString::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup(&[])).expect("empty env should load");
        assert!(config.api_key.is_none());
        assert_eq!(config.models.api_base, DEFAULT_API_BASE);
        assert_eq!(config.models.video_model, DEFAULT_VIDEO_MODEL);
        assert_eq!(config.loading_duration, Duration::from_millis(800));
    }

    #[test]
    fn api_key_prefers_tailor_variable_and_skips_blanks() {
        let config = AppConfig::from_lookup(lookup(&[
            ("TAILOR_API_KEY", "  "),
            ("GEMINI_API_KEY", "gemini-key"),
            ("API_KEY", "generic-key"),
        ]))
        .expect("env should load");
        let key = config.api_key.expect("key should be found");
        assert_eq!(key.expose_secret(), "gemini-key");
    }

    #[test]
    fn overrides_are_honoured() {
        let config = AppConfig::from_lookup(lookup(&[
            ("TAILOR_API_BASE", "http://localhost:9000/v1/"),
            ("TAILOR_TEXT_MODEL", "local-text"),
            ("TAILOR_LOADING_MS", "0"),
        ]))
        .expect("env should load");
        assert_eq!(config.models.api_base, "http://localhost:9000/v1");
        assert_eq!(config.models.text_model, "local-text");
        assert_eq!(config.loading_duration, Duration::ZERO);
    }

    #[test]
    fn invalid_loading_duration_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("TAILOR_LOADING_MS", "soon")]))
            .expect_err("non-numeric duration should fail");
        assert!(err.to_string().contains("TAILOR_LOADING_MS"));
    }
}
