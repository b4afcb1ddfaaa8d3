use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Production rental backend.
pub const DEFAULT_API_BASE_URL: &str = "https://rental-server-production-4619.up.railway.app";

/// Transport timeout applied to every backend request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Generation is slower than a REST call, so the model gets its own timeout.
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 60;

/// Client configuration: where the backend lives and how to reach the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the rental REST backend.
    pub api_base_url: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Generative model settings. `None` disables the recommendation flows.
    pub model: Option<ModelSettings>,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ModelSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSettings")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            model: None,
        }
    }
}

impl Settings {
    /// Build settings from a key lookup (usually `std::env::var`).
    ///
    /// Recognised keys:
    /// - `RENTAL_API_BASE_URL`
    /// - `RENTAL_API_TIMEOUT_SECS`
    /// - `GEMINI_API_KEY` (falls back to `GOOGLE_GENAI_API_KEY`)
    /// - `GEMINI_MODEL`
    /// - `GEMINI_BASE_URL`
    /// - `GEMINI_TIMEOUT_SECS`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut settings = Settings::default();

        if let Some(url) = non_empty("RENTAL_API_BASE_URL") {
            settings.api_base_url = url;
        }

        if let Some(raw) = non_empty("RENTAL_API_TIMEOUT_SECS") {
            settings.request_timeout_secs = parse_timeout("RENTAL_API_TIMEOUT_SECS", &raw)?;
        }

        let api_key = non_empty("GEMINI_API_KEY").or_else(|| non_empty("GOOGLE_GENAI_API_KEY"));
        settings.model = match api_key {
            Some(api_key) => Some(ModelSettings {
                api_key,
                model: non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                base_url: non_empty("GEMINI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
                timeout_secs: match non_empty("GEMINI_TIMEOUT_SECS") {
                    Some(raw) => parse_timeout("GEMINI_TIMEOUT_SECS", &raw)?,
                    None => DEFAULT_MODEL_TIMEOUT_SECS,
                },
            }),
            None => None,
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CoreError::Config(format!(
                "API base URL must start with http:// or https://, got '{url}'"
            )));
        }
        if reqwest::Url::parse(url).is_err() {
            return Err(CoreError::Config(format!("API base URL '{url}' is not a valid URL")));
        }
        if self.model.as_ref().is_some_and(|m| m.timeout_secs == 0) {
            return Err(CoreError::Config("Model timeout must be at least 1 second".into()));
        }
        Ok(())
    }
}

fn parse_timeout(key: &str, raw: &str) -> Result<u64, CoreError> {
    let secs: u64 = raw.parse().map_err(|_| {
        CoreError::Config(format!("{key} must be a whole number of seconds, got '{raw}'"))
    })?;
    if secs == 0 {
        return Err(CoreError::Config(format!("{key} must be at least 1")));
    }
    Ok(secs)
}
