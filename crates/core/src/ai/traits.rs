use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::recommendation::PhotoDataUri;

/// A rendered prompt ready to send to a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Flow name, for logs.
    pub name: &'static str,

    /// Instruction text with all inputs substituted.
    pub text: String,

    /// Optional image attached after the text.
    pub media: Option<PhotoDataUri>,
}

/// A hosted generative model that answers a prompt with a JSON document.
///
/// Implementations only move bytes; the recommendation service owns the
/// prompt wording and decodes the reply.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait LanguageModel: Send + Sync {
    /// Human-readable name of this model (for logs/errors).
    fn name(&self) -> &str;

    /// Send `prompt` and return the model's raw JSON text.
    async fn generate_json(&self, prompt: &Prompt) -> Result<String, CoreError>;
}
