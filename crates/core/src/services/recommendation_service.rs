use serde::de::DeserializeOwned;

use crate::ai::prompts;
use crate::ai::traits::{LanguageModel, Prompt};
use crate::errors::CoreError;
use crate::models::recommendation::{
    RecommendationRequest, Recommendations, StyleAssessment, StyleAssessmentRequest,
};

/// Runs the two recommendation prompts against a language model.
///
/// The model's answer is free text wrapped in JSON; only the envelope is
/// checked (the expected string fields are present and non-empty).
pub struct RecommendationService {
    model: Box<dyn LanguageModel>,
}

impl RecommendationService {
    pub fn new(model: Box<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Describe the style of the pictured room and suggest matching furniture.
    pub async fn assess_style(
        &self,
        request: &StyleAssessmentRequest,
    ) -> Result<StyleAssessment, CoreError> {
        let prompt = prompts::assess_style(request);
        let out: StyleAssessment = self.run(&prompt).await?;
        self.require_text(&prompt, "styleAssessment", &out.style_assessment)?;
        self.require_text(&prompt, "furnitureRecommendations", &out.furniture_recommendations)?;
        Ok(out)
    }

    /// Suggest furniture from preferences, budget, apartment size and an
    /// optional photo. The input is validated before the model is called.
    pub async fn generate_recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Recommendations, CoreError> {
        request.validate()?;
        let prompt = prompts::furniture_recommendations(request);
        let out: Recommendations = self.run(&prompt).await?;
        self.require_text(&prompt, "furnitureRecommendations", &out.furniture_recommendations)?;
        Ok(out)
    }

    async fn run<T: DeserializeOwned>(&self, prompt: &Prompt) -> Result<T, CoreError> {
        let raw = self.model.generate_json(prompt).await?;
        serde_json::from_str(strip_code_fence(&raw)).map_err(|e| CoreError::Model {
            provider: self.model.name().to_string(),
            message: format!("Reply to {} was not the expected JSON: {e}", prompt.name),
        })
    }

    fn require_text(&self, prompt: &Prompt, field: &str, value: &str) -> Result<(), CoreError> {
        if value.trim().is_empty() {
            return Err(CoreError::Model {
                provider: self.model.name().to_string(),
                message: format!("Reply to {} has an empty '{field}'", prompt.name),
            });
        }
        Ok(())
    }
}

/// Models sometimes wrap JSON in a Markdown fence despite being asked not to.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
