use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::preferences::ApartmentSize;
use crate::errors::CoreError;
use crate::validation::{check_preferences_text, FieldErrors};

/// A photo encoded as `data:<mimetype>;base64,<encoded_data>`.
///
/// Only the envelope is checked (image MIME type, base64 marker, non-empty
/// payload that decodes as standard padded base64); the image itself is
/// passed through to the model untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhotoDataUri {
    mime_type: String,
    data: String,
}

impl PhotoDataUri {
    pub fn new(mime_type: impl Into<String>, base64_data: impl Into<String>) -> Result<Self, CoreError> {
        let uri = format!("data:{};base64,{}", mime_type.into(), base64_data.into());
        uri.parse()
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The base64 payload, without the `data:` prefix.
    pub fn data(&self) -> &str {
        &self.data
    }
}

impl FromStr for PhotoDataUri {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix("data:")
            .ok_or_else(|| CoreError::InvalidDataUri("must start with 'data:'".into()))?;
        let (header, data) = rest
            .split_once(',')
            .ok_or_else(|| CoreError::InvalidDataUri("missing ',' before the payload".into()))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| CoreError::InvalidDataUri("payload must be base64-encoded".into()))?;

        let mut parts = mime_type.splitn(2, '/');
        let (top, sub) = (parts.next().unwrap_or(""), parts.next().unwrap_or(""));
        if top != "image" || sub.is_empty() {
            return Err(CoreError::InvalidDataUri(format!(
                "expected an image MIME type, got '{mime_type}'"
            )));
        }
        if data.is_empty() {
            return Err(CoreError::InvalidDataUri("empty payload".into()));
        }
        STANDARD
            .decode(data)
            .map_err(|e| CoreError::InvalidDataUri(format!("payload is not valid base64: {e}")))?;

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }
}

impl TryFrom<String> for PhotoDataUri {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PhotoDataUri> for String {
    fn from(p: PhotoDataUri) -> Self {
        p.to_string()
    }
}

impl std::fmt::Display for PhotoDataUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Input of the style assessment flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleAssessmentRequest {
    pub photo_data_uri: PhotoDataUri,
}

/// Output of the style assessment flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleAssessment {
    pub style_assessment: String,
    pub furniture_recommendations: String,
}

/// Input of the personalised recommendation flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    /// Style, color, material preferences
    pub rental_preferences: String,

    /// Rental budget in dollars
    pub budget: f64,

    pub apartment_size: ApartmentSize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_data_uri: Option<PhotoDataUri>,
}

impl RecommendationRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut errors = FieldErrors::new();
        check_preferences_text(&mut errors, "rentalPreferences", &self.rental_preferences);
        errors.check(
            self.budget.is_finite() && self.budget >= 1.0,
            "budget",
            "Budget must be a positive number.",
        );
        errors.into_result()
    }
}

/// Output of the personalised recommendation flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub furniture_recommendations: String,
}
