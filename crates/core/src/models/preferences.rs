use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;
use crate::validation::{check_preferences_text, FieldErrors};

/// Apartment size options offered by the profile and recommendation forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApartmentSize {
    /// Studio / 1-bed
    Small,
    /// 2-bed
    Medium,
    /// 3-bed+
    Large,
}

impl ApartmentSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApartmentSize::Small => "small",
            ApartmentSize::Medium => "medium",
            ApartmentSize::Large => "large",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ApartmentSize::Small => "Small (Studio / 1-bed)",
            ApartmentSize::Medium => "Medium (2-bed)",
            ApartmentSize::Large => "Large (3-bed+)",
        }
    }
}

impl FromStr for ApartmentSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(ApartmentSize::Small),
            "medium" => Ok(ApartmentSize::Medium),
            "large" => Ok(ApartmentSize::Large),
            other => Err(format!(
                "unknown apartment size '{other}' (expected small, medium or large)"
            )),
        }
    }
}

impl std::fmt::Display for ApartmentSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /profile/preferences`. Field names are snake_case on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilePreferences {
    /// Desired style, colors, materials
    pub preferences: String,

    /// Estimated monthly rental budget in dollars
    pub monthly_budget: f64,

    pub apartment_size: ApartmentSize,
}

impl ProfilePreferences {
    pub fn new(
        preferences: impl Into<String>,
        monthly_budget: f64,
        apartment_size: ApartmentSize,
    ) -> Self {
        Self {
            preferences: preferences.into(),
            monthly_budget,
            apartment_size,
        }
    }

    /// Preferences must be 10..=500 characters and the budget at least 1.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut errors = FieldErrors::new();
        check_preferences_text(&mut errors, "preferences", &self.preferences);
        errors.check(
            self.monthly_budget.is_finite() && self.monthly_budget >= 1.0,
            "monthly_budget",
            "Budget must be a positive number.",
        );
        errors.into_result()
    }
}
