//! Prompt templates for the two recommendation flows.

use super::traits::Prompt;
use crate::models::recommendation::{RecommendationRequest, StyleAssessmentRequest};

pub const ASSESS_STYLE_PROMPT: &str = "assessStyleAndSuggestFurniture";
pub const RECOMMENDATIONS_PROMPT: &str = "generateFurnitureRecommendations";

pub fn assess_style(request: &StyleAssessmentRequest) -> Prompt {
    let text = "You are an interior design assistant. A user will upload a photo of their space. \
You will assess their style based on the photo, and then provide furniture recommendations \
that match the assessed style.\n\
\n\
Photo: (attached)\n\
\n\
Style Assessment: Based on the photo, describe the user's style. Consider elements like color \
palettes, furniture types, and overall aesthetic.\n\
Furniture Recommendations: Based on the style assessment, recommend specific types of furniture \
(e.g., sofas, chairs, tables) that would complement the space. Explain why you are recommending \
each piece.\n\
\n\
Respond with a JSON object with exactly two string fields: \"styleAssessment\" and \
\"furnitureRecommendations\"."
        .to_string();

    Prompt {
        name: ASSESS_STYLE_PROMPT,
        text,
        media: Some(request.photo_data_uri.clone()),
    }
}

pub fn furniture_recommendations(request: &RecommendationRequest) -> Prompt {
    let mut text = String::from(
        "You are an expert interior designer specializing in rental furniture.\n\
You will generate personalized furniture recommendations based on the user's rental \
preferences, budget, and apartment size. Use the following information to generate the \
recommendations.\n\n",
    );
    text.push_str(&format!(
        "Rental Preferences: {}\n",
        request.rental_preferences.trim()
    ));
    text.push_str(&format!("Budget: {}\n", format_budget(request.budget)));
    text.push_str(&format!("Apartment Size: {}\n", request.apartment_size));
    if request.photo_data_uri.is_some() {
        text.push_str("Space Photo: (attached)\n");
    }
    text.push_str(
        "\nConsider suggesting complete furniture sets (sofas, beds, tables, etc.) that are \
suitable for rentals.\n\n\
Respond with a JSON object with exactly one string field: \"furnitureRecommendations\".",
    );

    Prompt {
        name: RECOMMENDATIONS_PROMPT,
        text,
        media: request.photo_data_uri.clone(),
    }
}

/// Whole budgets print without decimals (`500`), others with two (`499.50`).
fn format_budget(budget: f64) -> String {
    if budget.fract() == 0.0 {
        format!("{budget:.0}")
    } else {
        format!("{budget:.2}")
    }
}
