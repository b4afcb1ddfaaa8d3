use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::validation::{looks_like_email, FieldErrors};

/// Payment method sent with a checkout. The marketplace only offers cards.
pub const DEFAULT_PAYMENT_METHOD: &str = "credit_card";

/// One line of a checkout request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    pub furniture_id: String,
    pub quantity: u32,
}

/// Body of `POST /payment/process`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub email: String,
    pub items: Vec<CheckoutItem>,
    pub payment_method: String,
}

impl PaymentRequest {
    /// A single-item card payment, the only shape the marketplace produces.
    pub fn single(email: impl Into<String>, furniture_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            email: email.into(),
            items: vec![CheckoutItem {
                furniture_id: furniture_id.into(),
                quantity,
            }],
            payment_method: DEFAULT_PAYMENT_METHOD.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let mut errors = FieldErrors::new();
        errors.check(looks_like_email(&self.email), "email", "A valid account email is required.");
        errors.check(!self.items.is_empty(), "items", "At least one item is required.");
        errors.check(
            self.items.iter().all(|i| !i.furniture_id.trim().is_empty()),
            "items",
            "Every item needs a furniture id.",
        );
        errors.check(
            self.items.iter().all(|i| i.quantity >= 1),
            "items",
            "Quantity must be at least 1.",
        );
        errors.check(
            !self.payment_method.trim().is_empty(),
            "paymentMethod",
            "Payment method is required.",
        );
        errors.into_result()
    }
}

/// Whatever the payment endpoint answers on success. The body is not
/// interpreted beyond being JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentReceipt(pub serde_json::Value);

impl PaymentReceipt {
    /// The backend's `message` field, if it sent one.
    pub fn message(&self) -> Option<&str> {
        self.0.get("message").and_then(|m| m.as_str())
    }
}
