use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::FurnitureCategory;
use super::money::Money;

/// The furniture reference embedded in a transaction line item.
///
/// The history endpoint populates the reference, so only the fields the
/// dashboard needs are required; everything else is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureRef {
    #[serde(rename = "_id", default)]
    pub id: String,

    pub name: String,

    pub category: FurnitureCategory,
}

/// One line of a transaction: which furniture, how many, at what unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionItem {
    #[serde(rename = "furnitureId")]
    pub furniture: FurnitureRef,

    /// Always at least 1.
    pub quantity: u32,

    pub price_at_time: Money,
}

impl TransactionItem {
    pub fn line_total(&self) -> Money {
        self.price_at_time * self.quantity
    }
}

/// A recorded purchase event, as returned by `GET /payment/history/{email}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub id: String,

    pub email: String,

    /// Amount charged, as recorded by the backend.
    pub amount: Money,

    #[serde(default)]
    pub items: Vec<TransactionItem>,

    pub payment_method: String,

    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Total number of units across all line items.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Σ(quantity × price-at-time) over the line items.
    pub fn line_items_total(&self) -> Money {
        self.items.iter().map(TransactionItem::line_total).sum()
    }

    /// Whether the recorded `amount` matches the line items.
    /// A transaction without items is taken at face value.
    pub fn reconciles(&self) -> bool {
        self.items.is_empty() || self.amount == self.line_items_total()
    }

    /// Comma-separated furniture names, for table display.
    pub fn item_names(&self) -> String {
        self.items
            .iter()
            .map(|i| i.furniture.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
