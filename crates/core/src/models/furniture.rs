use serde::{Deserialize, Serialize};

use super::category::FurnitureCategory;
use super::money::Money;

/// A catalog item as served by `GET /furniture`.
///
/// Read-only: the catalog service owns these records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Furniture {
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    pub category: FurnitureCategory,

    pub price: Money,

    /// Units available for rental.
    #[serde(default)]
    pub quantity: u32,

    #[serde(default, alias = "imgUrl")]
    pub image_url: Option<String>,
}

impl Furniture {
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}
