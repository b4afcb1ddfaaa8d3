use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Furniture category, shared by the marketplace filter and the spending
/// aggregator.
///
/// The catalog sends categories as free strings. The known set maps onto
/// named variants; anything else is kept verbatim in `Unknown` so it still
/// counts as its own category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FurnitureCategory {
    LivingRoom,
    Bedroom,
    DiningRoom,
    Office,
    Outdoor,
    Storage,
    Decor,
    /// A category string outside the known set (stored as received).
    Unknown(String),
}

impl FurnitureCategory {
    /// Every known category, in the order the marketplace lists them.
    pub const KNOWN: [FurnitureCategory; 7] = [
        FurnitureCategory::LivingRoom,
        FurnitureCategory::Bedroom,
        FurnitureCategory::DiningRoom,
        FurnitureCategory::Office,
        FurnitureCategory::Outdoor,
        FurnitureCategory::Storage,
        FurnitureCategory::Decor,
    ];

    /// The wire value, e.g. `"living-room"`.
    pub fn as_str(&self) -> &str {
        match self {
            FurnitureCategory::LivingRoom => "living-room",
            FurnitureCategory::Bedroom => "bedroom",
            FurnitureCategory::DiningRoom => "dining-room",
            FurnitureCategory::Office => "office",
            FurnitureCategory::Outdoor => "outdoor",
            FurnitureCategory::Storage => "storage",
            FurnitureCategory::Decor => "decor",
            FurnitureCategory::Unknown(raw) => raw,
        }
    }

    /// Human-readable label, e.g. `"Living Room"`.
    pub fn label(&self) -> String {
        match self {
            FurnitureCategory::LivingRoom => "Living Room".into(),
            FurnitureCategory::Bedroom => "Bedroom".into(),
            FurnitureCategory::DiningRoom => "Dining Room".into(),
            FurnitureCategory::Office => "Office".into(),
            FurnitureCategory::Outdoor => "Outdoor".into(),
            FurnitureCategory::Storage => "Storage".into(),
            FurnitureCategory::Decor => "Decor".into(),
            FurnitureCategory::Unknown(raw) => title_case(&raw.replace(['-', '_'], " ")),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, FurnitureCategory::Unknown(_))
    }
}

impl From<String> for FurnitureCategory {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "living-room" => FurnitureCategory::LivingRoom,
            "bedroom" => FurnitureCategory::Bedroom,
            "dining-room" => FurnitureCategory::DiningRoom,
            "office" => FurnitureCategory::Office,
            "outdoor" => FurnitureCategory::Outdoor,
            "storage" => FurnitureCategory::Storage,
            "decor" => FurnitureCategory::Decor,
            _ => FurnitureCategory::Unknown(raw),
        }
    }
}

impl From<&str> for FurnitureCategory {
    fn from(raw: &str) -> Self {
        FurnitureCategory::from(raw.to_string())
    }
}

impl From<FurnitureCategory> for String {
    fn from(c: FurnitureCategory) -> Self {
        match c {
            FurnitureCategory::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Parses only the known set (used for user-supplied filters, where a typo
/// should be an error rather than an empty result).
impl FromStr for FurnitureCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '_'], "-");
        match FurnitureCategory::from(normalized) {
            FurnitureCategory::Unknown(_) => Err(format!(
                "unknown category '{s}' (expected one of: {})",
                FurnitureCategory::KNOWN
                    .iter()
                    .map(FurnitureCategory::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            known => Ok(known),
        }
    }
}

impl std::fmt::Display for FurnitureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uppercase the first letter of every space-separated word.
pub(crate) fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
