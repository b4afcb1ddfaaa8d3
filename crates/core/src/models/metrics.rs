use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::category::FurnitureCategory;
use super::money::Money;

/// Spending summary computed from a user's transaction history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    /// Σ amount over all transactions
    pub total_spent: Money,

    /// Σ quantity over every line item of every transaction
    pub total_items: u64,

    /// Category with the strictly greatest accumulated quantity.
    /// `None` when there are no line items at all.
    pub most_bought_category: Option<CategoryCount>,

    /// Spending per calendar month, oldest first
    pub monthly_spending: Vec<MonthlySpending>,

    /// Ids of transactions whose `amount` disagrees with their line items.
    /// Totals still use `amount`.
    #[serde(default)]
    pub unreconciled: Vec<String>,
}

impl DashboardMetrics {
    pub fn empty() -> Self {
        Self {
            total_spent: Money::ZERO,
            total_items: 0,
            most_bought_category: None,
            monthly_spending: Vec::new(),
            unreconciled: Vec::new(),
        }
    }
}

/// A category and the number of units bought in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: FurnitureCategory,
    pub count: u64,
}

/// Calendar month used as a bucket key. Orders by year, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    /// 1..=12
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Long label, e.g. `"March 2024"`.
    pub fn label(self) -> String {
        match self.first_day() {
            Some(d) => d.format("%B %Y").to_string(),
            None => format!("{:04}-{:02}", self.year, self.month),
        }
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One point of the monthly spending series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySpending {
    pub month: MonthKey,
    pub amount: Money,
}

/// Everything the dashboard shows: the raw history and its summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    /// History in server order
    pub transactions: Vec<super::transaction::Transaction>,
    pub metrics: DashboardMetrics,
}
