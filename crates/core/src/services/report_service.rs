use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::models::category::title_case;
use crate::models::metrics::{Dashboard, DashboardMetrics};
use crate::models::money::Money;
use crate::models::transaction::Transaction;

/// Width of the longest bar in the text chart.
const CHART_WIDTH: usize = 30;

/// A headline number on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricCard {
    pub title: String,
    pub value: String,
    pub caption: String,
}

/// One point of the monthly spending line chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// e.g. "March 2024"
    pub label: String,
    pub amount: Money,
}

/// One row of the transaction history table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRow {
    pub date: String,
    pub items: String,
    pub payment_method: String,
    pub amount: String,
}

/// Display-ready dashboard: the core computes and formats, the front end
/// only lays it out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub cards: Vec<MetricCard>,
    pub chart: Vec<ChartPoint>,
    pub rows: Vec<TransactionRow>,
}

pub struct ReportService;

impl ReportService {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, dashboard: &Dashboard) -> DashboardReport {
        DashboardReport {
            cards: metric_cards(&dashboard.metrics),
            chart: chart_series(&dashboard.metrics),
            rows: dashboard.transactions.iter().map(transaction_row).collect(),
        }
    }

    /// Plain-text rendering used by the CLI.
    pub fn render_text(&self, report: &DashboardReport) -> String {
        let mut out = String::new();

        for card in &report.cards {
            let _ = writeln!(out, "{:<22} {}", card.title, card.value);
            let _ = writeln!(out, "{:<22} {}", "", card.caption);
        }

        let _ = writeln!(out, "\nMonthly Spending");
        if report.chart.is_empty() {
            let _ = writeln!(out, "  (no spending yet)");
        } else {
            let max = report.chart.iter().map(|p| p.amount.cents()).max().unwrap_or(0);
            let label_width = report.chart.iter().map(|p| p.label.len()).max().unwrap_or(0);
            for point in &report.chart {
                let bar = bar_length(point.amount.cents(), max);
                let _ = writeln!(
                    out,
                    "  {:<lw$}  {:<cw$}  {}",
                    point.label,
                    "#".repeat(bar),
                    point.amount,
                    lw = label_width,
                    cw = CHART_WIDTH,
                );
            }
        }

        let _ = writeln!(out, "\nTransaction History");
        if report.rows.is_empty() {
            let _ = writeln!(out, "  No transactions found.");
        } else {
            let _ = writeln!(
                out,
                "  {:<10}  {:<40}  {:<16}  {:>12}",
                "Date", "Items", "Payment Method", "Amount"
            );
            for row in &report.rows {
                let _ = writeln!(
                    out,
                    "  {:<10}  {:<40}  {:<16}  {:>12}",
                    row.date, row.items, row.payment_method, row.amount
                );
            }
        }

        out
    }
}

impl Default for ReportService {
    fn default() -> Self {
        Self::new()
    }
}

pub fn metric_cards(metrics: &DashboardMetrics) -> Vec<MetricCard> {
    let (category, count) = match &metrics.most_bought_category {
        Some(top) => (top.category.label(), top.count),
        None => (String::new(), 0),
    };

    vec![
        MetricCard {
            title: "Total Spent".into(),
            value: metrics.total_spent.to_string(),
            caption: "Lifetime spending".into(),
        },
        MetricCard {
            title: "Total Items".into(),
            value: format!("{} Items", metrics.total_items),
            caption: "Total items purchased".into(),
        },
        MetricCard {
            title: "Most Bought Category".into(),
            value: category,
            caption: format!("{count} items in this category"),
        },
    ]
}

pub fn chart_series(metrics: &DashboardMetrics) -> Vec<ChartPoint> {
    metrics
        .monthly_spending
        .iter()
        .map(|m| ChartPoint {
            label: m.month.label(),
            amount: m.amount,
        })
        .collect()
}

pub fn transaction_row(transaction: &Transaction) -> TransactionRow {
    TransactionRow {
        date: transaction.created_at.format("%Y-%m-%d").to_string(),
        items: transaction.item_names(),
        payment_method: title_case(&transaction.payment_method.replace('_', " ")),
        amount: transaction.amount.to_string(),
    }
}

fn bar_length(value: i64, max: i64) -> usize {
    if max <= 0 || value <= 0 {
        return 0;
    }
    let scaled = (value as f64 / max as f64 * CHART_WIDTH as f64).round() as usize;
    scaled.max(1)
}
