use std::collections::BTreeMap;

use crate::models::category::FurnitureCategory;
use crate::models::metrics::{CategoryCount, DashboardMetrics, MonthKey, MonthlySpending};
use crate::models::money::Money;
use crate::models::transaction::Transaction;

/// Reduce a transaction history to dashboard metrics.
///
/// Pure: the only effect is a `warn` log per transaction whose `amount` does
/// not match its line items. Computes, in one pass:
/// - total spent (Σ amount; the backend's amount is authoritative)
/// - total items (Σ quantity over every line item)
/// - most bought category (see [`rank_categories`])
/// - spending per calendar month in UTC, oldest first
pub fn aggregate(transactions: &[Transaction]) -> DashboardMetrics {
    let mut total_spent = Money::ZERO;
    let mut total_items: u64 = 0;
    let mut category_counts: Vec<(FurnitureCategory, u64)> = Vec::new();
    let mut monthly: BTreeMap<MonthKey, Money> = BTreeMap::new();
    let mut unreconciled = Vec::new();

    for transaction in transactions {
        total_spent += transaction.amount;
        total_items += transaction.item_count();

        for item in &transaction.items {
            let category = &item.furniture.category;
            let quantity = u64::from(item.quantity);
            match category_counts.iter_mut().find(|(c, _)| c == category) {
                Some((_, count)) => *count += quantity,
                None => category_counts.push((category.clone(), quantity)),
            }
        }

        let month = MonthKey::of(transaction.created_at.date_naive());
        *monthly.entry(month).or_insert(Money::ZERO) += transaction.amount;

        if !transaction.reconciles() {
            tracing::warn!(
                transaction = %transaction.id,
                amount = %transaction.amount,
                line_items = %transaction.line_items_total(),
                "transaction amount does not match its line items"
            );
            unreconciled.push(transaction.id.clone());
        }
    }

    DashboardMetrics {
        total_spent,
        total_items,
        most_bought_category: rank_categories(&category_counts),
        monthly_spending: monthly
            .into_iter()
            .map(|(month, amount)| MonthlySpending { month, amount })
            .collect(),
        unreconciled,
    }
}

/// Pick the category with the strictly greatest count.
///
/// `counts` is in first-seen order. The leader is only replaced by a strictly
/// greater count, so on a tie the category seen first wins. A zero count
/// never wins.
pub fn rank_categories(counts: &[(FurnitureCategory, u64)]) -> Option<CategoryCount> {
    let mut leader: Option<&(FurnitureCategory, u64)> = None;
    for entry in counts {
        let best = leader.map_or(0, |(_, c)| *c);
        if entry.1 > best {
            leader = Some(entry);
        }
    }
    leader.map(|(category, count)| CategoryCount {
        category: category.clone(),
        count: *count,
    })
}
