use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::core::period::Period;
use crate::domain::common::{Amounted, Categorized};
use crate::domain::{Subscription, Transaction};

/// Breakdown label for expense transactions without a category.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";
/// Breakdown label for subscriptions without a category.
pub const SUBSCRIPTIONS_LABEL: &str = "Subscriptions";

/// Income, expense, and subscription sums for one window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalanceTotals {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub total_subscription_cost: Decimal,
}

impl BalanceTotals {
    /// Net position: income minus expenses minus subscription cost.
    pub fn balance(&self) -> Decimal {
        self.total_income - self.total_expense - self.total_subscription_cost
    }

    /// Displayed outgoing total: one-off expenses plus subscription cost.
    pub fn combined_expense(&self) -> Decimal {
        self.total_expense + self.total_subscription_cost
    }

    /// All-time totals, no window applied. Backs the header figures shown
    /// above every period view.
    pub fn overall(transactions: &[Transaction], subscriptions: &[Subscription]) -> Self {
        Self {
            total_income: transactions
                .iter()
                .filter(|txn| txn.is_income())
                .map(|txn| txn.amount)
                .sum(),
            total_expense: transactions
                .iter()
                .filter(|txn| txn.is_expense())
                .map(|txn| txn.amount)
                .sum(),
            total_subscription_cost: subscriptions.iter().map(|sub| sub.amount).sum(),
        }
    }
}

/// One accumulated entry of the category breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryTotal {
    pub label: String,
    pub amount: Decimal,
}

/// One slice of the breakdown with its share of the total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownSlice {
    pub label: String,
    pub amount: Decimal,
    pub percent: Decimal,
}

/// Derived view over the record collections. Never persisted; recomputed
/// from scratch on every read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewSummary {
    pub period: Period,
    pub totals: BalanceTotals,
    pub category_breakdown: Vec<CategoryTotal>,
}

impl OverviewSummary {
    pub fn balance(&self) -> Decimal {
        self.totals.balance()
    }

    pub fn breakdown_total(&self) -> Decimal {
        self.category_breakdown
            .iter()
            .map(|entry| entry.amount)
            .sum()
    }

    /// The two-bar income/outgoing series.
    pub fn balance_series(&self) -> Vec<(&'static str, Decimal)> {
        vec![
            ("Income", self.totals.total_income),
            ("Expenses", self.totals.combined_expense()),
        ]
    }

    /// Breakdown entries with whole-number percentages of the breakdown
    /// total, half shares rounding up. Empty when nothing was spent.
    pub fn breakdown_slices(&self) -> Vec<BreakdownSlice> {
        let total = self.breakdown_total();
        if total.is_zero() {
            return Vec::new();
        }
        self.category_breakdown
            .iter()
            .map(|entry| BreakdownSlice {
                label: entry.label.clone(),
                amount: entry.amount,
                percent: (entry.amount / total * Decimal::from(100))
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
            })
            .collect()
    }
}

/// Builds the summary for one window. Transactions are filtered to the
/// period; subscriptions always count in full, whatever the window, as
/// standing obligations.
pub fn summarize(
    transactions: &[Transaction],
    subscriptions: &[Subscription],
    period: Period,
    now: DateTime<Utc>,
) -> OverviewSummary {
    let filtered = period.filter(transactions, now);

    let total_income: Decimal = filtered
        .iter()
        .filter(|txn| txn.is_income())
        .map(|txn| txn.amount)
        .sum();
    let total_expense: Decimal = filtered
        .iter()
        .filter(|txn| txn.is_expense())
        .map(|txn| txn.amount)
        .sum();
    let total_subscription_cost: Decimal = subscriptions.iter().map(|sub| sub.amount).sum();

    let mut category_breakdown: Vec<CategoryTotal> = Vec::new();
    accumulate(
        filtered.iter().copied().filter(|txn| txn.is_expense()),
        UNCATEGORIZED_LABEL,
        &mut category_breakdown,
    );
    accumulate(
        subscriptions.iter(),
        SUBSCRIPTIONS_LABEL,
        &mut category_breakdown,
    );

    OverviewSummary {
        period,
        totals: BalanceTotals {
            total_income,
            total_expense,
            total_subscription_cost,
        },
        category_breakdown,
    }
}

/// Folds amounts into the breakdown keyed by category label, preserving
/// first-occurrence order. Blank categories fall back to `fallback`.
fn accumulate<'a, T, I>(items: I, fallback: &str, breakdown: &mut Vec<CategoryTotal>)
where
    T: Amounted + Categorized + 'a,
    I: IntoIterator<Item = &'a T>,
{
    for item in items {
        let label = if item.category().is_empty() {
            fallback
        } else {
            item.category()
        };
        match breakdown.iter_mut().find(|entry| entry.label == label) {
            Some(entry) => entry.amount += item.amount(),
            None => breakdown.push(CategoryTotal {
                label: label.to_string(),
                amount: item.amount(),
            }),
        }
    }
}
