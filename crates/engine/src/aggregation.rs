//! Aggregations over a transaction view.
//!
//! All functions here are pure: they take an already filtered, owner-scoped
//! slice of transactions and, for the month-bound ones, an explicit `now`.
//! Calendar days are UTC days, the same calendar the stored `created_at`
//! timestamps use.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{Category, Money, Transaction};

/// Spending of one category in the current month, as a positive magnitude.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub amount: Money,
}

/// Running balance at the end of `date`, relative to the start of the month.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DailyBalance {
    pub date: NaiveDate,
    pub balance: Money,
}

/// First instant (00:00 UTC) of the calendar month containing `now`.
#[must_use]
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now.date_naive();
    let first = today - Days::new(u64::from(today.day0()));
    first.and_time(NaiveTime::MIN).and_utc()
}

/// Sum of all amounts in the view. An empty view is zero.
#[must_use]
pub fn balance(view: &[Transaction]) -> Money {
    view.iter().map(|tx| tx.amount).sum()
}

/// Expenses of the current month grouped by category.
///
/// Only transactions with `amount < 0` created on or after the start of the
/// month count. A category is reported only when its sum is strictly
/// negative, and the reported amount is the sign-inverted sum. Expenses
/// without a category are dropped. The output follows the order of
/// `categories`.
#[must_use]
pub fn category_summary(
    view: &[Transaction],
    categories: &[Category],
    now: DateTime<Utc>,
) -> Vec<CategorySummary> {
    let start = month_start(now);

    let mut totals: HashMap<Uuid, Money> = HashMap::new();
    for tx in view
        .iter()
        .filter(|tx| tx.is_expense() && tx.created_at >= start)
    {
        if let Some(category_id) = tx.category_id {
            *totals.entry(category_id).or_default() += tx.amount;
        }
    }

    categories
        .iter()
        .filter_map(|category| {
            let spent = totals.get(&category.id).copied().unwrap_or_default();
            spent.is_negative().then(|| CategorySummary {
                id: category.id,
                name: category.name.clone(),
                color: category.color.clone(),
                amount: -spent,
            })
        })
        .collect()
}

/// Day-by-day running balance from the 1st of the month through `now`'s
/// date, inclusive.
///
/// The running total starts at zero on the 1st: anything before the month is
/// not carried over. Days without transactions repeat the previous balance.
/// The result always has `now.day()` entries.
#[must_use]
pub fn balance_history(view: &[Transaction], now: DateTime<Utc>) -> Vec<DailyBalance> {
    let start = month_start(now);
    let today = now.date_naive();

    let mut per_day: BTreeMap<NaiveDate, Money> = BTreeMap::new();
    for tx in view.iter().filter(|tx| tx.created_at >= start) {
        *per_day.entry(tx.created_at.date_naive()).or_default() += tx.amount;
    }

    let mut running = Money::ZERO;
    start
        .date_naive()
        .iter_days()
        .take_while(|day| *day <= today)
        .map(|day| {
            running += per_day.get(&day).copied().unwrap_or_default();
            DailyBalance {
                date: day,
                balance: running,
            }
        })
        .collect()
}
