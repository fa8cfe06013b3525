use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::TransactionTrait;
use uuid::Uuid;

use crate::{
    CategorySummary, DailyBalance, ExportRow, Money, ResultEngine, TransactionFilter,
    aggregation::{self, month_start},
    export::{to_csv, to_xls},
};

use super::{Engine, with_tx};

/// Drops the caller's date range and pins the lower bound to the start of
/// the current month. The aggregation applies its own window on top.
fn month_window(filter: &TransactionFilter, now: DateTime<Utc>) -> TransactionFilter {
    let mut filter = filter.without_dates();
    filter.start = Some(month_start(now));
    filter
}

impl Engine {
    /// Sum of the amounts in the filtered view.
    pub async fn balance(&self, user_id: &str, filter: &TransactionFilter) -> ResultEngine<Money> {
        with_tx!(self, |db_tx| {
            let view = self.view(&db_tx, user_id, filter).await?;
            Ok(aggregation::balance(&view))
        })
    }

    /// Current month's spending per category. The date range of `filter` is
    /// ignored, the other predicates apply.
    pub async fn category_summary(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
        now: DateTime<Utc>,
    ) -> ResultEngine<Vec<CategorySummary>> {
        with_tx!(self, |db_tx| {
            let view = self
                .view(&db_tx, user_id, &month_window(filter, now))
                .await?;
            let categories = self.categories_of(&db_tx, user_id).await?;
            Ok(aggregation::category_summary(&view, &categories, now))
        })
    }

    /// Daily running balance from the 1st of the month through today. The
    /// date range of `filter` is ignored, the other predicates apply.
    pub async fn balance_history(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
        now: DateTime<Utc>,
    ) -> ResultEngine<Vec<DailyBalance>> {
        with_tx!(self, |db_tx| {
            let view = self
                .view(&db_tx, user_id, &month_window(filter, now))
                .await?;
            Ok(aggregation::balance_history(&view, now))
        })
    }

    async fn export_rows(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> ResultEngine<Vec<ExportRow>> {
        with_tx!(self, |db_tx| {
            let view = self.view(&db_tx, user_id, filter).await?;
            let names: HashMap<Uuid, String> = self
                .categories_of(&db_tx, user_id)
                .await?
                .into_iter()
                .map(|category| (category.id, category.name))
                .collect();

            let rows: Vec<ExportRow> = view
                .iter()
                .map(|tx| {
                    let name = tx
                        .category_id
                        .and_then(|id| names.get(&id))
                        .map(String::as_str);
                    ExportRow::from_transaction(tx, name)
                })
                .collect();
            tracing::debug!(user = user_id, rows = rows.len(), "export rows ready");
            Ok(rows)
        })
    }

    /// The filtered view as CSV, header included.
    pub async fn export_csv(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> ResultEngine<Vec<u8>> {
        let rows = self.export_rows(user_id, filter).await?;
        to_csv(&rows)
    }

    /// The filtered view as an `.xls` workbook, header included.
    pub async fn export_xls(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> ResultEngine<Vec<u8>> {
        let rows = self.export_rows(user_id, filter).await?;
        to_xls(&rows)
    }
}
