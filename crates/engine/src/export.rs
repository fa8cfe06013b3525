//! Tabular exports of a transaction view.
//!
//! Both encodings share the same rows and column order:
//! `Title, Description, Category, Amount, Date`.

use chrono::{DateTime, Utc};
use csv::Writer;

use crate::{EngineError, Money, ResultEngine, Transaction};

mod xls;

pub use xls::to_xls;

pub const HEADER: [&str; 5] = ["Title", "Description", "Category", "Amount", "Date"];

pub(crate) const UNCATEGORIZED: &str = "Uncategorized";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One exported line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportRow {
    pub title: String,
    pub description: String,
    pub category: String,
    pub amount: Money,
    /// `YYYY-MM-DD HH:MM`, UTC.
    pub date: String,
}

impl ExportRow {
    /// Builds the row for `tx`. `category_name` is `None` when the
    /// transaction has no category.
    pub fn from_transaction(tx: &Transaction, category_name: Option<&str>) -> Self {
        Self {
            title: tx.title.clone(),
            description: tx.description.clone().unwrap_or_default(),
            category: category_name.unwrap_or(UNCATEGORIZED).to_string(),
            amount: tx.amount,
            date: tx.created_at.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Encode rows as comma-separated text. The header is always present.
pub fn to_csv(rows: &[ExportRow]) -> ResultEngine<Vec<u8>> {
    let export_err = |err: csv::Error| EngineError::Export(err.to_string());

    let mut writer = Writer::from_writer(vec![]);
    writer.write_record(HEADER).map_err(export_err)?;
    for row in rows {
        writer
            .write_record([
                row.title.as_str(),
                row.description.as_str(),
                row.category.as_str(),
                row.amount.to_string().as_str(),
                row.date.as_str(),
            ])
            .map_err(export_err)?;
    }

    writer
        .into_inner()
        .map_err(|err| EngineError::Export(err.to_string()))
}

/// `transactions_YYYYMMDD_HHMMSS.<extension>`
pub fn export_filename(now: DateTime<Utc>, extension: &str) -> String {
    format!("transactions_{}.{extension}", now.format("%Y%m%d_%H%M%S"))
}
