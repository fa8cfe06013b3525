//! Query parameters for transaction views.
//!
//! [`RawTransactionQuery`] mirrors the untyped query string an HTTP client
//! sends. [`RawTransactionQuery::parse`] validates it into a
//! [`TransactionFilter`], reporting the first malformed field by name.
//!
//! The owner is not part of the filter: every store operation takes it as a
//! separate argument and applies it before any of these predicates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, util::parse_uuid};

/// Untyped filter parameters, as received.
///
/// Empty strings count as absent.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawTransactionQuery {
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub min_amount: Option<String>,
    pub max_amount: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

/// Sign-based transaction type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionType {
    /// `amount > 0`
    Income,
    /// `amount < 0`
    Expense,
}

impl TryFrom<&str> for TransactionType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::validation(
                "type",
                format!("'{other}' is not one of income, expense"),
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrderKey {
    #[default]
    CreatedAt,
    Amount,
    Category,
}

/// Sort key plus direction. Defaults to newest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransactionOrdering {
    pub key: OrderKey,
    pub descending: bool,
}

impl Default for TransactionOrdering {
    fn default() -> Self {
        Self {
            key: OrderKey::CreatedAt,
            descending: true,
        }
    }
}

impl TryFrom<&str> for TransactionOrdering {
    type Error = EngineError;

    /// Parses `created_at`, `amount` or `category`, optionally prefixed with
    /// `-` for descending order.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let (descending, name) = match value.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, value),
        };
        let key = match name {
            "created_at" => OrderKey::CreatedAt,
            "amount" => OrderKey::Amount,
            "category" => OrderKey::Category,
            _ => {
                return Err(EngineError::validation(
                    "ordering",
                    format!("'{value}' is not one of created_at, amount, category"),
                ));
            }
        };
        Ok(Self { key, descending })
    }
}

/// Typed, validated filters for a transaction view. All predicates are
/// combined with AND; `None` means "no constraint".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub category_id: Option<Uuid>,
    pub kind: Option<TransactionType>,
    /// Inclusive lower bound on `created_at`.
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`.
    pub end: Option<DateTime<Utc>>,
    pub min_amount: Option<Money>,
    pub max_amount: Option<Money>,
    /// Substring matched against title or description.
    pub search: Option<String>,
    pub ordering: TransactionOrdering,
}

impl TransactionFilter {
    /// Same filter with the date range dropped. Used by the fixed-window
    /// aggregations, which pick their own range.
    #[must_use]
    pub fn without_dates(&self) -> Self {
        Self {
            start: None,
            end: None,
            ..self.clone()
        }
    }

    pub(crate) fn validate(&self) -> ResultEngine<()> {
        if let (Some(start), Some(end)) = (self.start, self.end)
            && start > end
        {
            return Err(EngineError::validation(
                "start_date",
                "must not be after end_date",
            ));
        }
        if let (Some(min), Some(max)) = (self.min_amount, self.max_amount)
            && min > max
        {
            return Err(EngineError::validation(
                "min_amount",
                "must not be greater than max_amount",
            ));
        }
        Ok(())
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Clone, Copy)]
enum DayEdge {
    Start,
    End,
}

/// Accepts `YYYY-MM-DD`, RFC 3339, or a naive `YYYY-MM-DD[T ]HH:MM[:SS]`
/// read as UTC. A bare date expands to the first or last instant of the day.
fn parse_datetime(raw: &str, field: &str, edge: DayEdge) -> ResultEngine<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let naive = match edge {
            DayEdge::Start => date.and_hms_opt(0, 0, 0),
            DayEdge::End => date.and_hms_nano_opt(23, 59, 59, 999_999_999),
        };
        return naive
            .map(|dt| dt.and_utc())
            .ok_or_else(|| EngineError::validation(field, format!("'{raw}' is out of range")));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(EngineError::validation(
        field,
        format!("'{raw}' is not a date (expected YYYY-MM-DD or RFC 3339)"),
    ))
}

impl RawTransactionQuery {
    /// Validate every parameter into a [`TransactionFilter`].
    pub fn parse(&self) -> ResultEngine<TransactionFilter> {
        let filter = TransactionFilter {
            category_id: present(&self.category)
                .map(|raw| parse_uuid(raw, "category"))
                .transpose()?,
            kind: present(&self.kind)
                .map(TransactionType::try_from)
                .transpose()?,
            start: present(&self.start_date)
                .map(|raw| parse_datetime(raw, "start_date", DayEdge::Start))
                .transpose()?,
            end: present(&self.end_date)
                .map(|raw| parse_datetime(raw, "end_date", DayEdge::End))
                .transpose()?,
            min_amount: present(&self.min_amount)
                .map(|raw| Money::parse_field(raw, "min_amount"))
                .transpose()?,
            max_amount: present(&self.max_amount)
                .map(|raw| Money::parse_field(raw, "max_amount"))
                .transpose()?,
            search: present(&self.search).map(ToString::to_string),
            ordering: present(&self.ordering)
                .map(TransactionOrdering::try_from)
                .transpose()?
                .unwrap_or_default(),
        };
        filter.validate()?;
        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn raw() -> RawTransactionQuery {
        RawTransactionQuery::default()
    }

    #[test]
    fn empty_query_is_unfiltered_newest_first() {
        let filter = raw().parse().unwrap();
        assert_eq!(filter, TransactionFilter::default());
        assert_eq!(filter.ordering.key, OrderKey::CreatedAt);
        assert!(filter.ordering.descending);
    }

    #[test]
    fn blank_values_count_as_absent() {
        let filter = RawTransactionQuery {
            category: Some(String::new()),
            kind: Some("  ".to_string()),
            search: Some(String::new()),
            ..raw()
        }
        .parse()
        .unwrap();
        assert_eq!(filter, TransactionFilter::default());
    }

    #[test]
    fn parses_every_field() {
        let category = Uuid::new_v4();
        let filter = RawTransactionQuery {
            category: Some(category.to_string()),
            kind: Some("expense".to_string()),
            start_date: Some("2024-05-01".to_string()),
            end_date: Some("2024-05-31".to_string()),
            min_amount: Some("-100".to_string()),
            max_amount: Some("-0.50".to_string()),
            search: Some("coffee".to_string()),
            ordering: Some("amount".to_string()),
        }
        .parse()
        .unwrap();

        assert_eq!(filter.category_id, Some(category));
        assert_eq!(filter.kind, Some(TransactionType::Expense));
        assert_eq!(
            filter.start,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
        );
        let end = filter.end.unwrap();
        assert!(end > Utc.with_ymd_and_hms(2024, 5, 31, 23, 59, 59).unwrap());
        assert!(end < Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(filter.min_amount, Some(Money::new(-10_000)));
        assert_eq!(filter.max_amount, Some(Money::new(-50)));
        assert_eq!(filter.search.as_deref(), Some("coffee"));
        assert_eq!(
            filter.ordering,
            TransactionOrdering {
                key: OrderKey::Amount,
                descending: false
            }
        );
    }

    #[test]
    fn rfc3339_end_is_an_exact_instant() {
        let filter = RawTransactionQuery {
            end_date: Some("2024-05-31T12:00:00+02:00".to_string()),
            ..raw()
        }
        .parse()
        .unwrap();
        assert_eq!(
            filter.end,
            Some(Utc.with_ymd_and_hms(2024, 5, 31, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn malformed_values_name_their_field() {
        let cases = [
            (
                RawTransactionQuery {
                    category: Some("seven".to_string()),
                    ..raw()
                },
                "category",
            ),
            (
                RawTransactionQuery {
                    kind: Some("transfer".to_string()),
                    ..raw()
                },
                "type",
            ),
            (
                RawTransactionQuery {
                    start_date: Some("yesterday".to_string()),
                    ..raw()
                },
                "start_date",
            ),
            (
                RawTransactionQuery {
                    end_date: Some("2024-02-30".to_string()),
                    ..raw()
                },
                "end_date",
            ),
            (
                RawTransactionQuery {
                    min_amount: Some("ten".to_string()),
                    ..raw()
                },
                "min_amount",
            ),
            (
                RawTransactionQuery {
                    max_amount: Some("1.234".to_string()),
                    ..raw()
                },
                "max_amount",
            ),
            (
                RawTransactionQuery {
                    ordering: Some("-title".to_string()),
                    ..raw()
                },
                "ordering",
            ),
        ];

        for (query, field) in cases {
            let err = query.parse().unwrap_err();
            assert_eq!(err.field(), Some(field), "{err}");
        }
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        let err = RawTransactionQuery {
            start_date: Some("2024-06-01".to_string()),
            end_date: Some("2024-05-01".to_string()),
            ..raw()
        }
        .parse()
        .unwrap_err();
        assert_eq!(err.field(), Some("start_date"));

        let err = RawTransactionQuery {
            min_amount: Some("10".to_string()),
            max_amount: Some("5".to_string()),
            ..raw()
        }
        .parse()
        .unwrap_err();
        assert_eq!(err.field(), Some("min_amount"));
    }

    #[test]
    fn same_day_range_is_valid() {
        let filter = RawTransactionQuery {
            start_date: Some("2024-05-01".to_string()),
            end_date: Some("2024-05-01".to_string()),
            ..raw()
        }
        .parse()
        .unwrap();
        assert!(filter.start < filter.end);
    }

    #[test]
    fn without_dates_keeps_other_predicates() {
        let filter = RawTransactionQuery {
            kind: Some("income".to_string()),
            start_date: Some("2024-05-01".to_string()),
            end_date: Some("2024-05-02".to_string()),
            ..raw()
        }
        .parse()
        .unwrap()
        .without_dates();
        assert_eq!(filter.start, None);
        assert_eq!(filter.end, None);
        assert_eq!(filter.kind, Some(TransactionType::Income));
    }
}
