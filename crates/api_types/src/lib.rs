use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Keeps "field absent" (`None`) apart from "field is null" (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Register {
        pub username: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Registered {
        pub username: String,
        /// Default categories created for the new user.
        pub categories_created: usize,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        /// `#RGB` or `#RRGGBB`.
        pub color: String,
    }

    /// Partial update, absent fields are left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub color: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub color: String,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub title: String,
        #[serde(default)]
        pub description: Option<String>,
        /// Signed amount in minor units: positive income, negative expense.
        pub amount_minor: i64,
        #[serde(default)]
        pub category_id: Option<Uuid>,
    }

    /// Partial update.
    ///
    /// For `description` and `category_id`, an explicit `null` clears the
    /// value while an absent field leaves it untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub title: Option<String>,
        #[serde(
            default,
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub description: Option<Option<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub amount_minor: Option<i64>,
        #[serde(
            default,
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub category_id: Option<Option<Uuid>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub title: String,
        pub description: Option<String>,
        pub amount_minor: i64,
        pub category_id: Option<Uuid>,
        pub created_at: DateTime<Utc>,
    }
}

pub mod report {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Balance {
        pub balance_minor: i64,
        /// Echo of the requested label, never converted.
        pub currency: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategorySummary {
        pub id: Uuid,
        pub name: String,
        pub color: String,
        /// Spending as a positive number of minor units.
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DailyBalance {
        pub date: NaiveDate,
        pub balance_minor: i64,
    }
}

#[cfg(test)]
mod tests {
    use super::transaction::TransactionUpdate;

    #[test]
    fn update_tells_null_from_absent() {
        let absent: TransactionUpdate = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        assert_eq!(absent.category_id, None);
        assert_eq!(absent.description, None);

        let cleared: TransactionUpdate =
            serde_json::from_str(r#"{"category_id":null,"description":null}"#).unwrap();
        assert_eq!(cleared.category_id, Some(None));
        assert_eq!(cleared.description, Some(None));
    }
}
