//! Command structs for engine operations.
//!
//! These types group parameters for write operations (category and
//! transaction create/update), keeping call sites readable and avoiding long
//! argument lists.

use uuid::Uuid;

use crate::Money;

/// Create a category.
#[derive(Clone, Debug)]
pub struct NewCategory {
    pub name: String,
    pub color: String,
}

impl NewCategory {
    #[must_use]
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Partial category update. `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl CategoryUpdate {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none()
    }
}

/// Create a transaction.
#[derive(Clone, Debug)]
pub struct NewTransaction {
    pub title: String,
    pub description: Option<String>,
    pub amount: Money,
    pub category_id: Option<Uuid>,
}

impl NewTransaction {
    #[must_use]
    pub fn new(title: impl Into<String>, amount: Money) -> Self {
        Self {
            title: title.into(),
            description: None,
            amount,
            category_id: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// Partial transaction update.
///
/// The outer `Option` means "leave untouched"; for `description` and
/// `category_id` an inner `None` clears the value. `created_at` and the owner
/// are immutable and have no counterpart here.
#[derive(Clone, Debug, Default)]
pub struct TransactionUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub amount: Option<Money>,
    pub category_id: Option<Option<Uuid>>,
}

impl TransactionUpdate {
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn category(mut self, category_id: Option<Uuid>) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.amount.is_none()
            && self.category_id.is_none()
    }
}
