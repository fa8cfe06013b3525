use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, categories, transactions, users};

use super::Engine;

/// Same message for missing and foreign categories.
pub(super) const CATEGORY_NOT_ACCESSIBLE: &str = "category not accessible";

impl Engine {
    /// Loads a category owned by `user_id`.
    pub(super) async fn require_category(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        category_id: Uuid,
    ) -> ResultEngine<categories::Model> {
        categories::Entity::find_by_id(category_id.to_string())
            .filter(categories::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))
    }

    /// Checks a category reference carried by a transaction write.
    pub(super) async fn require_category_reference(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        category_id: Uuid,
    ) -> ResultEngine<()> {
        match self.require_category(db, user_id, category_id).await {
            Ok(_) => Ok(()),
            Err(EngineError::KeyNotFound(_)) => {
                Err(EngineError::Forbidden(CATEGORY_NOT_ACCESSIBLE.to_string()))
            }
            Err(err) => Err(err),
        }
    }

    /// Loads a transaction owned by `user_id`.
    pub(super) async fn require_transaction(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        transaction_id: Uuid,
    ) -> ResultEngine<transactions::Model> {
        transactions::Entity::find_by_id(transaction_id.to_string())
            .filter(transactions::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))
    }

    pub(super) async fn require_user_exists(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }
}
