use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, NewTransaction, ResultEngine, Transaction, TransactionUpdate, transactions,
    util::{MAX_NAME_LEN, normalize_optional_text, normalize_required_text},
};

use super::{Engine, with_tx};

mod list;

impl Engine {
    pub async fn transaction(
        &self,
        user_id: &str,
        transaction_id: Uuid,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, user_id, transaction_id)
                .await?;
            Transaction::try_from(model)
        })
    }

    /// Records a transaction for `user_id`. `created_at` is fixed here and
    /// never changes afterwards.
    pub async fn create_transaction(
        &self,
        user_id: &str,
        cmd: NewTransaction,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;
            let title = normalize_required_text(&cmd.title, "title", MAX_NAME_LEN)?;
            let amount = cmd.amount.bounded("amount")?;
            if let Some(category_id) = cmd.category_id {
                self.require_category_reference(&db_tx, user_id, category_id)
                    .await?;
            }

            let tx = Transaction::new(
                user_id.to_string(),
                title,
                normalize_optional_text(cmd.description.as_deref()),
                amount,
                cmd.category_id,
                created_at,
            );
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            Ok::<Transaction, EngineError>(tx)
        })
    }

    pub async fn update_transaction(
        &self,
        user_id: &str,
        transaction_id: Uuid,
        cmd: TransactionUpdate,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let mut model = self
                .require_transaction(&db_tx, user_id, transaction_id)
                .await?;
            if !cmd.is_empty() {
                let mut active: transactions::ActiveModel = model.into();
                if let Some(title) = cmd.title.as_deref() {
                    active.title =
                        ActiveValue::Set(normalize_required_text(title, "title", MAX_NAME_LEN)?);
                }
                if let Some(description) = &cmd.description {
                    active.description =
                        ActiveValue::Set(normalize_optional_text(description.as_deref()));
                }
                if let Some(amount) = cmd.amount {
                    let amount = amount.bounded("amount")?;
                    active.amount_minor = ActiveValue::Set(amount.cents());
                }
                if let Some(category_id) = cmd.category_id {
                    if let Some(id) = category_id {
                        self.require_category_reference(&db_tx, user_id, id).await?;
                    }
                    active.category_id = ActiveValue::Set(category_id.map(|id| id.to_string()));
                }
                model = active.update(&db_tx).await?;
            }
            Transaction::try_from(model)
        })
    }

    pub async fn delete_transaction(
        &self,
        user_id: &str,
        transaction_id: Uuid,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, user_id, transaction_id)
                .await?;
            transactions::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;
            Ok::<(), EngineError>(())
        })
    }
}
