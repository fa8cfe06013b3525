use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{
    DEFAULT_CATEGORIES, EngineError, ResultEngine, SeedReport, User, categories, transactions,
    users,
};

use super::{Engine, with_tx};

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 150;
const PASSWORD_MIN: usize = 8;

fn validate_username(username: &str) -> ResultEngine<()> {
    let len = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(EngineError::validation(
            "username",
            format!("must be {USERNAME_MIN} to {USERNAME_MAX} characters"),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(EngineError::validation(
            "username",
            "may only contain letters, digits and @/./+/-/_",
        ));
    }
    Ok(())
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

impl Engine {
    /// Creates every default category `user_id` does not have yet, matched by
    /// exact name.
    pub(super) async fn seed_categories_in(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<SeedReport> {
        let existing: HashSet<String> = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .all(db)
            .await?
            .into_iter()
            .map(|model| model.name)
            .collect();

        let mut report = SeedReport::default();
        for (name, color) in DEFAULT_CATEGORIES {
            if existing.contains(name) {
                report.existing += 1;
                continue;
            }
            self.insert_category(db, user_id, name, color).await?;
            report.created += 1;
        }
        Ok(report)
    }

    /// Gives `user_id` the default categories it is missing.
    pub async fn seed_default_categories(&self, user_id: &str) -> ResultEngine<SeedReport> {
        let report = with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;
            self.seed_categories_in(&db_tx, user_id).await
        })?;
        tracing::info!(
            user = user_id,
            created = report.created,
            existing = report.existing,
            "default categories seeded"
        );
        Ok(report)
    }

    /// Creates the user and its default categories in one transaction.
    pub async fn register_user(&self, username: &str, password: &str) -> ResultEngine<SeedReport> {
        validate_username(username)?;
        if password.chars().count() < PASSWORD_MIN {
            return Err(EngineError::validation(
                "password",
                format!("must be at least {PASSWORD_MIN} characters"),
            ));
        }

        let report = with_tx!(self, |db_tx| {
            if users::Entity::find_by_id(username.to_string())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(username.to_string()));
            }

            let salt = Uuid::new_v4().simple().to_string();
            let user = users::ActiveModel {
                username: ActiveValue::Set(username.to_string()),
                password_hash: ActiveValue::Set(hash_password(&salt, password)),
                salt: ActiveValue::Set(salt),
                created_at: ActiveValue::Set(Utc::now()),
            };
            user.insert(&db_tx).await?;
            self.seed_categories_in(&db_tx, username).await
        })?;
        tracing::info!(
            user = username,
            categories = report.created,
            "user registered"
        );
        Ok(report)
    }

    /// Returns the user when `password` matches.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<Option<User>> {
        let Some(model) = users::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?
        else {
            return Ok(None);
        };
        if hash_password(&model.salt, password) != model.password_hash {
            return Ok(None);
        }
        Ok(Some(User::from(model)))
    }

    /// Removes the user with every category and transaction it owns.
    pub async fn delete_user(&self, username: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_user_exists(&db_tx, username).await?;
            let removed = transactions::Entity::delete_many()
                .filter(transactions::Column::UserId.eq(username))
                .exec(&db_tx)
                .await?;
            categories::Entity::delete_many()
                .filter(categories::Column::UserId.eq(username))
                .exec(&db_tx)
                .await?;
            users::Entity::delete_by_id(model.username)
                .exec(&db_tx)
                .await?;
            tracing::info!(
                user = username,
                transactions = removed.rows_affected,
                "user deleted"
            );
            Ok::<(), EngineError>(())
        })
    }
}
