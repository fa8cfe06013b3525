use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    Category, CategoryUpdate, EngineError, NewCategory, ResultEngine, categories, transactions,
    util::{MAX_NAME_LEN, normalize_color, normalize_required_text},
};

use super::{Engine, with_tx};

impl Engine {
    pub(super) async fn categories_of(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .order_by_asc(categories::Column::Name)
            .order_by_asc(categories::Column::Id)
            .all(db)
            .await?;
        models.into_iter().map(Category::try_from).collect()
    }

    pub(super) async fn insert_category(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        name: &str,
        color: &str,
    ) -> ResultEngine<Category> {
        let category = Category {
            id: Uuid::new_v4(),
            name: normalize_required_text(name, "name", MAX_NAME_LEN)?,
            color: normalize_color(color)?,
            user_id: user_id.to_string(),
        };
        categories::ActiveModel::from(&category).insert(db).await?;
        Ok(category)
    }

    /// Categories owned by `user_id`, ordered by name.
    pub async fn list_categories(&self, user_id: &str) -> ResultEngine<Vec<Category>> {
        with_tx!(self, |db_tx| self.categories_of(&db_tx, user_id).await)
    }

    pub async fn category(&self, user_id: &str, category_id: Uuid) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let model = self.require_category(&db_tx, user_id, category_id).await?;
            Category::try_from(model)
        })
    }

    pub async fn create_category(
        &self,
        user_id: &str,
        cmd: NewCategory,
    ) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;
            self.insert_category(&db_tx, user_id, &cmd.name, &cmd.color)
                .await
        })
    }

    /// Applies the fields present in `cmd`. An empty update is a no-op that
    /// still checks ownership.
    pub async fn update_category(
        &self,
        user_id: &str,
        category_id: Uuid,
        cmd: CategoryUpdate,
    ) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let mut model = self.require_category(&db_tx, user_id, category_id).await?;
            if !cmd.is_empty() {
                let mut active: categories::ActiveModel = model.into();
                if let Some(name) = cmd.name.as_deref() {
                    active.name =
                        ActiveValue::Set(normalize_required_text(name, "name", MAX_NAME_LEN)?);
                }
                if let Some(color) = cmd.color.as_deref() {
                    active.color = ActiveValue::Set(normalize_color(color)?);
                }
                model = active.update(&db_tx).await?;
            }
            Category::try_from(model)
        })
    }

    /// Deletes the category. Transactions that referenced it are kept with no
    /// category.
    pub async fn delete_category(&self, user_id: &str, category_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_category(&db_tx, user_id, category_id).await?;

            let detached = transactions::Entity::update_many()
                .col_expr(
                    transactions::Column::CategoryId,
                    Expr::value(Option::<String>::None),
                )
                .filter(transactions::Column::UserId.eq(user_id))
                .filter(transactions::Column::CategoryId.eq(model.id.clone()))
                .exec(&db_tx)
                .await?;
            tracing::debug!(
                category = %model.id,
                detached = detached.rows_affected,
                "deleting category"
            );

            categories::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;
            Ok::<(), EngineError>(())
        })
    }
}
