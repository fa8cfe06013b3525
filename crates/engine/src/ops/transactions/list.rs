use sea_orm::{
    Condition, DatabaseTransaction, JoinType, Order, QueryFilter, QueryOrder, QuerySelect, Select,
    TransactionTrait, prelude::*, sea_query::LikeExpr,
};

use crate::{
    OrderKey, ResultEngine, Transaction, TransactionFilter, TransactionOrdering, TransactionType,
    categories, transactions,
};

use super::super::{Engine, with_tx};

/// Escapes LIKE wildcards so `search` is matched literally.
fn like_pattern(search: &str) -> String {
    let mut out = String::with_capacity(search.len() + 2);
    out.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

trait ApplyTxFilters: QueryFilter + Sized {
    fn apply_tx_filters(self, filter: &TransactionFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionFilter) -> Self {
        if let Some(category_id) = filter.category_id {
            self = self.filter(transactions::Column::CategoryId.eq(category_id.to_string()));
        }
        match filter.kind {
            Some(TransactionType::Income) => {
                self = self.filter(transactions::Column::AmountMinor.gt(0));
            }
            Some(TransactionType::Expense) => {
                self = self.filter(transactions::Column::AmountMinor.lt(0));
            }
            None => {}
        }

        if let Some(start) = filter.start {
            self = self.filter(transactions::Column::CreatedAt.gte(start));
        }
        if let Some(end) = filter.end {
            self = self.filter(transactions::Column::CreatedAt.lte(end));
        }
        if let Some(min) = filter.min_amount {
            self = self.filter(transactions::Column::AmountMinor.gte(min.cents()));
        }
        if let Some(max) = filter.max_amount {
            self = self.filter(transactions::Column::AmountMinor.lte(max.cents()));
        }

        // SQLite LIKE folds ASCII case only.
        if let Some(search) = filter.search.as_deref() {
            let pattern = like_pattern(search);
            self = self.filter(
                Condition::any()
                    .add(
                        transactions::Column::Title
                            .like(LikeExpr::new(pattern.clone()).escape('\\')),
                    )
                    .add(
                        transactions::Column::Description
                            .like(LikeExpr::new(pattern).escape('\\')),
                    ),
            );
        }

        self
    }
}

fn apply_ordering(
    query: Select<transactions::Entity>,
    ordering: TransactionOrdering,
) -> Select<transactions::Entity> {
    let order = if ordering.descending {
        Order::Desc
    } else {
        Order::Asc
    };
    let query = match ordering.key {
        OrderKey::CreatedAt => query.order_by(transactions::Column::CreatedAt, order.clone()),
        OrderKey::Amount => query
            .order_by(transactions::Column::AmountMinor, order.clone())
            .order_by_desc(transactions::Column::CreatedAt),
        OrderKey::Category => query
            .join(JoinType::LeftJoin, transactions::Relation::Category.def())
            .order_by(categories::Column::Name, order.clone())
            .order_by_desc(transactions::Column::CreatedAt),
    };
    query.order_by(transactions::Column::Id, order)
}

impl Engine {
    /// The owner's view: every transaction of `user_id` matching `filter`,
    /// in the filter's order.
    pub(in crate::ops) async fn view(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        filter.validate()?;
        tracing::debug!(user = user_id, ?filter, "loading transaction view");

        let query = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .apply_tx_filters(filter);
        let models = apply_ordering(query, filter.ordering).all(db).await?;
        models.into_iter().map(Transaction::try_from).collect()
    }

    /// Lists the transactions of `user_id` matching `filter`.
    pub async fn list_transactions(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        with_tx!(self, |db_tx| self.view(&db_tx, user_id, filter).await)
    }
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn search_wildcards_are_escaped() {
        assert_eq!(like_pattern("lunch"), "%lunch%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
