//! Transactions API endpoints

use api_types::transaction::{TransactionNew, TransactionUpdate, TransactionView};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{Money, NewTransaction, RawTransactionQuery, Transaction, User};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn view(tx: Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        title: tx.title,
        description: tx.description,
        amount_minor: tx.amount.cents(),
        category_id: tx.category_id,
        created_at: tx.created_at,
    }
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<RawTransactionQuery>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let filter = query.parse()?;
    let transactions = state
        .engine
        .list_transactions(&user.username, &filter)
        .await?;
    Ok(Json(transactions.into_iter().map(view).collect()))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let cmd = NewTransaction {
        title: payload.title,
        description: payload.description,
        amount: Money::new(payload.amount_minor),
        category_id: payload.category_id,
    };
    let tx = state
        .engine
        .create_transaction(&user.username, cmd, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(view(tx))))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state.engine.transaction(&user.username, id).await?;
    Ok(Json(view(tx)))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let cmd = engine::TransactionUpdate {
        title: payload.title,
        description: payload.description,
        amount: payload.amount_minor.map(Money::new),
        category_id: payload.category_id,
    };
    let tx = state
        .engine
        .update_transaction(&user.username, id, cmd)
        .await?;
    Ok(Json(view(tx)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
