//! Aggregated views and downloads over the caller's transactions.

use api_types::report::{Balance, CategorySummary, DailyBalance};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use engine::{RawTransactionQuery, User, export_filename};
use serde::Deserialize;

use crate::{ServerError, server::ServerState};

const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Deserialize)]
pub struct CurrencyParam {
    currency: Option<String>,
}

pub async fn balance(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<RawTransactionQuery>,
    Query(param): Query<CurrencyParam>,
) -> Result<Json<Balance>, ServerError> {
    let filter = query.parse()?;
    let balance = state.engine.balance(&user.username, &filter).await?;
    let currency = param
        .currency
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
    Ok(Json(Balance {
        balance_minor: balance.cents(),
        currency,
    }))
}

pub async fn category_summary(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<RawTransactionQuery>,
) -> Result<Json<Vec<CategorySummary>>, ServerError> {
    let filter = query.parse()?;
    let summary = state
        .engine
        .category_summary(&user.username, &filter, Utc::now())
        .await?;
    Ok(Json(
        summary
            .into_iter()
            .map(|entry| CategorySummary {
                id: entry.id,
                name: entry.name,
                color: entry.color,
                amount_minor: entry.amount.cents(),
            })
            .collect(),
    ))
}

pub async fn balance_history(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<RawTransactionQuery>,
) -> Result<Json<Vec<DailyBalance>>, ServerError> {
    let filter = query.parse()?;
    let history = state
        .engine
        .balance_history(&user.username, &filter, Utc::now())
        .await?;
    Ok(Json(
        history
            .into_iter()
            .map(|day| DailyBalance {
                date: day.date,
                balance_minor: day.balance.cents(),
            })
            .collect(),
    ))
}

fn attachment(content_type: &'static str, extension: &str, body: Vec<u8>) -> Response {
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_filename(Utc::now(), extension)
    );
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

pub async fn export_csv(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<RawTransactionQuery>,
) -> Result<Response, ServerError> {
    let filter = query.parse()?;
    let body = state.engine.export_csv(&user.username, &filter).await?;
    Ok(attachment("text/csv", "csv", body))
}

pub async fn export_excel(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<RawTransactionQuery>,
) -> Result<Response, ServerError> {
    let filter = query.parse()?;
    let body = state.engine.export_xls(&user.username, &filter).await?;
    Ok(attachment("application/ms-excel", "xls", body))
}
