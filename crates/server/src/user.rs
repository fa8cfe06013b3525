//! Public registration endpoint.

use api_types::user::{Register, Registered};
use axum::{Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState};

/// Creates the account and seeds its default categories.
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<Register>,
) -> Result<(StatusCode, Json<Registered>), ServerError> {
    let report = state
        .engine
        .register_user(&payload.username, &payload.password)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(Registered {
            username: payload.username,
            categories_created: report.created,
        }),
    ))
}
