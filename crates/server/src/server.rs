use axum::{
    Router,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};

use std::sync::Arc;

use crate::{categories, reports, transactions, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"ledgerly\"")],
    )
        .into_response()
}

/// Resolves the caller from HTTP Basic credentials and stores the
/// [`engine::User`] in the request extensions.
async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(TypedHeader(credentials)) = auth_header else {
        return unauthorized();
    };
    if credentials.username().is_empty() || credentials.password().is_empty() {
        return unauthorized();
    }

    let user = match state
        .engine
        .authenticate(credentials.username(), credentials.password())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => return unauthorized(),
        Err(err) => {
            tracing::error!("authentication failed: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    request.extensions_mut().insert(user);
    next.run(request).await
}

fn router(state: ServerState) -> Router {
    let protected = Router::new()
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/categories/{id}",
            get(categories::get)
                .patch(categories::update)
                .delete(categories::delete),
        )
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route("/transactions/balance", get(reports::balance))
        .route(
            "/transactions/category_summary",
            get(reports::category_summary),
        )
        .route(
            "/transactions/balance_history",
            get(reports::balance_history),
        )
        .route("/transactions/export_csv", get(reports::export_csv))
        .route("/transactions/export_excel", get(reports::export_excel))
        .route(
            "/transactions/{id}",
            get(transactions::get)
                .patch(transactions::update)
                .delete(transactions::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .route("/register", post(user::register))
        .merge(protected)
        .with_state(state)
}

/// The full HTTP surface over `engine`.
pub fn app(engine: Arc<Engine>) -> Router {
    router(ServerState { engine })
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(Arc::new(engine))).await
}
