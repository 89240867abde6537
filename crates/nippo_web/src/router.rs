//! Route table and request logging.
//!
//! # Invariants
//! - `/reports` routes run behind principal resolution; `/health` does not.
//! - Every response is logged with method, path, status and duration.

use crate::auth::require_principal;
use crate::controller;
use crate::state::AppState;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use log::info;
use std::time::Instant;

/// Builds the application router.
///
/// Every `/reports` route sits behind principal resolution; `/health` does
/// not.
pub fn app_router(state: AppState) -> Router {
    let reports = Router::new()
        .route("/reports", get(controller::list))
        .route(
            "/reports/add",
            get(controller::new_form).post(controller::create),
        )
        .route("/reports/:id", get(controller::detail))
        .route("/reports/:id/", get(controller::detail))
        .route(
            "/reports/:id/update",
            get(controller::edit_form).post(controller::update),
        )
        .route("/reports/:id/delete", post(controller::delete))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_principal,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(reports)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(request).await;
    info!(
        "event=http_request module=web method={method} path={path} status={} duration_ms={}",
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}
