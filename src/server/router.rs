//! Router builder for the API surface

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::companies::handlers as companies;
use crate::invoices::handlers as invoices;
use crate::server::AppState;

/// Build the full application router
///
/// Routes:
/// - GET /health, GET /healthz - Health checks
/// - GET/POST /companies - List and create companies
/// - GET/PUT/DELETE /companies/{code} - Single company operations
/// - GET/POST /invoices - List and create invoices
/// - GET/PUT/DELETE /invoices/{id} - Single invoice operations
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .route(
            "/companies",
            get(companies::list_companies).post(companies::create_company),
        )
        .route(
            "/companies/{code}",
            get(companies::get_company)
                .put(companies::update_company)
                .delete(companies::delete_company),
        )
        .route(
            "/invoices",
            get(invoices::list_invoices).post(invoices::create_invoice),
        )
        .route(
            "/invoices/{id}",
            get(invoices::get_invoice)
                .put(invoices::update_invoice)
                .delete(invoices::delete_invoice),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Health check endpoint handler
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "biztime"
    }))
}
