pub mod cards;

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "link-preview-card",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Every API route, without state or middleware. Shared by the binary and
/// the integration tests.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/cards", post(cards::create_card))
        .route(
            "/cards/:id",
            get(cards::get_card)
                .patch(cards::update_card)
                .delete(cards::delete_card),
        )
        .route("/cards/:id/search", post(cards::search_card))
        .route("/cards/:id/render", get(cards::render_card))
}
