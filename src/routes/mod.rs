//! HTTP surface.

pub mod orders;

use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/orders/:client_id", get(orders::orders_for_client))
        .route("/orders/track/:order_id", get(orders::track_order))
        .route("/orders/place-order", post(orders::place_order))
        .route("/orders/order-payment", post(orders::order_payment))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy", "service": "storefront-orders" }))
}
