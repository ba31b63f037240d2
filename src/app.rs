use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/home", get(handlers::home))
        .route("/api/cafeterias/:cafeteria", get(handlers::detail))
        .route("/api/cafeterias/:cafeteria/week", get(handlers::week))
        .route("/api/cafeterias/:cafeteria/save-day", post(handlers::save_day))
        .route(
            "/api/cafeterias/:cafeteria/products/:product/pointer",
            post(handlers::pointer),
        )
        .route("/api/orders/:date/:cafeteria/:product", get(handlers::get_quantity))
        .route("/api/orders/delta", post(handlers::apply_delta))
        .route("/api/orders/reset", post(handlers::reset_product))
        .with_state(state)
}
