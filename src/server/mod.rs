pub mod routes;

use crate::state::AppState;
use axum::routing::get;
use std::sync::Arc;

pub fn router(state: Arc<AppState>) -> axum::Router {
    axum::Router::new()
        .route("/api/greeks", get(routes::get_greeks))
        .route("/api/sweep", get(routes::get_sweep))
        .route("/api/quote/{ticker}", get(routes::get_quote))
        .route("/api/counters", get(routes::get_counters))
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .with_state(state)
}
