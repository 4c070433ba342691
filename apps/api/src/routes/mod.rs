pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::advisor::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Recommendations tab
        .route("/api/v1/recommendations", post(handlers::handle_recommend))
        .route(
            "/api/v1/recommendations/analysis",
            post(handlers::handle_analyze),
        )
        .route(
            "/api/v1/recommendations/savings",
            post(handlers::handle_estimate_savings),
        )
        .route("/api/v1/advice", post(handlers::handle_advise))
        // Appliance Suggestions tab
        .route(
            "/api/v1/appliances/suggestions",
            post(handlers::handle_suggest_appliances),
        )
        // Renewable Options tab
        .route(
            "/api/v1/renewables/options",
            post(handlers::handle_suggest_renewables),
        )
        // CO2 Savings tab
        .route("/api/v1/co2/savings", post(handlers::handle_manual_savings))
        .with_state(state)
}
