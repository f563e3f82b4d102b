//! API routes for quotemaster-cloud

mod extract;
pub mod health;
pub mod team;

use axum::Router;
use axum::routing::{get, post, put};
use http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the combined router
pub fn create_router(state: AppState, cors_allow_origin: Option<&str>) -> Router {
    let teams = Router::new()
        .route("/api/teams/{team_id}/matrix", get(team::get_matrix))
        .route(
            "/api/teams/{team_id}/quotations",
            get(team::list_quotations).post(team::create_quotation),
        )
        .route(
            "/api/teams/{team_id}/quotations/{quotation_id}",
            get(team::get_quotation),
        )
        .route(
            "/api/teams/{team_id}/quotations/{quotation_id}/negotiate",
            post(team::negotiate_quotation),
        )
        .route(
            "/api/teams/{team_id}/quotations/{quotation_id}/approve",
            post(team::approve_quotation),
        )
        .route(
            "/api/teams/{team_id}/quotations/{quotation_id}/reject",
            post(team::reject_quotation),
        )
        .route(
            "/api/teams/{team_id}/products/{product_id}/price-history",
            get(team::get_price_history),
        )
        .route("/api/teams/{team_id}/demands", put(team::upsert_demands))
        .route("/api/teams/{team_id}/audit", get(team::audit_log));

    let router = Router::new()
        .route("/health", get(health::health_check))
        .merge(teams)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    match cors_layer(cors_allow_origin) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

fn cors_layer(origin: Option<&str>) -> Option<CorsLayer> {
    let origin = origin?;
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return Some(layer.allow_origin(Any));
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => Some(layer.allow_origin(value)),
        Err(e) => {
            tracing::warn!(origin, error = %e, "Invalid CORS_ALLOW_ORIGIN, CORS disabled");
            None
        }
    }
}
