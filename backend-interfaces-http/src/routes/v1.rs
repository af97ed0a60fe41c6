use axum::Router;

use backend_application::AppState;

use crate::handlers::{activity_handlers, campaign_handlers, ops_handlers, query_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/activity/events",
            axum::routing::post(activity_handlers::ingest_events),
        )
        .route(
            "/v1/campaigns",
            axum::routing::post(campaign_handlers::create_campaign)
                .get(campaign_handlers::list_campaigns),
        )
        .route(
            "/v1/campaigns/:id/deactivate",
            axum::routing::post(campaign_handlers::deactivate_campaign),
        )
        .route(
            "/v1/metrics/retention",
            axum::routing::get(query_handlers::get_retention_metrics),
        )
        .route(
            "/v1/players/:user_id/retention",
            axum::routing::get(query_handlers::get_player_retention),
        )
        .route(
            "/v1/players/:user_id/rewards",
            axum::routing::get(query_handlers::get_player_rewards),
        )
        .route(
            "/v1/ops/actions",
            axum::routing::get(ops_handlers::list_actions),
        )
        .route(
            "/v1/ops/health/live",
            axum::routing::get(ops_handlers::health_live),
        )
        .route(
            "/v1/ops/health/ready",
            axum::routing::get(ops_handlers::health_ready),
        )
        .route(
            "/v1/ops/metrics/prometheus",
            axum::routing::get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
