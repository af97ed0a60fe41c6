use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;

use backend_application::queries::{metrics_queries, player_queries};
use backend_application::AppState;
use backend_domain::{PlayerRetentionReport, PlayerRewards, RetentionMetrics};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn get_retention_metrics(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RetentionMetrics>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let metrics = metrics_queries::retention_metrics(&state).await?;
    Ok(Json(metrics))
}

pub async fn get_player_retention(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> Result<Json<PlayerRetentionReport>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let report = player_queries::player_retention_data(&state, &user_id).await?;
    Ok(Json(report))
}

pub async fn get_player_rewards(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> Result<Json<PlayerRewards>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let rewards = player_queries::player_rewards(&state, &user_id).await;
    Ok(Json(rewards))
}
