use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use backend_application::AppState;
use backend_domain::{ActionQuery, HealthStatus, RetentionAction};

use crate::error::HttpError;
use crate::middleware::authorize;

const DEFAULT_ACTION_LIMIT: usize = 100;

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

pub async fn health_ready(State(state): State<AppState>) -> Result<Json<HealthStatus>, HttpError> {
    let database = state.activity_repo.ping().await.is_ok();
    if !database {
        return Err(HttpError::Internal("durable store unreachable".to_string()));
    }
    Ok(Json(HealthStatus {
        status: "ready".to_string(),
        database,
    }))
}

pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let body = state.metrics.render_prometheus();
    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; version=0.0.4"),
        )],
        body,
    )
}

pub async fn list_actions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ActionQuery>,
) -> Result<Json<Vec<RetentionAction>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let limit = query.limit.unwrap_or(DEFAULT_ACTION_LIMIT).clamp(1, 1_000);
    let actions = state
        .action_repo
        .recent_actions(limit)
        .await
        .map_err(|err| HttpError::Internal(err.to_string()))?;
    Ok(Json(actions))
}
