use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use tracing::{error, warn};

use backend_application::commands::activity_commands;
use backend_application::AppState;
use backend_domain::utils::current_millis;

use crate::error::HttpError;
use crate::middleware::{authorize, parse_events};

pub async fn ingest_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<StatusCode, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }

    let events = parse_events(&headers, &body).map_err(|err| {
        error!("failed to parse activity body: {}", err);
        HttpError::BadRequest(err.to_string())
    })?;

    let original_len = events.len();
    let now = current_millis();
    let events = events
        .into_iter()
        .filter(|event| !event.user_id.trim().is_empty())
        .map(|mut event| {
            if event.timestamp_ms <= 0 {
                event.timestamp_ms = now;
            }
            event
        })
        .collect::<Vec<_>>();

    if events.is_empty() {
        if original_len > 0 {
            warn!("dropped {} invalid events (missing user_id)", original_len);
        }
        return Ok(StatusCode::NO_CONTENT);
    }
    if events.len() != original_len {
        warn!(
            "dropped {} invalid events (missing user_id)",
            original_len - events.len()
        );
    }

    activity_commands::record_activity_events(&state, events).await?;
    Ok(StatusCode::OK)
}
