use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use backend_application::commands::campaign_commands;
use backend_application::AppState;
use backend_domain::{Campaign, CampaignDraft};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn create_campaign(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<CampaignDraft>,
) -> Result<(StatusCode, Json<Campaign>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let campaign = campaign_commands::create_campaign(&state, draft).await?;
    Ok((StatusCode::CREATED, Json(campaign)))
}

pub async fn list_campaigns(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Campaign>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let campaigns = campaign_commands::list_campaigns(&state).await?;
    Ok(Json(campaigns))
}

pub async fn deactivate_campaign(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    campaign_commands::deactivate_campaign(&state, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
