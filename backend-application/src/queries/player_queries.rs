use tracing::warn;

use backend_domain::services::matches_targeting;
use backend_domain::utils::current_millis;
use backend_domain::{CampaignStatus, PlayerRetentionReport, PlayerRewards, RiskLevel};

use crate::queries::metrics_queries::compute_metrics;
use crate::{AppError, AppState};

pub async fn player_retention_data(
    state: &AppState,
    user_id: &str,
) -> Result<PlayerRetentionReport, AppError> {
    let player = state
        .player_repo
        .fetch_state(user_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or(AppError::NotFound)?;

    let players = state
        .player_repo
        .fetch_all()
        .await
        .map_err(AppError::Internal)?;
    let metrics = compute_metrics(&players, current_millis());

    let eligible_campaigns = state
        .campaign_repo
        .fetch_all()
        .await
        .map_err(AppError::Internal)?
        .into_iter()
        .filter(|c| {
            c.status == CampaignStatus::Active
                && c.risk_level == player.risk_level
                && matches_targeting(c, &player)
        })
        .collect();

    let recommendations = recommendations_for(player.risk_level);

    Ok(PlayerRetentionReport {
        player,
        metrics,
        recommendations,
        eligible_campaigns,
    })
}

/// Transient rewards currently live in the real-time cache. A cache miss
/// and an unreachable cache look the same to the caller; both are a `None`.
pub async fn player_rewards(state: &AppState, user_id: &str) -> PlayerRewards {
    let offer = cache_lookup(state, &format!("offer:{}", user_id)).await;
    let bonus = cache_lookup(state, &format!("bonus:{}", user_id)).await;
    PlayerRewards { offer, bonus }
}

async fn cache_lookup(state: &AppState, key: &str) -> Option<serde_json::Value> {
    match state.cache.get(key).await {
        Ok(value) => value,
        Err(err) => {
            warn!("cache read failed for {}: {}", key, err);
            None
        }
    }
}

/// Fixed playbook per risk tier, surfaced to the operations dashboard.
pub fn recommendations_for(level: RiskLevel) -> Vec<String> {
    let items: &[&str] = match level {
        RiskLevel::High => &[
            "Send immediate re-engagement offer",
            "Grant comeback bonus",
            "Send push notification reminder",
        ],
        RiskLevel::Medium => &[
            "Suggest new engagement content",
            "Offer limited-time discount",
            "Invite to social challenge",
        ],
        RiskLevel::Low => &[
            "Maintain current engagement",
            "Highlight premium features",
            "Set achievement goals",
        ],
    };
    items.iter().map(ToString::to_string).collect()
}
