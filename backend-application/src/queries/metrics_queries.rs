use backend_domain::utils::current_millis;
use backend_domain::{PlayerState, PlayerStatus, RetentionMetrics};

use crate::{AppError, AppState};

const ACTIVE_WINDOW_MS: i64 = 24 * 3_600_000;

pub async fn retention_metrics(state: &AppState) -> Result<RetentionMetrics, AppError> {
    let players = state
        .player_repo
        .fetch_all()
        .await
        .map_err(AppError::Internal)?;
    Ok(compute_metrics(&players, current_millis()))
}

/// Cohort aggregation over the full player population. Rates are 0 for an
/// empty cohort rather than NaN.
pub fn compute_metrics(players: &[PlayerState], now_ms: i64) -> RetentionMetrics {
    let active_cutoff = now_ms - ACTIVE_WINDOW_MS;
    let total_players = players.len() as u64;
    let active_players = players
        .iter()
        .filter(|p| p.last_activity_ms >= active_cutoff)
        .count() as u64;
    let churned_players = players
        .iter()
        .filter(|p| p.status == PlayerStatus::Churned)
        .count() as u64;
    let at_risk_players = players
        .iter()
        .filter(|p| p.last_activity_ms < active_cutoff && p.status != PlayerStatus::Churned)
        .count() as u64;

    let (retention_rate, churn_rate) = if total_players == 0 {
        (0.0, 0.0)
    } else {
        (
            active_players as f64 / total_players as f64,
            churned_players as f64 / total_players as f64,
        )
    };

    RetentionMetrics {
        total_players,
        active_players,
        at_risk_players,
        churned_players,
        retention_rate,
        churn_rate,
    }
}
