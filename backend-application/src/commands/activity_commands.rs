use std::collections::HashMap;

use tracing::warn;

use backend_domain::utils::current_millis;
use backend_domain::{ActivityEvent, PlayerState};

use crate::{AppError, AppState};

/// Append validated events and fold them into per-player state. Per-player
/// upsert failures are logged and skipped so one bad row cannot reject the
/// whole batch.
pub async fn record_activity_events(
    state: &AppState,
    events: Vec<ActivityEvent>,
) -> Result<usize, AppError> {
    if events.is_empty() {
        return Ok(0);
    }
    if let Err(err) = state.activity_repo.append_events(&events).await {
        state.metrics.record_activity_error();
        return Err(AppError::Internal(err));
    }

    for (user_id, user_events) in group_by_user(events.clone()) {
        if let Err(err) = apply_events_to_player(state, &user_id, &user_events, false).await {
            warn!("state upsert failed for player {}: {}", user_id, err);
        }
    }

    state.metrics.record_activity(events.len());
    Ok(events.len())
}

/// State-refresh sweep body: re-ingest the recent event window and apply
/// anything the inline path has not already folded in. Only events newer
/// than the stored `last_activity` are applied, so inline ingestion and
/// sweep catch-up never double-count.
pub async fn refresh_player_states(state: &AppState) {
    let now = current_millis();
    let since = now - state.config.state_refresh_minutes as i64 * 60_000;
    let events = match state.activity_repo.events_since(since).await {
        Ok(events) => events,
        Err(err) => {
            warn!("state refresh skipped, activity store unreachable: {}", err);
            return;
        }
    };

    for (user_id, user_events) in group_by_user(events) {
        if let Err(err) = apply_events_to_player(state, &user_id, &user_events, true).await {
            warn!("state refresh failed for player {}: {}", user_id, err);
        }
    }
}

fn group_by_user(events: Vec<ActivityEvent>) -> HashMap<String, Vec<ActivityEvent>> {
    let mut by_user: HashMap<String, Vec<ActivityEvent>> = HashMap::new();
    for event in events {
        by_user.entry(event.user_id.clone()).or_default().push(event);
    }
    for user_events in by_user.values_mut() {
        user_events.sort_by_key(|e| e.timestamp_ms);
    }
    by_user
}

async fn apply_events_to_player(
    state: &AppState,
    user_id: &str,
    events_chronological: &[ActivityEvent],
    only_newer: bool,
) -> Result<(), AppError> {
    let now = current_millis();
    let mut player = state
        .player_repo
        .fetch_state(user_id)
        .await
        .map_err(AppError::Internal)?
        .unwrap_or_else(|| PlayerState::new(user_id, now));

    let baseline = player.last_activity_ms;
    let mut touched = false;
    for event in events_chronological {
        if only_newer && event.timestamp_ms <= baseline {
            continue;
        }
        player.apply_event(event, now);
        touched = true;
    }
    if touched {
        state
            .player_repo
            .upsert_state(&player)
            .await
            .map_err(AppError::Internal)?;
    }
    Ok(())
}
