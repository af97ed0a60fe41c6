// Player state entity
// One row per player, lazily created on the first event

use clickhouse::Row;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::entities::{ActivityEvent, ActivityEventType};
use crate::utils::{millis_to_utc, utc_to_millis};
use crate::value_objects::{PlayerStatus, RiskLevel};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub user_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub last_activity_ms: i64,
    pub status: PlayerStatus,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub total_spent: f64,
    pub session_count: u64,
    pub level: u32,
    pub last_score: i64,
    pub segment: String,
    pub updated_at_ms: i64,
}

impl PlayerState {
    pub fn new(user_id: &str, now_ms: i64) -> Self {
        Self {
            user_id: user_id.to_string(),
            display_name: None,
            email: None,
            phone: None,
            last_activity_ms: 0,
            status: PlayerStatus::Active,
            risk_score: 0.0,
            risk_level: RiskLevel::Low,
            total_spent: 0.0,
            session_count: 0,
            level: 0,
            last_score: 0,
            segment: "general".to_string(),
            updated_at_ms: now_ms,
        }
    }

    /// Fold one event into the state. Counters always accumulate, but
    /// `last_activity` only advances for events at or after the stored value
    /// (idempotent ordering, not idempotent count).
    pub fn apply_event(&mut self, event: &ActivityEvent, now_ms: i64) {
        match event.event_type {
            ActivityEventType::SessionStart => {
                self.session_count += 1;
            }
            ActivityEventType::Purchase => {
                self.total_spent += event.amount.unwrap_or(0.0);
            }
            ActivityEventType::LevelComplete => {
                if let Some(level) = event.level {
                    self.level = level;
                }
                if let Some(score) = event.score {
                    self.last_score = score;
                }
            }
            ActivityEventType::SessionEnd | ActivityEventType::GameEvent => {}
        }
        if event.timestamp_ms >= self.last_activity_ms {
            self.last_activity_ms = event.timestamp_ms;
            // Fresh activity is the only path back from churned.
            self.status = PlayerStatus::Active;
        }
        self.updated_at_ms = now_ms;
    }

    pub fn set_risk(&mut self, score: f64, now_ms: i64) {
        self.risk_score = score;
        self.risk_level = RiskLevel::classify(score);
        self.updated_at_ms = now_ms;
    }

    pub fn mark_churned(&mut self, now_ms: i64) {
        self.status = PlayerStatus::Churned;
        self.updated_at_ms = now_ms;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
pub struct PlayerStateRow {
    pub user_id: String,
    pub display_name: String,
    pub email: String,
    pub phone: String,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub last_activity: OffsetDateTime,
    pub status: String,
    pub risk_score: f64,
    pub risk_level: String,
    pub total_spent: f64,
    pub session_count: u64,
    pub level: u32,
    pub last_score: i64,
    pub segment: String,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub updated_at: OffsetDateTime,
}

impl From<&PlayerState> for PlayerStateRow {
    fn from(state: &PlayerState) -> Self {
        Self {
            user_id: state.user_id.clone(),
            display_name: state.display_name.clone().unwrap_or_default(),
            email: state.email.clone().unwrap_or_default(),
            phone: state.phone.clone().unwrap_or_default(),
            last_activity: millis_to_utc(state.last_activity_ms),
            status: state.status.as_str().to_string(),
            risk_score: state.risk_score,
            risk_level: state.risk_level.as_str().to_string(),
            total_spent: state.total_spent,
            session_count: state.session_count,
            level: state.level,
            last_score: state.last_score,
            segment: state.segment.clone(),
            updated_at: millis_to_utc(state.updated_at_ms),
        }
    }
}

impl From<PlayerStateRow> for PlayerState {
    fn from(row: PlayerStateRow) -> Self {
        Self {
            user_id: row.user_id,
            display_name: none_if_empty(row.display_name),
            email: none_if_empty(row.email),
            phone: none_if_empty(row.phone),
            last_activity_ms: utc_to_millis(row.last_activity),
            status: PlayerStatus::from(row.status.as_str()),
            risk_score: row.risk_score,
            risk_level: RiskLevel::from(row.risk_level.as_str()),
            total_spent: row.total_spent,
            session_count: row.session_count,
            level: row.level,
            last_score: row.last_score,
            segment: row.segment,
            updated_at_ms: utc_to_millis(row.updated_at),
        }
    }
}

fn none_if_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(event_type: ActivityEventType, ts: i64) -> ActivityEvent {
        ActivityEvent {
            user_id: "p1".to_string(),
            event_type,
            amount: None,
            level: None,
            score: None,
            timestamp_ms: ts,
        }
    }

    #[test]
    fn last_activity_never_moves_backwards() {
        let mut state = PlayerState::new("p1", 1_000);
        state.apply_event(&event(ActivityEventType::GameEvent, 5_000), 1_000);
        assert_eq!(state.last_activity_ms, 5_000);
        state.apply_event(&event(ActivityEventType::GameEvent, 3_000), 1_100);
        assert_eq!(state.last_activity_ms, 5_000);
    }

    #[test]
    fn late_events_still_accumulate_counters() {
        let mut state = PlayerState::new("p1", 1_000);
        state.apply_event(&event(ActivityEventType::SessionStart, 5_000), 1_000);
        let mut late = event(ActivityEventType::Purchase, 2_000);
        late.amount = Some(4.99);
        state.apply_event(&late, 1_100);
        assert_eq!(state.session_count, 1);
        assert!((state.total_spent - 4.99).abs() < f64::EPSILON);
        assert_eq!(state.last_activity_ms, 5_000);
    }

    #[test]
    fn fresh_activity_reactivates_churned_player() {
        let mut state = PlayerState::new("p1", 1_000);
        state.apply_event(&event(ActivityEventType::SessionStart, 2_000), 1_000);
        state.mark_churned(3_000);
        assert_eq!(state.status, PlayerStatus::Churned);
        state.apply_event(&event(ActivityEventType::SessionStart, 4_000), 4_000);
        assert_eq!(state.status, PlayerStatus::Active);
    }

    #[test]
    fn level_complete_sets_level_and_score() {
        let mut state = PlayerState::new("p1", 0);
        let mut evt = event(ActivityEventType::LevelComplete, 100);
        evt.level = Some(7);
        evt.score = Some(4200);
        state.apply_event(&evt, 100);
        assert_eq!(state.level, 7);
        assert_eq!(state.last_score, 4200);
    }
}
