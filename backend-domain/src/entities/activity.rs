// Activity event entity
// Append-only behavioral events, consumed to update player state

use clickhouse::Row;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::utils::{millis_to_utc, utc_to_millis};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityEventType {
    SessionStart,
    SessionEnd,
    Purchase,
    LevelComplete,
    GameEvent,
}

impl ActivityEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityEventType::SessionStart => "session_start",
            ActivityEventType::SessionEnd => "session_end",
            ActivityEventType::Purchase => "purchase",
            ActivityEventType::LevelComplete => "level_complete",
            ActivityEventType::GameEvent => "game_event",
        }
    }
}

impl From<&str> for ActivityEventType {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "session_start" => ActivityEventType::SessionStart,
            "session_end" => ActivityEventType::SessionEnd,
            "purchase" => ActivityEventType::Purchase,
            "level_complete" => ActivityEventType::LevelComplete,
            _ => ActivityEventType::GameEvent,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub user_id: String,
    pub event_type: ActivityEventType,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub score: Option<i64>,
    /// Epoch millis; 0 means "not supplied" and is filled with now at the boundary.
    #[serde(default)]
    pub timestamp_ms: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityEnvelope {
    #[serde(default)]
    pub schema_version: String,
    #[serde(default)]
    pub events: Vec<ActivityEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
pub struct ActivityEventRow {
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub event_time: OffsetDateTime,
    pub user_id: String,
    pub event_type: String,
    pub amount: Option<f64>,
    pub level: Option<u32>,
    pub score: Option<i64>,
}

impl From<&ActivityEvent> for ActivityEventRow {
    fn from(event: &ActivityEvent) -> Self {
        Self {
            event_time: millis_to_utc(event.timestamp_ms),
            user_id: event.user_id.clone(),
            event_type: event.event_type.as_str().to_string(),
            amount: event.amount,
            level: event.level,
            score: event.score,
        }
    }
}

impl From<ActivityEventRow> for ActivityEvent {
    fn from(row: ActivityEventRow) -> Self {
        Self {
            user_id: row.user_id,
            event_type: ActivityEventType::from(row.event_type.as_str()),
            amount: row.amount,
            level: row.level,
            score: row.score,
            timestamp_ms: utc_to_millis(row.event_time),
        }
    }
}
