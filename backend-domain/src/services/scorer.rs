//! Churn-risk scoring over a player's recent activity window.
//!
//! Four weighted factors (recency, session frequency, spending, engagement)
//! summed and clipped to [0, 1]. A player with no recorded activity scores
//! the maximum 1.0; that is an explicit edge case, not an error.

use crate::entities::{ActivityEvent, ActivityEventType};
use crate::utils::{days_between, DAY_MS};

pub const RECENCY_WEIGHT: f64 = 0.4;
pub const FREQUENCY_WEIGHT: f64 = 0.3;
pub const SPENDING_WEIGHT: f64 = 0.2;
pub const ENGAGEMENT_WEIGHT: f64 = 0.1;

const RECENCY_HORIZON_DAYS: f64 = 7.0;
const SPENDING_CEILING: f64 = 100.0;
const EVENT_COUNT_CEILING: f64 = 100.0;
const SESSION_DURATION_CEILING_SECONDS: f64 = 1_800.0;

/// Per-factor contributions, already weighted.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskBreakdown {
    pub recency: f64,
    pub frequency: f64,
    pub spending: f64,
    pub engagement: f64,
    pub total: f64,
}

/// Score a window of events, newest first. `now_ms` anchors the recency
/// factor so evaluations are reproducible in tests.
pub fn score_events(events: &[ActivityEvent], now_ms: i64) -> f64 {
    score_breakdown(events, now_ms).total
}

pub fn score_breakdown(events: &[ActivityEvent], now_ms: i64) -> RiskBreakdown {
    if events.is_empty() {
        return RiskBreakdown {
            total: 1.0,
            ..RiskBreakdown::default()
        };
    }

    let newest_ms = events[0].timestamp_ms;
    let oldest_ms = events[events.len() - 1].timestamp_ms;

    let days_since_last = days_between(newest_ms, now_ms);
    let recency = clip01(days_since_last / RECENCY_HORIZON_DAYS) * RECENCY_WEIGHT;

    let session_starts = events
        .iter()
        .filter(|e| e.event_type == ActivityEventType::SessionStart)
        .count();
    let session_frequency = if session_starts < 2 {
        0.0
    } else {
        let span_days = (newest_ms - oldest_ms) as f64 / DAY_MS as f64;
        if span_days <= 0.0 {
            1.0
        } else {
            clip01(session_starts as f64 / span_days)
        }
    };
    let frequency = (1.0 - session_frequency) * FREQUENCY_WEIGHT;

    let total_spent: f64 = events
        .iter()
        .filter(|e| e.event_type == ActivityEventType::Purchase)
        .filter_map(|e| e.amount)
        .sum();
    let spending = (1.0 - clip01(total_spent / SPENDING_CEILING)) * SPENDING_WEIGHT;

    let game_events = events
        .iter()
        .filter(|e| e.event_type == ActivityEventType::GameEvent)
        .count();
    let event_count_score = clip01(game_events as f64 / EVENT_COUNT_CEILING);
    let duration_score = clip01(
        average_session_seconds(events).unwrap_or(0.0) / SESSION_DURATION_CEILING_SECONDS,
    );
    let engagement =
        (1.0 - (event_count_score + duration_score) / 2.0) * ENGAGEMENT_WEIGHT;

    let total = clip01(recency + frequency + spending + engagement);
    RiskBreakdown {
        recency,
        frequency,
        spending,
        engagement,
        total,
    }
}

/// Pairs consecutive start/end events in chronological order; a start with
/// no matching end is ignored.
fn average_session_seconds(events_newest_first: &[ActivityEvent]) -> Option<f64> {
    let mut pending_start: Option<i64> = None;
    let mut durations_ms: Vec<i64> = Vec::new();
    for event in events_newest_first.iter().rev() {
        match event.event_type {
            ActivityEventType::SessionStart => pending_start = Some(event.timestamp_ms),
            ActivityEventType::SessionEnd => {
                if let Some(start_ms) = pending_start.take() {
                    if event.timestamp_ms >= start_ms {
                        durations_ms.push(event.timestamp_ms - start_ms);
                    }
                }
            }
            _ => {}
        }
    }
    if durations_ms.is_empty() {
        return None;
    }
    let total: i64 = durations_ms.iter().sum();
    Some(total as f64 / durations_ms.len() as f64 / 1000.0)
}

fn clip01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
