// Runtime configuration carried through the application state

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub campaigns_path: String,
    pub push_webhook_url: Option<String>,
    pub email_webhook_url: Option<String>,
    pub sms_webhook_url: Option<String>,
    pub dispatch_timeout_seconds: u64,
    pub request_timeout_seconds: u64,
    pub max_body_bytes: u64,
    pub at_risk_scan_minutes: u64,
    pub campaign_sweep_minutes: u64,
    pub state_refresh_minutes: u64,
    pub at_risk_after_hours: u64,
    pub churn_after_days: u64,
    pub score_event_limit: usize,
    pub log_dir: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActionQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub database: bool,
}
