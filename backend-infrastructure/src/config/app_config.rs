use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::{DbConfig, RuntimeConfig};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
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

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3440".to_string(),
            api_token: None,
            clickhouse_url: "http://127.0.0.1:8123".to_string(),
            clickhouse_database: "embercall".to_string(),
            clickhouse_user: None,
            clickhouse_password: None,
            campaigns_path: "./campaigns.yaml".to_string(),
            push_webhook_url: None,
            email_webhook_url: None,
            sms_webhook_url: None,
            dispatch_timeout_seconds: 10,
            request_timeout_seconds: 15,
            max_body_bytes: 8 * 1024 * 1024,
            at_risk_scan_minutes: 30,
            campaign_sweep_minutes: 60,
            state_refresh_minutes: 5,
            at_risk_after_hours: 24,
            churn_after_days: 30,
            score_event_limit: 100,
            log_dir: None,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("EMBERCALL_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let base_dir = file_path.parent();
        if !file_path.exists() {
            warn!("config.toml not found, using defaults");
            let mut config = AppConfig::default();
            config.apply_env_overrides();
            config.resolve_paths(base_dir);
            config.normalize();
            config.validate()?;
            return Ok(config);
        }
        let content = fs::read_to_string(file_path).await?;
        let mut config: AppConfig = toml::from_str(&content)?;
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        normalize_opt(&mut self.api_token);
        normalize_opt(&mut self.clickhouse_user);
        normalize_opt(&mut self.clickhouse_password);
        normalize_opt(&mut self.push_webhook_url);
        normalize_opt(&mut self.email_webhook_url);
        normalize_opt(&mut self.sms_webhook_url);
        normalize_opt(&mut self.log_dir);
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.campaigns_path = resolve_path(base, &self.campaigns_path);
        if let Some(log_dir) = &self.log_dir {
            self.log_dir = Some(resolve_path(base, log_dir));
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.dispatch_timeout_seconds == 0 {
            return Err(anyhow!("dispatch_timeout_seconds must be greater than 0"));
        }
        if self.at_risk_scan_minutes == 0
            || self.campaign_sweep_minutes == 0
            || self.state_refresh_minutes == 0
        {
            return Err(anyhow!("sweep cadences must be greater than 0"));
        }
        if self.at_risk_after_hours == 0 {
            return Err(anyhow!("at_risk_after_hours must be greater than 0"));
        }
        if self.churn_after_days * 24 <= self.at_risk_after_hours {
            return Err(anyhow!(
                "churn_after_days must exceed the at-risk window"
            ));
        }
        if self.score_event_limit == 0 {
            return Err(anyhow!("score_event_limit must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            campaigns_path: self.campaigns_path.clone(),
            push_webhook_url: self.push_webhook_url.clone(),
            email_webhook_url: self.email_webhook_url.clone(),
            sms_webhook_url: self.sms_webhook_url.clone(),
            dispatch_timeout_seconds: self.dispatch_timeout_seconds,
            request_timeout_seconds: self.request_timeout_seconds,
            max_body_bytes: self.max_body_bytes,
            at_risk_scan_minutes: self.at_risk_scan_minutes,
            campaign_sweep_minutes: self.campaign_sweep_minutes,
            state_refresh_minutes: self.state_refresh_minutes,
            at_risk_after_hours: self.at_risk_after_hours,
            churn_after_days: self.churn_after_days,
            score_event_limit: self.score_event_limit,
            log_dir: self.log_dir.clone(),
        }
    }

    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            clickhouse_url: self.clickhouse_url.clone(),
            clickhouse_database: self.clickhouse_database.clone(),
            clickhouse_user: self.clickhouse_user.clone(),
            clickhouse_password: self.clickhouse_password.clone(),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("EMBERCALL_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("EMBERCALL_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Ok(value) = env::var("EMBERCALL_CLICKHOUSE_URL") {
            self.clickhouse_url = value;
        }
        if let Ok(value) = env::var("EMBERCALL_CLICKHOUSE_DATABASE") {
            self.clickhouse_database = value;
        }
        if let Ok(value) = env::var("EMBERCALL_CLICKHOUSE_USER") {
            self.clickhouse_user = Some(value);
        }
        if let Ok(value) = env::var("EMBERCALL_CLICKHOUSE_PASSWORD") {
            self.clickhouse_password = Some(value);
        }
        if let Ok(value) = env::var("EMBERCALL_CAMPAIGNS_PATH") {
            self.campaigns_path = value;
        }
        if let Ok(value) = env::var("EMBERCALL_PUSH_WEBHOOK_URL") {
            self.push_webhook_url = Some(value);
        }
        if let Ok(value) = env::var("EMBERCALL_EMAIL_WEBHOOK_URL") {
            self.email_webhook_url = Some(value);
        }
        if let Ok(value) = env::var("EMBERCALL_SMS_WEBHOOK_URL") {
            self.sms_webhook_url = Some(value);
        }
        if let Ok(value) = env::var("EMBERCALL_DISPATCH_TIMEOUT_SECONDS") {
            self.dispatch_timeout_seconds = value.parse().unwrap_or(self.dispatch_timeout_seconds);
        }
        if let Ok(value) = env::var("EMBERCALL_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Ok(value) = env::var("EMBERCALL_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("EMBERCALL_AT_RISK_SCAN_MINUTES") {
            self.at_risk_scan_minutes = value.parse().unwrap_or(self.at_risk_scan_minutes);
        }
        if let Ok(value) = env::var("EMBERCALL_CAMPAIGN_SWEEP_MINUTES") {
            self.campaign_sweep_minutes = value.parse().unwrap_or(self.campaign_sweep_minutes);
        }
        if let Ok(value) = env::var("EMBERCALL_STATE_REFRESH_MINUTES") {
            self.state_refresh_minutes = value.parse().unwrap_or(self.state_refresh_minutes);
        }
        if let Ok(value) = env::var("EMBERCALL_AT_RISK_AFTER_HOURS") {
            self.at_risk_after_hours = value.parse().unwrap_or(self.at_risk_after_hours);
        }
        if let Ok(value) = env::var("EMBERCALL_CHURN_AFTER_DAYS") {
            self.churn_after_days = value.parse().unwrap_or(self.churn_after_days);
        }
        if let Ok(value) = env::var("EMBERCALL_SCORE_EVENT_LIMIT") {
            self.score_event_limit = value.parse().unwrap_or(self.score_event_limit);
        }
        if let Ok(value) = env::var("EMBERCALL_LOG_DIR") {
            self.log_dir = Some(value);
        }
    }
}

fn normalize_opt(value: &mut Option<String>) {
    if let Some(inner) = value {
        if inner.trim().is_empty() {
            *value = None;
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}
