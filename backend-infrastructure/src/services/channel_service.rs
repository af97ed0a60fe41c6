//! Webhook-backed delivery channel adapters.
//!
//! Each adapter POSTs a JSON payload to its configured gateway URL. An
//! unconfigured channel fails the send, which the dispatcher treats as an
//! ordinary dispatch failure.

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use backend_domain::ports::{EmailChannel, NotificationChannel, SmsChannel};
use backend_domain::RuntimeConfig;

fn build_client(timeout_seconds: u64) -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_seconds.max(3)))
        .build()?)
}

async fn post_json(client: &Client, url: &str, payload: serde_json::Value) -> Result<()> {
    client
        .post(url)
        .json(&payload)
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

pub struct WebhookPushChannel {
    client: Client,
    url: Option<String>,
}

impl WebhookPushChannel {
    pub fn from_config(config: &RuntimeConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.dispatch_timeout_seconds)?,
            url: config.push_webhook_url.clone(),
        })
    }
}

#[async_trait]
impl NotificationChannel for WebhookPushChannel {
    async fn send(&self, user_id: &str, message: &str, data: &serde_json::Value) -> Result<()> {
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| anyhow!("push webhook url not configured"))?;
        post_json(
            &self.client,
            url,
            json!({
                "userId": user_id,
                "message": message,
                "data": data,
            }),
        )
        .await
    }
}

pub struct WebhookEmailChannel {
    client: Client,
    url: Option<String>,
}

impl WebhookEmailChannel {
    pub fn from_config(config: &RuntimeConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.dispatch_timeout_seconds)?,
            url: config.email_webhook_url.clone(),
        })
    }
}

#[async_trait]
impl EmailChannel for WebhookEmailChannel {
    async fn send(
        &self,
        email: &str,
        subject: &str,
        body: &str,
        data: &serde_json::Value,
    ) -> Result<()> {
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| anyhow!("email webhook url not configured"))?;
        post_json(
            &self.client,
            url,
            json!({
                "email": email,
                "subject": subject,
                "body": body,
                "data": data,
            }),
        )
        .await
    }
}

pub struct WebhookSmsChannel {
    client: Client,
    url: Option<String>,
}

impl WebhookSmsChannel {
    pub fn from_config(config: &RuntimeConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.dispatch_timeout_seconds)?,
            url: config.sms_webhook_url.clone(),
        })
    }
}

#[async_trait]
impl SmsChannel for WebhookSmsChannel {
    async fn send(&self, phone: &str, message: &str) -> Result<()> {
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| anyhow!("sms webhook url not configured"))?;
        post_json(
            &self.client,
            url,
            json!({
                "phone": phone,
                "message": message,
            }),
        )
        .await
    }
}
