// Outbound delivery channel ports
// Message delivery itself is an external collaborator; the core only
// depends on these send contracts

use async_trait::async_trait;

#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn send(
        &self,
        user_id: &str,
        message: &str,
        data: &serde_json::Value,
    ) -> anyhow::Result<()>;
}

#[async_trait]
pub trait EmailChannel: Send + Sync {
    async fn send(
        &self,
        email: &str,
        subject: &str,
        body: &str,
        data: &serde_json::Value,
    ) -> anyhow::Result<()>;
}

#[async_trait]
pub trait SmsChannel: Send + Sync {
    async fn send(&self, phone: &str, message: &str) -> anyhow::Result<()>;
}
