use async_trait::async_trait;

/// Short-TTL storage for transient offers/bonuses. Consistency with the
/// durable store is best-effort; readers must tolerate missing keys.
#[async_trait]
pub trait RealtimeCache: Send + Sync {
    async fn set_with_ttl(
        &self,
        key: &str,
        value: serde_json::Value,
        ttl_seconds: u64,
    ) -> anyhow::Result<()>;
    async fn get(&self, key: &str) -> anyhow::Result<Option<serde_json::Value>>;
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}
