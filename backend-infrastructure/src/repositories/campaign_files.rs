// Campaign seed file loading
// An optional YAML list of drafts used to pre-populate an empty catalog

use std::path::Path;

use tokio::fs;
use tracing::warn;

use backend_domain::CampaignDraft;

/// Entries that fail to deserialize or validate are skipped with a warning
/// so one bad seed cannot block startup.
pub async fn load_campaign_seeds(path: &str) -> anyhow::Result<Vec<CampaignDraft>> {
    if path.trim().is_empty() || !Path::new(path).exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path).await?;
    let raw: Vec<serde_yaml::Value> = serde_yaml::from_str(&content)?;

    let mut drafts = Vec::new();
    for (index, value) in raw.into_iter().enumerate() {
        match serde_yaml::from_value::<CampaignDraft>(value) {
            Ok(draft) => {
                if let Err(err) = draft.validate() {
                    warn!("skipping campaign seed #{}: {}", index, err);
                    continue;
                }
                drafts.push(draft);
            }
            Err(err) => {
                warn!("skipping malformed campaign seed #{}: {}", index, err);
            }
        }
    }
    Ok(drafts)
}
