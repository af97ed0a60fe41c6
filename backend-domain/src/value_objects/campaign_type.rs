// Campaign action type
// A tagged enum so every dispatch site switches exhaustively

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignType {
    Push,
    Email,
    Sms,
    InGameOffer,
    ComebackBonus,
}

impl CampaignType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignType::Push => "push",
            CampaignType::Email => "email",
            CampaignType::Sms => "sms",
            CampaignType::InGameOffer => "in_game_offer",
            CampaignType::ComebackBonus => "comeback_bonus",
        }
    }

    /// Message-bearing types require a non-empty template at creation time.
    pub fn requires_message(&self) -> bool {
        matches!(
            self,
            CampaignType::Push | CampaignType::Email | CampaignType::Sms
        )
    }
}

impl From<&str> for CampaignType {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "email" => CampaignType::Email,
            "sms" => CampaignType::Sms,
            "in_game_offer" => CampaignType::InGameOffer,
            "comeback_bonus" => CampaignType::ComebackBonus,
            _ => CampaignType::Push,
        }
    }
}
