//! Literal placeholder substitution for campaign message templates.
//! Deliberately simple find/replace, not a templating engine.

use crate::entities::PlayerState;
use crate::utils::DAY_MS;

pub fn render_message(template: &str, player: &PlayerState, now_ms: i64) -> String {
    let days_away = (now_ms - player.last_activity_ms).max(0) / DAY_MS;
    let name = player
        .display_name
        .as_deref()
        .unwrap_or(player.user_id.as_str());
    template
        .replace("{playerName}", name)
        .replace("{daysAway}", &days_away.to_string())
        .replace("{lastScore}", &player.last_score.to_string())
        .replace("{level}", &player.level.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_all_placeholders() {
        let mut player = PlayerState::new("p1", 0);
        player.display_name = Some("Riley".to_string());
        player.last_activity_ms = 0;
        player.last_score = 900;
        player.level = 12;
        let now = 3 * DAY_MS;
        let out = render_message(
            "Hey {playerName}, {daysAway} days away! Beat {lastScore} on level {level}?",
            &player,
            now,
        );
        assert_eq!(out, "Hey Riley, 3 days away! Beat 900 on level 12?");
    }

    #[test]
    fn falls_back_to_user_id_without_display_name() {
        let player = PlayerState::new("p42", 0);
        assert_eq!(render_message("{playerName}", &player, 0), "p42");
    }

    #[test]
    fn unknown_placeholders_pass_through() {
        let player = PlayerState::new("p1", 0);
        assert_eq!(render_message("{weird}", &player, 0), "{weird}");
    }
}
