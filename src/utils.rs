//! Utility functions for the lobby service

use crate::types::Player;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new unique lobby ID
pub fn generate_lobby_id() -> Uuid {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Space-separated display names
pub fn join_names<'a>(players: impl IntoIterator<Item = &'a Player>) -> String {
    players
        .into_iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Space-separated mentions
pub fn join_mentions<'a>(players: impl IntoIterator<Item = &'a Player>) -> String {
    players
        .into_iter()
        .map(|p| p.mention.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Describe how long ago `then` was, relative to `now`
pub fn humanize_since(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 0 {
        return "in the future".to_string();
    }

    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if seconds < 45 {
        "just now".to_string()
    } else if seconds < 90 {
        "a minute ago".to_string()
    } else if minutes < 45 {
        format!("{} minutes ago", minutes.max(2))
    } else if minutes < 90 {
        "an hour ago".to_string()
    } else if hours < 22 {
        format!("{} hours ago", hours.max(2))
    } else if hours < 36 {
        "a day ago".to_string()
    } else if days < 30 {
        format!("{} days ago", days.max(2))
    } else if days < 45 {
        "a month ago".to_string()
    } else if days < 365 {
        format!("{} months ago", (days / 30).max(2))
    } else if days < 548 {
        "a year ago".to_string()
    } else {
        format!("{} years ago", (days / 365).max(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_generate_unique_ids() {
        let id1 = generate_lobby_id();
        let id2 = generate_lobby_id();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_join_names_and_mentions() {
        let players = vec![Player::human("1", "alice"), Player::human("2", "bob")];
        assert_eq!(join_names(&players), "alice bob");
        assert_eq!(join_mentions(&players), "<@1> <@2>");
        assert_eq!(join_names(&Vec::<Player>::new()), "");
    }

    #[test]
    fn test_humanize_since() {
        let now = current_timestamp();
        assert_eq!(humanize_since(now, now), "just now");
        assert_eq!(humanize_since(now - Duration::seconds(60), now), "a minute ago");
        assert_eq!(humanize_since(now - Duration::minutes(10), now), "10 minutes ago");
        assert_eq!(humanize_since(now - Duration::hours(5), now), "5 hours ago");
        assert_eq!(humanize_since(now - Duration::days(3), now), "3 days ago");
        assert_eq!(humanize_since(now + Duration::days(3), now), "in the future");
    }
}
