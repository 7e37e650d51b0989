//! Telegram channels ("chats" on the wire)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::de;

/// A seller channel the listings are sourced from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub channel_id: i64,
    /// Back-link to this channel's listings collection
    pub chat_posts: String,
    #[serde(default)]
    pub username: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub member_count: Option<u64>,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_verified: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_private: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub profile_photo: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl Channel {
    /// `@handle` when the channel has a public username.
    pub fn handle(&self) -> Option<String> {
        self.username
            .as_deref()
            .filter(|u| !u.is_empty())
            .map(|u| format!("@{}", u.trim_start_matches('@')))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_flags_default_to_false() {
        let channel: Channel = serde_json::from_value(json!({
            "channel_id": -1001234,
            "chat_posts": "https://example.test/api/chat/-1001234",
            "username": "laptops_et",
            "title": "Laptops ET",
            "is_verified": true,
            "is_private": null,
            "created_at": "2023-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z",
            "profile_photo": "https://cdn.test/p.jpg"
        }))
        .unwrap();

        assert!(channel.is_verified);
        assert!(!channel.is_private);
        assert!(!channel.is_active);
        assert_eq!(channel.handle().as_deref(), Some("@laptops_et"));
    }
}
