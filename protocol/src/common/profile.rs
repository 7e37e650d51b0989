//! Account profile

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::de;

/// The authenticated user's profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: u64,
    pub email: String,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_verified: bool,
    pub date_joined: DateTime<Utc>,
    #[serde(default, deserialize_with = "de::text")]
    pub first_name: String,
    #[serde(default, deserialize_with = "de::text")]
    pub last_name: String,
    #[serde(default, deserialize_with = "de::text")]
    pub phone_number: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub bio: String,
}

impl UserProfile {
    /// Full name, falling back to the email when both names are blank.
    pub fn display_name(&self) -> String {
        let name = [self.first_name.trim(), self.last_name.trim()]
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() {
            self.email.clone()
        } else {
            name
        }
    }
}
