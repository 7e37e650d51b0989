//! Listing reviews

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A review left on one listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: u64,
    /// Author display name
    pub user: String,
    /// Expected to be 1-5, not enforced on the read path
    pub rating: i32,
    #[serde(default)]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}
