//! Laptop listings
//!
//! A listing is one post scraped from a Telegram channel. Spec fields are
//! free text and any of them may be missing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::de;
use super::review::Review;

// ============================================================================
// Listing Structures
// ============================================================================

/// Image reference attached to a listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingImage {
    pub image: String,
}

/// Full listing as returned by the list and detail endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    /// Opaque identifier used in every listing URL
    pub uuid: String,
    pub title: String,
    #[serde(default)]
    pub storage: Option<String>,
    #[serde(default)]
    pub processor: Option<String>,
    #[serde(default)]
    pub graphics: Option<String>,
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default)]
    pub ram: Option<String>,
    #[serde(default, rename = "battrey")]
    pub battery: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    /// Free text such as "new" or "sold"
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Decimal string; absent means price on request
    #[serde(default, deserialize_with = "de::decimal_string")]
    pub price: Option<String>,
    pub channel_name: String,
    /// Back-link to the originating channel
    pub channel: String,
    pub posted_at: DateTime<Utc>,
    #[serde(default)]
    pub images: Vec<ListingImage>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default, deserialize_with = "de::decimal_string")]
    pub average_rating: Option<String>,
    #[serde(default, rename = "simmilar_items")]
    pub similar_items: Vec<SimilarItem>,
}

/// Embedded summary of a matched listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSummary {
    pub uuid: String,
    pub title: String,
    #[serde(default)]
    pub storage: Option<String>,
    #[serde(default)]
    pub processor: Option<String>,
    #[serde(default)]
    pub graphics: Option<String>,
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default)]
    pub ram: Option<String>,
    #[serde(default, rename = "battrey")]
    pub battery: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "de::decimal_string")]
    pub price: Option<String>,
    pub channel_name: String,
    pub channel: String,
    pub posted_at: DateTime<Utc>,
    #[serde(default)]
    pub images: Vec<ListingImage>,
}

/// Similarity match between two listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarItem {
    /// 0.0 (unrelated) to 1.0 (identical)
    pub score: f64,
    pub similar_laptop: ListingSummary,
}

impl Listing {
    /// Present spec fields in display order.
    pub fn specs(&self) -> Vec<(&'static str, &str)> {
        collect_specs([
            ("Processor", &self.processor),
            ("RAM", &self.ram),
            ("Storage", &self.storage),
            ("Graphics", &self.graphics),
            ("Display", &self.display),
            ("Battery", &self.battery),
            ("Color", &self.color),
        ])
    }

    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(|i| i.image.as_str())
    }
}

impl ListingSummary {
    pub fn specs(&self) -> Vec<(&'static str, &str)> {
        collect_specs([
            ("Processor", &self.processor),
            ("RAM", &self.ram),
            ("Storage", &self.storage),
            ("Graphics", &self.graphics),
            ("Display", &self.display),
            ("Battery", &self.battery),
            ("Color", &self.color),
        ])
    }
}

fn collect_specs<'a, const N: usize>(
    fields: [(&'static str, &'a Option<String>); N],
) -> Vec<(&'static str, &'a str)> {
    fields
        .into_iter()
        .filter_map(|(label, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (label, v))
        })
        .collect()
}
