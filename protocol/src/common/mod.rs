pub mod channel;
pub mod listing;
pub mod page;
pub mod profile;
pub mod review;

pub use channel::*;
pub use listing::*;
pub use page::*;
pub use profile::*;
pub use review::*;

/// Lenient decoders for fields the backend is loose about
pub(crate) mod de {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Decimal {
        Text(String),
        Int(i64),
        Float(f64),
    }

    /// Decimal fields arrive as strings, but numbers and `null` are tolerated.
    pub fn decimal_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Decimal>::deserialize(deserializer)? {
            Some(Decimal::Text(s)) => Some(s),
            Some(Decimal::Int(n)) => Some(n.to_string()),
            Some(Decimal::Float(n)) => Some(n.to_string()),
            None => None,
        })
    }

    /// `null` text reads as an empty string.
    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// `null` booleans read as `false`.
    pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
    }
}
