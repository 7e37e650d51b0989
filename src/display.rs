//! Display state derived from loosely typed listing fields
//!
//! The backend sends ratings and prices as decimal strings and a free-text
//! sale status. None of these ever fail to render: anything unreadable
//! becomes an explicit "unknown" state.

use std::fmt;

pub use laptophub_protocol::page_count;

/// Highest rating a listing can show
pub const MAX_RATING: f32 = 5.0;

/// Parse a decimal rating for display, clamped to `0..=5`.
///
/// `None` when the value is absent, blank or not a finite number.
pub fn rating_display(raw: Option<&str>) -> Option<f32> {
    let value: f32 = raw?.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(value.clamp(0.0, MAX_RATING))
}

/// Listing price as shown to a buyer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Price {
    /// Decimal string exactly as the backend sent it
    Amount(String),
    OnRequest,
}

impl Price {
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(amount) if !amount.is_empty() => Price::Amount(amount.to_string()),
            _ => Price::OnRequest,
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Amount(amount) => match group_thousands(amount) {
                Some(formatted) => write!(f, "{} ETB", formatted),
                None => write!(f, "{}", amount),
            },
            Price::OnRequest => write!(f, "Price on request"),
        }
    }
}

/// `62000.50` -> `62,000.5`; `None` when `raw` is not a number.
fn group_thousands(raw: &str) -> Option<String> {
    let value: f64 = raw.parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    let fixed = format!("{:.3}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::new();
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if value < 0.0 {
        grouped.insert(0, '-');
    }
    if !fraction.is_empty() {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    Some(grouped)
}

/// Sale status badge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaleState {
    New,
    Sold,
    /// Any other status, as sent
    Other(String),
    Unknown,
}

impl SaleState {
    /// Case-insensitive substring match. "sold" wins over "new".
    pub fn classify(status: Option<&str>) -> Self {
        let Some(status) = status.map(str::trim).filter(|s| !s.is_empty()) else {
            return SaleState::Unknown;
        };
        let lowered = status.to_lowercase();
        if lowered.contains("sold") {
            SaleState::Sold
        } else if lowered.contains("new") {
            SaleState::New
        } else {
            SaleState::Other(status.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SaleState::New => "New",
            SaleState::Sold => "Sold",
            SaleState::Other(status) => status,
            SaleState::Unknown => "Unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rating_display() {
        assert_eq!(rating_display(Some("4.50")), Some(4.5));
        assert_eq!(rating_display(Some("7")), Some(5.0));
        assert_eq!(rating_display(Some("-1")), Some(0.0));
        assert_eq!(rating_display(Some("abc")), None);
        assert_eq!(rating_display(Some("")), None);
        assert_eq!(rating_display(Some("NaN")), None);
        assert_eq!(rating_display(None), None);
    }

    #[test]
    fn test_price() {
        assert_eq!(
            Price::from_wire(Some("62000.00")),
            Price::Amount("62000.00".into())
        );
        assert_eq!(Price::from_wire(Some("  ")), Price::OnRequest);
        assert_eq!(Price::from_wire(None), Price::OnRequest);
        assert_eq!(Price::OnRequest.to_string(), "Price on request");
        assert_eq!(Price::from_wire(Some("62000.00")).to_string(), "62,000 ETB");
        assert_eq!(Price::from_wire(Some("1234567.5")).to_string(), "1,234,567.5 ETB");
        assert_eq!(Price::from_wire(Some("950")).to_string(), "950 ETB");
        assert_eq!(Price::from_wire(Some("call me")).to_string(), "call me");
    }

    #[test]
    fn test_sale_state() {
        assert_eq!(SaleState::classify(Some("Brand NEW")), SaleState::New);
        assert_eq!(SaleState::classify(Some("sold")), SaleState::Sold);
        assert_eq!(SaleState::classify(Some("new, now sold")), SaleState::Sold);
        assert_eq!(
            SaleState::classify(Some("Used")),
            SaleState::Other("Used".into())
        );
        assert_eq!(SaleState::classify(None), SaleState::Unknown);
        assert_eq!(SaleState::classify(Some(" ")), SaleState::Unknown);
    }

    #[test]
    fn test_page_count_reexport() {
        assert_eq!(page_count(0, 12), 1);
        assert_eq!(page_count(25, 12), 3);
    }

    proptest! {
        #[test]
        fn prop_rating_always_in_range(value in proptest::num::f32::ANY) {
            if let Some(rating) = rating_display(Some(&value.to_string())) {
                prop_assert!((0.0..=MAX_RATING).contains(&rating));
            }
        }

        #[test]
        fn prop_arbitrary_text_never_panics(raw in ".*") {
            let _ = rating_display(Some(&raw));
            let _ = SaleState::classify(Some(&raw));
        }
    }
}
