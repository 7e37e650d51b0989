//! Profile update DTOs
//!
//! Profile updates travel as multipart form data so an avatar can ride
//! along with the text fields. This crate only describes the parts; the
//! HTTP layer builds the actual form.

/// Binary avatar upload
#[derive(Debug, Clone, PartialEq)]
pub struct Avatar {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// PATCH /auth/profile/ (multipart). Only fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<Avatar>,
}

impl ProfileUpdate {
    /// Form field name for the avatar part.
    pub const AVATAR_FIELD: &'static str = "profile_picture";

    /// Text parts in a stable order.
    pub fn text_fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("phone_number", &self.phone_number),
            ("bio", &self.bio),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.text_fields().is_empty() && self.profile_picture.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_set_fields_are_sent() {
        let update = ProfileUpdate {
            bio: Some("Selling refurbished ThinkPads".into()),
            first_name: Some("Sara".into()),
            ..Default::default()
        };
        assert_eq!(
            update.text_fields(),
            vec![("first_name", "Sara"), ("bio", "Selling refurbished ThinkPads")]
        );
        assert!(!update.is_empty());
        assert!(ProfileUpdate::default().is_empty());
    }
}
