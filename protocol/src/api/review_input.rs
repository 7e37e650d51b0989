//! Review API DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// New review for POST /laptops/{uuid}/reviews/
///
/// A blank comment is never serialized, so the backend sees the field as
/// absent rather than as an empty string.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ReviewInput {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub comment: Option<String>,
}

impl ReviewInput {
    pub fn new(rating: i32, comment: Option<&str>) -> Self {
        Self {
            rating,
            comment: comment.filter(|c| !c.trim().is_empty()).map(String::from),
        }
    }
}

/// Partial edit for PATCH /laptops/{uuid}/reviews/mine/
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct ReviewPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl From<ReviewInput> for ReviewPatch {
    fn from(input: ReviewInput) -> Self {
        Self {
            rating: Some(input.rating),
            comment: input.comment,
        }
    }
}

fn is_blank(comment: &Option<String>) -> bool {
    comment.as_deref().map_or(true, |c| c.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_comment_is_not_sent() {
        let body = serde_json::to_value(ReviewInput {
            rating: 4,
            comment: Some(String::new()),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "rating": 4 }));
    }

    #[test]
    fn test_comment_sent_verbatim() {
        let body = serde_json::to_value(ReviewInput::new(5, Some("great"))).unwrap();
        assert_eq!(body, serde_json::json!({ "rating": 5, "comment": "great" }));
    }

    #[test]
    fn test_rating_range() {
        assert!(ReviewInput::new(0, None).validate().is_err());
        assert!(ReviewInput::new(6, None).validate().is_err());
        assert!(ReviewInput::new(3, None).validate().is_ok());
        assert!(ReviewPatch::default().validate().is_ok());
    }
}
