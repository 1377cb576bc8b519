use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{ClientError, Result};
use crate::validation::{require_non_blank, validate_rating};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackBook {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
}

/// One user's rating and review of one book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: i64,
    pub rating: u8,
    pub comment: String,
    pub book_id: i64,
    pub user_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<FeedbackUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book: Option<FeedbackBook>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedback {
    pub rating: u8,
    pub comment: String,
    pub book_id: i64,
}

impl CreateFeedback {
    pub fn validate(&self) -> Result<()> {
        validate_rating(self.rating)?;
        require_non_blank("Comment", &self.comment)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeedback {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl UpdateFeedback {
    pub fn validate(&self) -> Result<()> {
        if self.rating.is_none() && self.comment.is_none() {
            return Err(ClientError::invalid_input("Nothing to update"));
        }
        if let Some(rating) = self.rating {
            validate_rating(rating)?;
        }
        if let Some(comment) = &self.comment {
            require_non_blank("Comment", comment)?;
        }
        Ok(())
    }
}

/// Admin edit of a review, sent to the moderation endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerateFeedback {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ModerateFeedback {
    pub fn validate(&self) -> Result<()> {
        UpdateFeedback {
            rating: self.rating,
            comment: self.comment.clone(),
        }
        .validate()
    }
}

/// Aggregate rating figures for a single book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingStats {
    pub average_rating: f64,
    pub total_reviews: u64,
    #[serde(default)]
    pub rating_distribution: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_feedback_wire_shape() {
        let input = CreateFeedback {
            rating: 5,
            comment: "Great book!".into(),
            book_id: 1,
        };
        assert!(input.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            serde_json::json!({"rating": 5, "comment": "Great book!", "bookId": 1})
        );
    }

    #[test]
    fn test_feedback_validation_rejects_out_of_range_rating() {
        let input = CreateFeedback {
            rating: 9,
            comment: "Too good".into(),
            book_id: 1,
        };
        assert_eq!(
            input.validate().unwrap_err().message(),
            "Rating must be between 1 and 5"
        );
        assert!(UpdateFeedback::default().validate().is_err());
        assert!(
            ModerateFeedback {
                comment: Some(" ".into()),
                ..Default::default()
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn test_rating_stats_decodes() {
        let json = r#"{"averageRating":4.5,"totalReviews":2,"ratingDistribution":{"4":1,"5":1}}"#;
        let stats: RatingStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.total_reviews, 2);
        assert_eq!(stats.rating_distribution.get("5"), Some(&1));
    }
}
