use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::validation::{validate_loose_email, validate_trimmed};

const MAX_AUTHOR_NAME_LENGTH: u64 = 80;
const MAX_COMMENT_LENGTH: u64 = 2000;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_name: String,
    pub author_email: String,
    pub body: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewCommentRequest {
    #[validate(
        length(min = 1, max = MAX_AUTHOR_NAME_LENGTH),
        custom(function = validate_trimmed)
    )]
    pub author_name: String,

    #[validate(custom(function = validate_loose_email))]
    pub author_email: String,

    #[validate(length(min = 1, max = MAX_COMMENT_LENGTH, message = "Comment cannot be empty"))]
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct ModerateCommentRequest {
    pub is_approved: bool,
}

#[derive(Debug, Serialize)]
pub struct CommentListResponse {
    pub comments: Vec<Comment>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loose_email_accepts_plus_addressing() {
        let request = NewCommentRequest {
            author_name: "Ada".to_string(),
            author_email: "ada+blog@example.co.uk".to_string(),
            body: "Nice write-up".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn email_without_domain_dot_is_rejected() {
        let request = NewCommentRequest {
            author_name: "Ada".to_string(),
            author_email: "ada@localhost".to_string(),
            body: "Nice write-up".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
