use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    domain::validation::{validate_loose_email, validate_trimmed},
    entities::blog_post::none_if_blank,
};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct ContactMessageInsert {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewContactMessageRequest {
    #[validate(
        length(min = 2, max = 100),
        custom(function = validate_trimmed)
    )]
    pub name: String,

    #[validate(custom(function = validate_loose_email))]
    pub email: String,

    #[validate(length(max = 100))]
    pub subject: Option<String>,

    #[validate(length(min = 5, max = 2000))]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ContactMessageReceivedResponse {
    pub id: Uuid,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ContactMessageListResponse {
    pub messages: Vec<ContactMessage>,
    pub total: i64,
    pub unread: i64,
}

impl TryFrom<NewContactMessageRequest> for ContactMessageInsert {
    type Error = ValidationErrors;

    fn try_from(value: NewContactMessageRequest) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(ContactMessageInsert {
            name: value.name,
            email: value.email,
            subject: none_if_blank(value.subject),
            message: value.message,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_subject_is_stored_as_null() {
        let request = NewContactMessageRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: Some("  ".to_string()),
            message: "Hello there".to_string(),
        };
        let insert = ContactMessageInsert::try_from(request).unwrap();
        assert_eq!(insert.subject, None);
    }

    #[test]
    fn short_message_is_rejected() {
        let request = NewContactMessageRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: None,
            message: "hi".to_string(),
        };
        assert!(ContactMessageInsert::try_from(request).is_err());
    }
}
