use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::validation::{validate_loose_email, validate_trimmed, validate_url},
    entities::blog_post::none_if_blank,
    utils::markdown::safe_markdown_to_html,
};

const MAX_NAME_LENGTH: u64 = 80;
const MAX_HEADLINE_LENGTH: u64 = 160;
const MAX_LOCATION_LENGTH: u64 = 80;

// ───── Database Models ───────────────────────────────────────────────

/// Single-row profile. The site has exactly one owner, so writes are
/// an upsert against a fixed row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: String,
    pub headline: Option<String>,
    pub bio_markdown: Option<String>,
    pub avatar_url: Option<String>,
    pub location: Option<String>,
    pub contact_email: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub website_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub full_name: String,
    pub headline: Option<String>,
    pub bio_markdown: Option<String>,
    pub bio_html: Option<String>,
    pub avatar_url: Option<String>,
    pub location: Option<String>,
    pub contact_email: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub website_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            full_name: profile.full_name,
            headline: profile.headline,
            bio_html: profile
                .bio_markdown
                .as_deref()
                .map(safe_markdown_to_html),
            bio_markdown: profile.bio_markdown,
            avatar_url: profile.avatar_url,
            location: profile.location,
            contact_email: profile.contact_email,
            github_url: profile.github_url,
            linkedin_url: profile.linkedin_url,
            website_url: profile.website_url,
            updated_at: profile.updated_at,
        }
    }
}

// ───── Input & Validation ───────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertProfileRequest {
    #[validate(
        length(min = 1, max = MAX_NAME_LENGTH),
        custom(function = validate_trimmed)
    )]
    pub full_name: String,

    #[validate(length(max = MAX_HEADLINE_LENGTH))]
    pub headline: Option<String>,

    pub bio_markdown: Option<String>,

    #[validate(custom(function = validate_url))]
    pub avatar_url: Option<String>,

    #[validate(length(max = MAX_LOCATION_LENGTH))]
    pub location: Option<String>,

    #[validate(custom(function = validate_loose_email))]
    pub contact_email: Option<String>,

    #[validate(custom(function = validate_url))]
    pub github_url: Option<String>,

    #[validate(custom(function = validate_url))]
    pub linkedin_url: Option<String>,

    #[validate(custom(function = validate_url))]
    pub website_url: Option<String>,
}

impl UpsertProfileRequest {
    /// Collapses blank optional fields to NULL before persistence.
    pub fn normalized(self) -> Self {
        Self {
            full_name: self.full_name,
            headline: none_if_blank(self.headline),
            bio_markdown: none_if_blank(self.bio_markdown),
            avatar_url: none_if_blank(self.avatar_url),
            location: none_if_blank(self.location),
            contact_email: none_if_blank(self.contact_email),
            github_url: none_if_blank(self.github_url),
            linkedin_url: none_if_blank(self.linkedin_url),
            website_url: none_if_blank(self.website_url),
        }
    }
}
