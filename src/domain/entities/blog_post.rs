use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    domain::slug::derive_slug,
    domain::validation::{
        dedupe_preserving_order, new_validation_error, validate_slug, validate_tags,
        validate_trimmed, validate_url,
    },
    entities::content_status::ContentStatus,
    entities::option_fields::{OptionField, PatchI32, PatchString, PatchUuid, PatchVec},
    utils::markdown::{safe_markdown_to_html, sanitize_markdown_content},
};

// ───── Constants ──────────────────────────────────────────────────────
const MIN_TITLE_LENGTH: u64 = 3;
const MAX_TITLE_LENGTH: u64 = 120;
const MIN_SLUG_LENGTH: u64 = 3;
const MAX_SLUG_LENGTH: u64 = 80;
const MAX_EXCERPT_LENGTH: u64 = 300;

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content_markdown: String,
    pub cover_image_url: Option<String>,
    pub status: ContentStatus,
    pub category_id: Option<Uuid>,
    pub tags: Vec<String>,
    pub display_order: i32,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Validate)]
pub struct BlogPostInsert {
    #[validate(
        length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH),
        custom(function = validate_trimmed)
    )]
    pub title: String,

    #[validate(
        length(min = MIN_SLUG_LENGTH, max = MAX_SLUG_LENGTH),
        custom(function = validate_slug)
    )]
    pub slug: String,

    #[validate(length(max = MAX_EXCERPT_LENGTH))]
    pub excerpt: Option<String>,

    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content_markdown: String,

    #[validate(custom(function = validate_url))]
    pub cover_image_url: Option<String>,

    pub status: ContentStatus,
    pub category_id: Option<Uuid>,

    #[validate(custom(function = validate_tags))]
    pub tags: Vec<String>,

    pub display_order: i32,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BlogPostListItem {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub cover_image_url: Option<String>,
    pub status: ContentStatus,
    pub category_id: Option<Uuid>,
    pub tags: Vec<String>,
    pub display_order: i32,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct BlogPostListResponse {
    pub posts: Vec<BlogPostListItem>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

#[derive(Debug, Serialize)]
pub struct BlogPostDetailResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content_markdown: String,
    pub content_html: String,
    pub cover_image_url: Option<String>,
    pub status: ContentStatus,
    pub category_id: Option<Uuid>,
    pub tags: Vec<String>,
    pub display_order: i32,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct BlogPostCreatedResponse {
    pub id: Uuid,
    pub slug: String,
    pub preview_url: String,
    pub admin_url: String,
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NewBlogPostRequest {
    #[validate(
        length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH),
        custom(function = validate_trimmed)
    )]
    pub title: String,

    #[validate(
        length(min = MIN_SLUG_LENGTH, max = MAX_SLUG_LENGTH),
        custom(function = validate_slug)
    )]
    pub slug: Option<String>,

    #[validate(length(max = MAX_EXCERPT_LENGTH))]
    pub excerpt: Option<String>,

    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content_markdown: String,

    #[validate(custom(function = validate_url))]
    pub cover_image_url: Option<String>,

    #[serde(default)]
    pub status: ContentStatus,

    pub category_id: Option<Uuid>,

    #[serde(default)]
    #[validate(custom(function = validate_tags))]
    pub tags: Vec<String>,

    #[serde(default)]
    pub display_order: i32,
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default)]
pub struct UpdateBlogPostRequest {
    #[validate(
        length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH),
        custom(function = validate_title_field)
    )]
    pub title: PatchString,

    #[validate(
        length(min = MIN_SLUG_LENGTH, max = MAX_SLUG_LENGTH),
        custom(function = validate_slug_field)
    )]
    pub slug: PatchString,

    #[validate(length(max = MAX_EXCERPT_LENGTH))]
    pub excerpt: PatchString,

    #[validate(length(min = 1))]
    pub content_markdown: PatchString,

    #[validate(custom(function = validate_url_field))]
    pub cover_image_url: PatchString,

    pub status: OptionField<ContentStatus>,
    pub category_id: PatchUuid,

    #[validate(custom(function = validate_tags_field))]
    pub tags: PatchVec<String>,

    pub display_order: PatchI32,
}

// ───── Validation Helpers ───────────────────────────────────────────

pub fn validate_title_field(value: &PatchString) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(title) = value {
        validate_trimmed(title)?;
    }
    Ok(())
}

pub fn validate_slug_field(value: &PatchString) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(slug) = value {
        validate_slug(slug)?;
    }
    Ok(())
}

pub fn validate_url_field(value: &PatchString) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(url) = value {
        validate_url(url)?;
    }
    Ok(())
}

pub fn validate_tags_field(value: &PatchVec<String>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(tags) = value {
        validate_tags(tags)?;
    }
    Ok(())
}

// ───── Conversions ──────────────────────────────────────────────────

impl TryFrom<NewBlogPostRequest> for BlogPostInsert {
    type Error = ValidationErrors;

    fn try_from(value: NewBlogPostRequest) -> Result<Self, Self::Error> {
        value.validate()?;
        let sanitized_content = sanitize_markdown_content(&value.content_markdown);

        // Generate slug from the title when not provided.
        let slug = match value.slug {
            Some(s) => s,
            None => {
                let generated = derive_slug(&value.title);
                if generated.len() < MIN_SLUG_LENGTH as usize {
                    return Err({
                        let mut errors = ValidationErrors::new();
                        errors.add("slug", new_validation_error("slug_too_short", "Generated slug is too short; please provide a custom slug"));
                        errors
                    });
                }
                generated
            }
        };

        let now = Utc::now();
        let insert = BlogPostInsert {
            title: value.title,
            slug,
            excerpt: none_if_blank(value.excerpt),
            content_markdown: sanitized_content,
            cover_image_url: none_if_blank(value.cover_image_url),
            status: value.status,
            category_id: value.category_id,
            tags: dedupe_preserving_order(value.tags),
            display_order: value.display_order,
            published_at: value.status.is_published().then_some(now),
            created_at: now,
            updated_at: now,
        };

        insert.validate()?;
        Ok(insert)
    }
}

/// Empty optional strings are persisted as NULL, never as "".
pub fn none_if_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl BlogPost {
    pub fn to_list_item(&self) -> BlogPostListItem {
        BlogPostListItem {
            id: self.id,
            title: self.title.clone(),
            slug: self.slug.clone(),
            excerpt: self.excerpt.clone(),
            cover_image_url: self.cover_image_url.clone(),
            status: self.status,
            category_id: self.category_id,
            tags: self.tags.clone(),
            display_order: self.display_order,
            published_at: self.published_at,
            updated_at: self.updated_at,
        }
    }

    pub fn to_detail_response(&self) -> BlogPostDetailResponse {
        BlogPostDetailResponse {
            id: self.id,
            title: self.title.clone(),
            slug: self.slug.clone(),
            excerpt: self.excerpt.clone(),
            content_markdown: self.content_markdown.clone(),
            content_html: safe_markdown_to_html(&self.content_markdown),
            cover_image_url: self.cover_image_url.clone(),
            status: self.status,
            category_id: self.category_id,
            tags: self.tags.clone(),
            display_order: self.display_order,
            published_at: self.published_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_request(title: &str) -> NewBlogPostRequest {
        NewBlogPostRequest {
            title: title.to_string(),
            slug: None,
            excerpt: Some("A short excerpt".to_string()),
            content_markdown: "# Hello".to_string(),
            cover_image_url: None,
            status: ContentStatus::Draft,
            category_id: None,
            tags: vec!["rust".to_string(), "web".to_string(), "rust".to_string()],
            display_order: 0,
        }
    }

    #[test]
    fn insert_derives_slug_and_dedupes_tags() {
        let insert = BlogPostInsert::try_from(new_request("Shipping a CMS")).unwrap();
        assert_eq!(insert.slug, "shipping-a-cms");
        assert_eq!(insert.tags, vec!["rust", "web"]);
        assert!(insert.published_at.is_none());
    }

    #[test]
    fn publishing_on_create_sets_published_at() {
        let mut request = new_request("Launched");
        request.status = ContentStatus::Published;
        let insert = BlogPostInsert::try_from(request).unwrap();
        assert!(insert.published_at.is_some());
    }

    #[test]
    fn blank_optional_strings_become_none() {
        let mut request = new_request("Blanks");
        request.excerpt = Some("   ".to_string());
        let insert = BlogPostInsert::try_from(request).unwrap();
        assert_eq!(insert.excerpt, None);
    }

    #[test]
    fn untrimmed_title_is_rejected() {
        let request = new_request("  padded  ");
        assert!(BlogPostInsert::try_from(request).is_err());
    }

    #[test]
    fn update_patch_distinguishes_absent_from_null() {
        let patch: UpdateBlogPostRequest =
            serde_json::from_str(r#"{"excerpt": null, "display_order": 5}"#).unwrap();
        assert!(patch.title.is_unchanged());
        assert!(patch.excerpt.is_set_to_null());
        assert_eq!(patch.display_order, OptionField::SetToValue(5));
        assert!(patch.validate().is_ok());
    }
}
