use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    domain::slug::derive_slug,
    domain::validation::{dedupe_preserving_order, validate_slug, validate_tags, validate_trimmed, validate_url},
    entities::blog_post::{none_if_blank, validate_slug_field, validate_url_field},
    entities::content_status::ContentStatus,
    entities::option_fields::{OptionField, PatchString, PatchVec},
    utils::markdown::{safe_markdown_to_html, sanitize_markdown_content},
};

const MIN_TITLE_LENGTH: u64 = 3;
const MAX_TITLE_LENGTH: u64 = 120;
const MIN_SLUG_LENGTH: u64 = 3;
const MAX_SLUG_LENGTH: u64 = 80;
const MAX_SUMMARY_LENGTH: u64 = 300;

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub content_markdown: String,
    pub technologies: Vec<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub status: ContentStatus,
    pub display_order: i32,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Gallery image attached to a project. `display_order` is dense per
/// project: always 0..n-1 with no gaps or duplicates.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProjectImage {
    pub id: Uuid,
    pub project_id: Uuid,
    pub media_id: Uuid,
    pub url: String,
    pub alt_text: String,
    pub caption: Option<String>,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ProjectInsert {
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub content_markdown: String,
    pub technologies: Vec<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub status: ContentStatus,
    pub display_order: i32,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ProjectListItem {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub technologies: Vec<String>,
    pub status: ContentStatus,
    pub display_order: i32,
    pub cover_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectListItem>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

#[derive(Debug, Serialize)]
pub struct ProjectDetailResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub content_markdown: String,
    pub content_html: String,
    pub technologies: Vec<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub status: ContentStatus,
    pub display_order: i32,
    pub images: Vec<ProjectImage>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct NewProjectRequest {
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

    #[validate(length(max = MAX_SUMMARY_LENGTH))]
    pub summary: Option<String>,

    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content_markdown: String,

    #[serde(default)]
    #[validate(custom(function = validate_tags))]
    pub technologies: Vec<String>,

    #[validate(custom(function = validate_url))]
    pub github_url: Option<String>,

    #[validate(custom(function = validate_url))]
    pub live_url: Option<String>,

    #[serde(default)]
    pub status: ContentStatus,

    #[serde(default)]
    pub display_order: i32,
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default)]
pub struct UpdateProjectRequest {
    #[validate(length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH))]
    pub title: PatchString,

    #[validate(
        length(min = MIN_SLUG_LENGTH, max = MAX_SLUG_LENGTH),
        custom(function = validate_slug_field)
    )]
    pub slug: PatchString,

    #[validate(length(max = MAX_SUMMARY_LENGTH))]
    pub summary: PatchString,

    #[validate(length(min = 1))]
    pub content_markdown: PatchString,

    #[validate(custom(function = validate_technologies_field))]
    pub technologies: PatchVec<String>,

    #[validate(custom(function = validate_url_field))]
    pub github_url: PatchString,

    #[validate(custom(function = validate_url_field))]
    pub live_url: PatchString,

    pub status: OptionField<ContentStatus>,
    pub display_order: OptionField<i32>,
}

fn validate_technologies_field(value: &PatchVec<String>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(technologies) = value {
        validate_tags(technologies)?;
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
pub struct AttachImageRequest {
    pub media_id: Uuid,

    /// Required for accessibility.
    #[validate(length(min = 1, max = 125), custom(function = validate_trimmed))]
    pub alt_text: String,

    #[validate(length(max = 200))]
    pub caption: Option<String>,
}

/// Full desired ordering for a project's gallery. Must list every
/// current image exactly once.
#[derive(Debug, Deserialize)]
pub struct ReorderImagesRequest {
    pub image_ids: Vec<Uuid>,
}

/// Drag-and-drop move of a single gallery image, with the optional index
/// of the image the editor currently has focused.
#[derive(Debug, Deserialize)]
pub struct MoveImageRequest {
    pub from: usize,
    pub to: usize,
    pub focused_index: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct GalleryResponse {
    pub images: Vec<ProjectImage>,
    pub focused_index: Option<usize>,
}

// ───── Conversions ──────────────────────────────────────────────────

impl TryFrom<NewProjectRequest> for ProjectInsert {
    type Error = ValidationErrors;

    fn try_from(value: NewProjectRequest) -> Result<Self, Self::Error> {
        value.validate()?;
        let now = Utc::now();

        Ok(ProjectInsert {
            slug: value.slug.unwrap_or_else(|| derive_slug(&value.title)),
            title: value.title,
            summary: none_if_blank(value.summary),
            content_markdown: sanitize_markdown_content(&value.content_markdown),
            technologies: dedupe_preserving_order(value.technologies),
            github_url: none_if_blank(value.github_url),
            live_url: none_if_blank(value.live_url),
            status: value.status,
            display_order: value.display_order,
            published_at: value.status.is_published().then_some(now),
            created_at: now,
            updated_at: now,
        })
    }
}

impl Project {
    pub fn to_detail_response(&self, images: Vec<ProjectImage>) -> ProjectDetailResponse {
        ProjectDetailResponse {
            id: self.id,
            title: self.title.clone(),
            slug: self.slug.clone(),
            summary: self.summary.clone(),
            content_markdown: self.content_markdown.clone(),
            content_html: safe_markdown_to_html(&self.content_markdown),
            technologies: self.technologies.clone(),
            github_url: self.github_url.clone(),
            live_url: self.live_url.clone(),
            status: self.status,
            display_order: self.display_order,
            images,
            published_at: self.published_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_derives_slug_when_absent() {
        let request = NewProjectRequest {
            title: "Terminal Snake".to_string(),
            slug: None,
            summary: None,
            content_markdown: "Built with crossterm.".to_string(),
            technologies: vec!["rust".to_string()],
            github_url: Some("https://github.com/example/snake".to_string()),
            live_url: None,
            status: ContentStatus::Draft,
            display_order: 0,
        };
        let insert = ProjectInsert::try_from(request).unwrap();
        assert_eq!(insert.slug, "terminal-snake");
    }

    #[test]
    fn non_http_url_is_rejected() {
        let request = NewProjectRequest {
            title: "Terminal Snake".to_string(),
            slug: None,
            summary: None,
            content_markdown: "Built with crossterm.".to_string(),
            technologies: vec![],
            github_url: Some("ftp://example.com/snake".to_string()),
            live_url: None,
            status: ContentStatus::Draft,
            display_order: 0,
        };
        assert!(ProjectInsert::try_from(request).is_err());
    }
}
