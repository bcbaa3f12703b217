use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::validation::{validate_slug, validate_trimmed},
    entities::option_fields::{PatchI32, PatchString},
};

const MIN_NAME_LENGTH: u64 = 2;
const MAX_NAME_LENGTH: u64 = 60;
const MIN_SLUG_LENGTH: u64 = 2;
const MAX_SLUG_LENGTH: u64 = 80;
const MAX_DESCRIPTION_LENGTH: u64 = 300;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Category joined with how many posts reference it.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CategoryWithCount {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub post_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewCategoryRequest {
    #[validate(
        length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH),
        custom(function = validate_trimmed)
    )]
    pub name: String,

    #[validate(
        length(min = MIN_SLUG_LENGTH, max = MAX_SLUG_LENGTH),
        custom(function = validate_slug)
    )]
    pub slug: Option<String>,

    #[validate(length(max = MAX_DESCRIPTION_LENGTH))]
    pub description: Option<String>,

    #[serde(default)]
    pub display_order: i32,
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default)]
pub struct UpdateCategoryRequest {
    #[validate(
        length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH),
        custom(function = validate_trimmed)
    )]
    pub name: Option<String>,

    #[validate(
        length(min = MIN_SLUG_LENGTH, max = MAX_SLUG_LENGTH),
        custom(function = validate_slug)
    )]
    pub slug: Option<String>,

    #[validate(length(max = MAX_DESCRIPTION_LENGTH))]
    pub description: PatchString,

    pub display_order: PatchI32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewTagRequest {
    #[validate(
        length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH),
        custom(function = validate_trimmed)
    )]
    pub name: String,

    #[validate(
        length(min = MIN_SLUG_LENGTH, max = MAX_SLUG_LENGTH),
        custom(function = validate_slug)
    )]
    pub slug: Option<String>,

    #[serde(default)]
    pub display_order: i32,
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default)]
pub struct UpdateTagRequest {
    #[validate(
        length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH),
        custom(function = validate_trimmed)
    )]
    pub name: Option<String>,

    #[validate(
        length(min = MIN_SLUG_LENGTH, max = MAX_SLUG_LENGTH),
        custom(function = validate_slug)
    )]
    pub slug: Option<String>,

    pub display_order: PatchI32,
}
