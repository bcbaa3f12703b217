use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    entities::profile::{Profile, UpsertProfileRequest},
    errors::AppError,
    repositories::sqlx_repo::SqlxProfileRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn get_profile(&self) -> Result<Profile, AppError>;
    async fn upsert_profile(&self, request: &UpsertProfileRequest) -> Result<Profile, AppError>;
    async fn check_connection(&self) -> Result<(), AppError>;
}

impl SqlxProfileRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProfileRepo { pool }
    }
}

#[async_trait]
impl ProfileRepository for SqlxProfileRepo {
    async fn get_profile(&self) -> Result<Profile, AppError> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profile LIMIT 1")
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile has not been created yet".into()))?;

        Ok(profile)
    }

    async fn upsert_profile(&self, request: &UpsertProfileRequest) -> Result<Profile, AppError> {
        // Single-owner site: one fixed row, keyed by a constant id.
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profile (
                id, full_name, headline, bio_markdown, avatar_url, location,
                contact_email, github_url, linkedin_url, website_url, created_at, updated_at
            )
            VALUES (
                '00000000-0000-0000-0000-000000000001', $1, $2, $3, $4, $5,
                $6, $7, $8, $9, NOW(), NOW()
            )
            ON CONFLICT (id) DO UPDATE SET
                full_name = EXCLUDED.full_name,
                headline = EXCLUDED.headline,
                bio_markdown = EXCLUDED.bio_markdown,
                avatar_url = EXCLUDED.avatar_url,
                location = EXCLUDED.location,
                contact_email = EXCLUDED.contact_email,
                github_url = EXCLUDED.github_url,
                linkedin_url = EXCLUDED.linkedin_url,
                website_url = EXCLUDED.website_url,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(&request.full_name)
        .bind(&request.headline)
        .bind(&request.bio_markdown)
        .bind(&request.avatar_url)
        .bind(&request.location)
        .bind(&request.contact_email)
        .bind(&request.github_url)
        .bind(&request.linkedin_url)
        .bind(&request.website_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
