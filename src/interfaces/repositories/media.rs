use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::media::{MediaAsset, MediaAssetInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxMediaRepo,
};

// Optional parameters are owned: mockall cannot name the elided
// lifetime inside `Option<&str>` when generating the mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaRepository: Send + Sync {
    async fn create_media_asset(&self, asset: &MediaAssetInsert) -> Result<MediaAsset, AppError>;
    async fn get_media_asset_by_id(&self, id: &Uuid) -> Result<MediaAsset, AppError>;
    async fn list_media_assets(&self, folder: Option<String>) -> Result<Vec<MediaAsset>, AppError>;
    async fn count_media_assets(&self, folder: Option<String>) -> Result<i64, AppError>;
    async fn delete_media_asset(&self, id: &Uuid) -> Result<MediaAsset, AppError>;
}

impl SqlxMediaRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxMediaRepo { pool }
    }
}

#[async_trait]
impl MediaRepository for SqlxMediaRepo {
    async fn create_media_asset(&self, asset: &MediaAssetInsert) -> Result<MediaAsset, AppError> {
        let created = sqlx::query_as::<_, MediaAsset>(
            r#"
            INSERT INTO media_assets (
                file_name, storage_key, public_url, mime_type, file_size, folder, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&asset.file_name)
        .bind(&asset.storage_key)
        .bind(&asset.public_url)
        .bind(&asset.mime_type)
        .bind(asset.file_size)
        .bind(&asset.folder)
        .bind(asset.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get_media_asset_by_id(&self, id: &Uuid) -> Result<MediaAsset, AppError> {
        let asset = sqlx::query_as::<_, MediaAsset>("SELECT * FROM media_assets WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(asset)
    }

    async fn list_media_assets(&self, folder: Option<String>) -> Result<Vec<MediaAsset>, AppError> {
        let mut builder = QueryBuilder::new("SELECT * FROM media_assets WHERE TRUE");
        if let Some(folder) = folder {
            builder.push(" AND folder = ").push_bind(folder);
        }
        builder.push(" ORDER BY created_at DESC");

        let assets = builder
            .build_query_as::<MediaAsset>()
            .fetch_all(&self.pool)
            .await?;

        Ok(assets)
    }

    async fn count_media_assets(&self, folder: Option<String>) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM media_assets WHERE TRUE");
        if let Some(folder) = folder {
            builder.push(" AND folder = ").push_bind(folder);
        }

        let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn delete_media_asset(&self, id: &Uuid) -> Result<MediaAsset, AppError> {
        // Returns the deleted row so the caller can remove the file too.
        let asset =
            sqlx::query_as::<_, MediaAsset>("DELETE FROM media_assets WHERE id = $1 RETURNING *")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(asset)
    }
}
