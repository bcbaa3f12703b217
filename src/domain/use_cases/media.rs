use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    domain::navigation::AdminSection,
    entities::media::{MediaAssetInsert, MediaAssetResponse, MediaListResponse},
    errors::AppError,
    infrastructure::{cache::CollectionCache, storage::DiskStorage},
    repositories::media::MediaRepository,
};

pub struct MediaHandler<R>
where
    R: MediaRepository,
{
    pub media_repo: R,
    pub storage: Arc<DiskStorage>,
    pub cache: Arc<CollectionCache>,
}

impl<R> MediaHandler<R>
where
    R: MediaRepository,
{
    pub fn new(media_repo: R, storage: Arc<DiskStorage>, cache: Arc<CollectionCache>) -> Self {
        MediaHandler { media_repo, storage, cache }
    }

    /// Persist an uploaded temp file and record it. The file is written
    /// first; if the insert fails the orphan on disk is removed.
    pub async fn upload(
        &self,
        folder: Option<&str>,
        original_name: Option<&str>,
        temp_path: &Path,
    ) -> Result<MediaAssetResponse, AppError> {
        let stored = self.storage.store(folder, original_name, temp_path).await?;

        let insert = MediaAssetInsert {
            file_name: original_name.unwrap_or(&stored.file_name).to_string(),
            storage_key: stored.storage_key.clone(),
            public_url: stored.public_url.clone(),
            mime_type: stored.mime_type.clone(),
            file_size: stored.file_size,
            folder: stored
                .storage_key
                .split('/')
                .next()
                .unwrap_or_default()
                .to_string(),
            created_at: Utc::now(),
        };

        let asset = match self.media_repo.create_media_asset(&insert).await {
            Ok(asset) => asset,
            Err(e) => {
                let _ = self.storage.remove(&stored.storage_key).await;
                return Err(e);
            }
        };

        self.cache.invalidate_section(AdminSection::Media);
        Ok(MediaAssetResponse::from(asset))
    }

    pub async fn get_asset(&self, id: &Uuid) -> Result<MediaAssetResponse, AppError> {
        let asset = self
            .media_repo
            .get_media_asset_by_id(id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::NotFound("Media asset not found".to_string()),
                _ => e,
            })?;

        Ok(MediaAssetResponse::from(asset))
    }

    pub async fn list_assets(&self, folder: Option<&str>) -> Result<MediaListResponse, AppError> {
        let (assets, total) = futures::try_join!(
            self.media_repo.list_media_assets(folder.map(str::to_string)),
            self.media_repo.count_media_assets(folder.map(str::to_string)),
        )?;

        Ok(MediaListResponse {
            assets: assets.into_iter().map(MediaAssetResponse::from).collect(),
            total,
        })
    }

    /// Delete the row first, then the file. A file that is already gone
    /// does not fail the delete.
    pub async fn delete_asset(&self, id: &Uuid) -> Result<(), AppError> {
        let asset = self
            .media_repo
            .delete_media_asset(id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::NotFound("Media asset not found".to_string()),
                _ => e,
            })?;

        self.storage.remove(&asset.storage_key).await?;
        self.cache.invalidate_section(AdminSection::Media);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::media::MockMediaRepository;
    use crate::settings::{AppConfig, AppEnvironment};
    use std::io::Write;

    fn storage(root: &Path) -> Arc<DiskStorage> {
        let config = AppConfig {
            env: AppEnvironment::Testing,
            name: "Portfolio CMS Test".to_string(),
            port: 0,
            host: "127.0.0.1".to_string(),
            worker_count: 1,
            database_url: "postgres://localhost/test".to_string(),
            cors_allowed_origins: vec!["*".to_string()],
            media_root: root.to_string_lossy().to_string(),
            public_base_url: "http://localhost:8000/media".to_string(),
            max_upload_bytes: 1024 * 1024,
        };
        Arc::new(DiskStorage::new(&config))
    }

    fn write_png(dir: &Path) -> std::path::PathBuf {
        // Minimal PNG magic so content sniffing resolves image/png.
        let path = dir.join("upload.tmp");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0])
            .unwrap();
        path
    }

    #[tokio::test]
    async fn upload_stores_file_and_records_asset() {
        let dir = tempfile::tempdir().unwrap();
        let temp = write_png(dir.path());

        let mut repo = MockMediaRepository::new();
        repo.expect_create_media_asset()
            .times(1)
            .withf(|insert| {
                insert.mime_type == "image/png"
                    && insert.folder == "projects"
                    && insert.file_name == "photo.png"
            })
            .returning(|insert| {
                Ok(crate::entities::media::MediaAsset {
                    id: Uuid::new_v4(),
                    file_name: insert.file_name.clone(),
                    storage_key: insert.storage_key.clone(),
                    public_url: insert.public_url.clone(),
                    mime_type: insert.mime_type.clone(),
                    file_size: insert.file_size,
                    folder: insert.folder.clone(),
                    created_at: insert.created_at,
                })
            });

        let handler = MediaHandler::new(
            repo,
            storage(dir.path()),
            Arc::new(CollectionCache::new()),
        );
        let response = handler
            .upload(Some("projects"), Some("photo.png"), &temp)
            .await
            .unwrap();

        assert_eq!(response.mime_type, "image/png");
        assert!(response.public_url.starts_with("http://localhost:8000/media/projects/"));
    }

    #[tokio::test]
    async fn failed_insert_cleans_up_the_stored_file() {
        let dir = tempfile::tempdir().unwrap();
        let temp = write_png(dir.path());

        let mut repo = MockMediaRepository::new();
        repo.expect_create_media_asset()
            .returning(|_| Err(AppError::InternalError("insert failed".into())));

        let handler = MediaHandler::new(
            repo,
            storage(dir.path()),
            Arc::new(CollectionCache::new()),
        );
        let result = handler.upload(None, Some("photo.png"), &temp).await;
        assert!(result.is_err());

        // Nothing left behind under the default folder.
        let uploads = dir.path().join("uploads");
        let leftover = std::fs::read_dir(&uploads)
            .map(|entries| entries.count())
            .unwrap_or(0);
        assert_eq!(leftover, 0);
    }

    #[tokio::test]
    async fn traversal_folder_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let temp = write_png(dir.path());

        let mut repo = MockMediaRepository::new();
        repo.expect_create_media_asset().times(0);

        let handler = MediaHandler::new(
            repo,
            storage(dir.path()),
            Arc::new(CollectionCache::new()),
        );
        let result = handler.upload(Some("../etc"), Some("photo.png"), &temp).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
