use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MediaAsset {
    pub id: Uuid,
    pub file_name: String,
    pub storage_key: String,
    pub public_url: String,
    pub mime_type: String,
    pub file_size: i64,
    pub folder: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct MediaAssetInsert {
    pub file_name: String,
    pub storage_key: String,
    pub public_url: String,
    pub mime_type: String,
    pub file_size: i64,
    pub folder: String,
    pub created_at: DateTime<Utc>,
}

/// Multipart upload payload: one file plus an optional folder namespace
/// (e.g. "projects", "avatars"). The folder is a storage prefix, not a
/// filesystem entity exposed to clients.
#[derive(Debug, MultipartForm)]
pub struct MediaUploadForm {
    #[multipart(limit = "10MB")]
    pub file: TempFile,
    pub folder: Option<Text<String>>,
}

#[derive(Debug, Serialize)]
pub struct MediaAssetResponse {
    pub id: Uuid,
    pub file_name: String,
    pub public_url: String,
    pub mime_type: String,
    pub file_size: i64,
    pub folder: String,
    pub created_at: DateTime<Utc>,
}

impl From<MediaAsset> for MediaAssetResponse {
    fn from(asset: MediaAsset) -> Self {
        MediaAssetResponse {
            id: asset.id,
            file_name: asset.file_name,
            public_url: asset.public_url,
            mime_type: asset.mime_type,
            file_size: asset.file_size,
            folder: asset.folder,
            created_at: asset.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MediaListResponse {
    pub assets: Vec<MediaAssetResponse>,
    pub total: i64,
}
