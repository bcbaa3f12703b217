//! Disk-backed media storage.
//!
//! Files land under `<media_root>/<folder>/<generated name>` where the
//! generated name is collision-resistant (millisecond timestamp plus a
//! random suffix) and keeps the original extension. The folder is a
//! namespace prefix supplied by the client, restricted to a single safe
//! path segment.

use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use derive_more::Display;
use infer::Infer;
use rand::{distributions::Alphanumeric, Rng};
use tokio::fs;

use crate::settings::AppConfig;

const DEFAULT_FOLDER: &str = "uploads";
const RANDOM_SUFFIX_LEN: usize = 8;

/// MIME types accepted for upload. Everything else is refused after
/// content sniffing, regardless of the file's extension.
const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/webp",
    "image/svg+xml",
    "application/pdf",
];

#[derive(Debug, Display)]
pub enum StorageError {
    #[display("File exceeds the maximum allowed size of {_0} bytes")]
    FileTooLarge(u64),

    #[display("Unsupported file type: {_0}")]
    UnsupportedType(String),

    #[display("Invalid folder name: {_0}")]
    InvalidFolder(String),

    #[display("I/O error: {_0}")]
    Io(io::Error),
}

impl From<io::Error> for StorageError {
    fn from(err: io::Error) -> Self {
        StorageError::Io(err)
    }
}

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub file_name: String,
    pub storage_key: String,
    pub public_url: String,
    pub mime_type: String,
    pub file_size: i64,
}

#[derive(Debug, Clone)]
pub struct DiskStorage {
    root: PathBuf,
    public_base_url: String,
    max_bytes: u64,
}

impl DiskStorage {
    pub fn new(config: &AppConfig) -> Self {
        DiskStorage {
            root: PathBuf::from(&config.media_root),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
            max_bytes: config.max_upload_bytes,
        }
    }

    /// Persist a received temp file under the given folder namespace.
    ///
    /// The size cap and MIME sniff run against the file on disk, not
    /// client-declared metadata.
    pub async fn store(
        &self,
        folder: Option<&str>,
        original_name: Option<&str>,
        temp_path: &Path,
    ) -> Result<StoredFile, StorageError> {
        let folder = sanitize_folder(folder)?;

        let metadata = fs::metadata(temp_path).await?;
        if metadata.len() > self.max_bytes {
            return Err(StorageError::FileTooLarge(self.max_bytes));
        }

        let mime_type = sniff_mime(temp_path, original_name)?;

        let file_name = generate_object_name(original_name);
        let storage_key = format!("{}/{}", folder, file_name);

        let target_dir = self.root.join(&folder);
        fs::create_dir_all(&target_dir).await?;

        let target = target_dir.join(&file_name);
        // TempFile lives on a different filesystem in some deployments,
        // so copy + remove instead of rename.
        fs::copy(temp_path, &target).await?;
        let _ = fs::remove_file(temp_path).await;

        Ok(StoredFile {
            public_url: format!("{}/{}", self.public_base_url, storage_key),
            file_name,
            storage_key,
            mime_type,
            file_size: metadata.len() as i64,
        })
    }

    /// Remove a stored file. Missing files are not an error: the row is
    /// the source of truth and the file may already be gone.
    pub async fn remove(&self, storage_key: &str) -> Result<(), StorageError> {
        let key = storage_key.trim_start_matches('/');
        if key.split('/').any(|seg| seg == "..") {
            return Err(StorageError::InvalidFolder(storage_key.to_string()));
        }
        match fs::remove_file(self.root.join(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Build a collision-resistant object name preserving the original
/// extension: `<unix millis>-<random suffix>[.ext]`.
pub fn generate_object_name(original_name: Option<&str>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_SUFFIX_LEN)
        .map(char::from)
        .collect();

    let extension = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match extension {
        Some(ext) => format!("{}-{}.{}", Utc::now().timestamp_millis(), suffix, ext),
        None => format!("{}-{}", Utc::now().timestamp_millis(), suffix),
    }
}

/// Restrict the folder to one lowercase path segment. No separators, no
/// traversal.
pub fn sanitize_folder(folder: Option<&str>) -> Result<String, StorageError> {
    let raw = match folder {
        None => return Ok(DEFAULT_FOLDER.to_string()),
        Some(f) => f.trim(),
    };
    if raw.is_empty() {
        return Ok(DEFAULT_FOLDER.to_string());
    }

    let valid = raw.len() <= 40
        && raw
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');

    if valid {
        Ok(raw.to_string())
    } else {
        Err(StorageError::InvalidFolder(raw.to_string()))
    }
}

fn sniff_mime(path: &Path, original_name: Option<&str>) -> Result<String, StorageError> {
    let infer = Infer::new();
    match infer.get_from_path(path) {
        Ok(Some(kind)) => {
            let mime = kind.mime_type();
            if ALLOWED_MIME_TYPES.contains(&mime) {
                Ok(mime.to_string())
            } else {
                Err(StorageError::UnsupportedType(mime.to_string()))
            }
        }
        // SVG and other text formats have no magic bytes; fall back to
        // the extension for those.
        Ok(None) => match original_name
            .and_then(|n| Path::new(n).extension())
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("svg") => Ok("image/svg+xml".to_string()),
            other => Err(StorageError::UnsupportedType(
                other.unwrap_or("unknown").to_string(),
            )),
        },
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_names_keep_extension_and_differ() {
        let a = generate_object_name(Some("Photo.PNG"));
        let b = generate_object_name(Some("Photo.PNG"));
        assert!(a.ends_with(".png"));
        assert!(b.ends_with(".png"));
        assert_ne!(a, b);
    }

    #[test]
    fn object_name_without_extension() {
        let name = generate_object_name(Some("README"));
        assert!(!name.contains('.'));
    }

    #[test]
    fn suspicious_extensions_are_dropped() {
        let name = generate_object_name(Some("x.t/ar"));
        assert!(!name.contains('/'));
    }

    #[test]
    fn folder_defaults_and_rejects_traversal() {
        assert_eq!(sanitize_folder(None).unwrap(), "uploads");
        assert_eq!(sanitize_folder(Some("  ")).unwrap(), "uploads");
        assert_eq!(sanitize_folder(Some("projects")).unwrap(), "projects");
        assert!(sanitize_folder(Some("../etc")).is_err());
        assert!(sanitize_folder(Some("a/b")).is_err());
        assert!(sanitize_folder(Some("Upper")).is_err());
    }
}
