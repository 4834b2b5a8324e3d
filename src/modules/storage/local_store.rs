use std::path::PathBuf;

use chrono::Utc;
use tokio::fs;

use crate::core::error::{AppError, Result};
use crate::features::incidents::models::ImageUpload;

/// Keep filenames shell- and URL-safe. Only the final path component
/// survives, so traversal sequences cannot escape the upload dir.
fn sanitize_file_name(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name)
        .trim_matches('.');
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Uploaded photos on local disk, served back under `/uploads`
pub struct LocalUploadStore {
    dir: PathBuf,
}

impl LocalUploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create upload dir: {e}")))
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    /// Write the image to disk and return its public URL path. A millisecond
    /// timestamp prefix keeps same-named uploads from clobbering each other.
    pub async fn store(&self, upload: &ImageUpload) -> Result<String> {
        let file_name = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_file_name(&upload.file_name)
        );

        fs::write(self.dir.join(&file_name), &upload.bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store upload: {e}")))?;

        Ok(format!("/uploads/{file_name}"))
    }

    /// Remove a previously stored upload by its public URL path. Used to
    /// roll the photo back when a submission fails after it was written.
    pub async fn remove(&self, url_path: &str) -> Result<()> {
        let file_name = url_path.trim_start_matches("/uploads/");
        fs::remove_file(self.dir.join(file_name))
            .await
            .map_err(|e| AppError::Internal(format!("Failed to remove upload: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_upload(file_name: &str) -> ImageUpload {
        ImageUpload {
            file_name: file_name.to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: vec![0xff, 0xd8, 0xff, 0xd9],
        }
    }

    #[tokio::test]
    async fn stored_upload_lands_on_disk_under_its_url_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalUploadStore::new(dir.path());
        store.init().await.unwrap();

        let url = store.store(&sample_upload("scene.jpg")).await.unwrap();

        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with("-scene.jpg"));
        let on_disk = dir.path().join(url.trim_start_matches("/uploads/"));
        assert_eq!(std::fs::read(on_disk).unwrap(), vec![0xff, 0xd8, 0xff, 0xd9]);
    }

    #[tokio::test]
    async fn hostile_file_names_are_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalUploadStore::new(dir.path());
        store.init().await.unwrap();

        let url = store.store(&sample_upload("../../etc/passwd")).await.unwrap();

        assert!(!url.contains(".."));
        assert!(!url.trim_start_matches("/uploads/").contains('/'));
    }

    #[tokio::test]
    async fn removed_upload_is_gone_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalUploadStore::new(dir.path());
        store.init().await.unwrap();
        let url = store.store(&sample_upload("scene.jpg")).await.unwrap();

        store.remove(&url).await.unwrap();

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        assert!(store.remove(&url).await.is_err());
    }

    #[test]
    fn empty_name_gets_a_placeholder() {
        assert_eq!(sanitize_file_name(""), "upload");
        assert_eq!(sanitize_file_name("a b.png"), "a_b.png");
    }
}
