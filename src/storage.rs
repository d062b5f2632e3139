use std::io;
use std::path::{Path, PathBuf};

use actix_multipart::form::tempfile::TempFile;
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;

/// File-storage seam for profile pictures. Returns the public path of the
/// stored file, or None when nothing usable was uploaded.
pub trait FileStore: Send + Sync {
    fn store(&self, file: TempFile) -> Result<Option<String>, AppError>;
}

/// Stores uploads on disk under the public uploads directory, each file
/// under a randomized unique name so no coordination is needed.
pub struct DiskStore {
    upload_dir: PathBuf,
}

impl DiskStore {
    pub fn new(upload_dir: impl Into<PathBuf>) -> io::Result<Self> {
        let upload_dir = upload_dir.into();
        std::fs::create_dir_all(&upload_dir)?;
        Ok(Self { upload_dir })
    }
}

impl FileStore for DiskStore {
    fn store(&self, file: TempFile) -> Result<Option<String>, AppError> {
        if file.size == 0 {
            return Ok(None);
        }

        let ext = file
            .file_name
            .as_deref()
            .and_then(|n| Path::new(n).extension())
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let name = format!("profile-{}{}", Uuid::new_v4(), ext);

        let dest = self.upload_dir.join(&name);
        std::fs::copy(file.file.path(), &dest)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        debug!(path = %dest.display(), "stored profile picture");
        Ok(Some(format!("/uploads/{name}")))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn temp_upload(name: Option<&str>, bytes: &[u8]) -> TempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        TempFile {
            file,
            content_type: None,
            file_name: name.map(str::to_string),
            size: bytes.len(),
        }
    }

    #[test]
    fn stores_under_unique_uploads_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path()).unwrap();

        let path = store
            .store(temp_upload(Some("me.png"), b"fake image bytes"))
            .unwrap()
            .unwrap();
        assert!(path.starts_with("/uploads/profile-"));
        assert!(path.ends_with(".png"));

        let on_disk = dir.path().join(path.trim_start_matches("/uploads/"));
        assert_eq!(std::fs::read(on_disk).unwrap(), b"fake image bytes");
    }

    #[test]
    fn two_uploads_never_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path()).unwrap();

        let a = store.store(temp_upload(Some("a.png"), b"a")).unwrap().unwrap();
        let b = store.store(temp_upload(Some("a.png"), b"b")).unwrap().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn empty_upload_stores_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path()).unwrap();

        assert_eq!(store.store(temp_upload(Some("a.png"), b"")).unwrap(), None);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
