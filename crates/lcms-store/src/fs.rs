//! Filesystem document backend.
//!
//! Layout: the document for key `a/b` lives at `<root>/a/b.json`. Parent
//! directories are created on first write. Every save goes to a temporary
//! file in the target directory which is then renamed over the target, so a
//! crash mid-write leaves either the old document or the new one.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StoreResult;
use crate::key::DocumentKey;
use crate::traits::DocumentBackend;

const EXTENSION: &str = "json";

/// Stores each document as a JSON file under a root directory.
#[derive(Clone, Debug)]
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    /// Use `root` as the data directory. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The file a key maps to.
    pub fn path_for(&self, key: &DocumentKey) -> PathBuf {
        let mut path = self.root.clone();
        let mut segments = key.segments().peekable();
        while let Some(segment) = segments.next() {
            if segments.peek().is_some() {
                path.push(segment);
            } else {
                path.push(format!("{segment}.{EXTENSION}"));
            }
        }
        path
    }
}

impl DocumentBackend for FsBackend {
    fn load(&self, key: &DocumentKey) -> StoreResult<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &DocumentKey, bytes: &[u8]) -> StoreResult<()> {
        let path = self.path_for(key);
        let dir = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(dir)?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".tmp-")
            .tempfile_in(dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;

        debug!(%key, path = %path.display(), len = bytes.len(), "document saved");
        Ok(())
    }

    fn remove(&self, key: &DocumentKey) -> StoreResult<bool> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => {
                debug!(%key, "document removed");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, key: &DocumentKey) -> StoreResult<bool> {
        Ok(self.path_for(key).is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> DocumentKey {
        DocumentKey::new(raw).unwrap()
    }

    #[test]
    fn path_mapping() {
        let backend = FsBackend::new("/data");
        assert_eq!(backend.path_for(&key("menu")), PathBuf::from("/data/menu.json"));
        assert_eq!(
            backend.path_for(&key("landings/abc")),
            PathBuf::from("/data/landings/abc.json")
        );
    }

    #[test]
    fn load_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FsBackend::new(dir.path());
        assert!(backend.load(&key("menu")).unwrap().is_none());
        assert!(!backend.exists(&key("menu")).unwrap());
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FsBackend::new(dir.path().join("nested"));
        backend.save(&key("landings/abc"), b"{\"a\":1}").unwrap();

        let on_disk = fs::read(dir.path().join("nested/landings/abc.json")).unwrap();
        assert_eq!(on_disk, b"{\"a\":1}");
        assert!(backend.exists(&key("landings/abc")).unwrap());
    }

    #[test]
    fn save_replaces_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FsBackend::new(dir.path());
        backend.save(&key("menu"), b"[1,2,3]").unwrap();
        backend.save(&key("menu"), b"[]").unwrap();

        assert_eq!(backend.load(&key("menu")).unwrap().unwrap(), b"[]");
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["menu.json"]);
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FsBackend::new(dir.path());
        backend.save(&key("resources"), b"[]").unwrap();
        assert!(backend.remove(&key("resources")).unwrap());
        assert!(!backend.remove(&key("resources")).unwrap());
    }
}
