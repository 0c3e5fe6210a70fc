use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::usecase::ports::storage::ByteCache;

/// One file per entry under a cache directory.
pub struct FileByteCache {
    dir: PathBuf,
}

impl FileByteCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn entry_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.bin"))
    }
}

impl ByteCache for FileByteCache {
    fn get(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.entry_path(name);
        match std::fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => Ok(None),
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => {
                Err(err).with_context(|| format!("failed to read cache entry: {}", path.display()))
            }
        }
    }

    fn set(&self, name: &str, bytes: &[u8]) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create cache dir: {}", self.dir.display()))?;
        let path = self.entry_path(name);
        let partial = path.with_extension("part");
        std::fs::write(&partial, bytes)
            .with_context(|| format!("failed to write cache entry: {}", partial.display()))?;
        std::fs::rename(&partial, &path)
            .with_context(|| format!("failed to store cache entry: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entry_is_a_miss() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let cache = FileByteCache::new(dir.path());

        assert_eq!(cache.get("guia-sqlite-v3").expect("get should succeed"), None);
    }

    #[test]
    fn stored_entry_is_returned() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let cache = FileByteCache::new(dir.path().join("nested"));

        cache.set("guia-sqlite-v3", b"image").expect("set should succeed");

        assert_eq!(
            cache.get("guia-sqlite-v3").expect("get should succeed"),
            Some(b"image".to_vec())
        );
        assert!(!dir.path().join("nested").join("guia-sqlite-v3.part").exists());
    }
}
