use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::infra::snapshot::gzip::decompress_or_passthrough;
use crate::usecase::ports::storage::{ByteCache, SnapshotSource};

/// Produces the uncompressed database image, going to the network only on a
/// cache miss.
pub struct BootstrapService {
    cache: Option<Box<dyn ByteCache>>,
    cache_key: String,
}

impl BootstrapService {
    pub fn new(cache: Option<Box<dyn ByteCache>>, cache_key: impl Into<String>) -> Self {
        Self {
            cache,
            cache_key: cache_key.into(),
        }
    }

    pub fn load_snapshot(&self, source: &dyn SnapshotSource) -> Result<Vec<u8>> {
        if let Some(bytes) = self.cached() {
            info!(key = %self.cache_key, bytes = bytes.len(), "database image served from cache");
            return Ok(bytes);
        }

        info!(source = %source.describe(), "fetching database snapshot");
        let compressed = source
            .fetch()
            .with_context(|| format!("failed to fetch snapshot: {}", source.describe()))?;
        let bytes = decompress_or_passthrough(&compressed);

        if let Some(cache) = &self.cache {
            match cache.set(&self.cache_key, &bytes) {
                Ok(()) => debug!(key = %self.cache_key, "database image cached"),
                Err(err) => warn!(key = %self.cache_key, error = %format!("{err:#}"), "could not cache database image"),
            }
        }
        Ok(bytes)
    }

    fn cached(&self) -> Option<Vec<u8>> {
        let cache = self.cache.as_ref()?;
        match cache.get(&self.cache_key) {
            Ok(hit) => hit,
            Err(err) => {
                warn!(key = %self.cache_key, error = %format!("{err:#}"), "cache read failed, fetching instead");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeMap;
    use std::io::Write;

    use anyhow::anyhow;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    use super::*;

    #[derive(Default)]
    struct MemoryCache {
        entries: RefCell<BTreeMap<String, Vec<u8>>>,
        fail_reads: bool,
    }

    impl ByteCache for MemoryCache {
        fn get(&self, name: &str) -> Result<Option<Vec<u8>>> {
            if self.fail_reads {
                return Err(anyhow!("storage unavailable"));
            }
            Ok(self.entries.borrow().get(name).cloned())
        }

        fn set(&self, name: &str, bytes: &[u8]) -> Result<()> {
            self.entries
                .borrow_mut()
                .insert(name.to_string(), bytes.to_vec());
            Ok(())
        }
    }

    struct CountingSource {
        payload: Vec<u8>,
        fetches: Cell<usize>,
    }

    impl CountingSource {
        fn new(payload: Vec<u8>) -> Self {
            Self {
                payload,
                fetches: Cell::new(0),
            }
        }
    }

    impl SnapshotSource for CountingSource {
        fn describe(&self) -> String {
            "memory".to_string()
        }

        fn fetch(&self) -> Result<Vec<u8>> {
            self.fetches.set(self.fetches.get() + 1);
            Ok(self.payload.clone())
        }
    }

    fn gzip(bytes: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes).expect("gzip write should succeed");
        encoder.finish().expect("gzip finish should succeed")
    }

    #[test]
    fn cache_hit_skips_fetch() {
        let cache = MemoryCache::default();
        cache
            .set("guia-sqlite-v3", b"cached image")
            .expect("seed should succeed");
        let service = BootstrapService::new(Some(Box::new(cache)), "guia-sqlite-v3");
        let source = CountingSource::new(gzip(b"fresh image"));

        let bytes = service.load_snapshot(&source).expect("load should succeed");

        assert_eq!(bytes, b"cached image");
        assert_eq!(source.fetches.get(), 0);
    }

    #[test]
    fn miss_fetches_decompresses_and_stores() {
        let service = BootstrapService::new(Some(Box::new(MemoryCache::default())), "k");
        let source = CountingSource::new(gzip(b"fresh image"));

        let first = service.load_snapshot(&source).expect("first load should succeed");
        let second = service.load_snapshot(&source).expect("second load should succeed");

        assert_eq!(first, b"fresh image");
        assert_eq!(second, b"fresh image");
        assert_eq!(source.fetches.get(), 1);
    }

    #[test]
    fn raw_payload_passes_through() {
        let service = BootstrapService::new(None, "k");
        let source = CountingSource::new(b"SQLite format 3\0".to_vec());

        let bytes = service.load_snapshot(&source).expect("load should succeed");

        assert_eq!(bytes, b"SQLite format 3\0");
    }

    #[test]
    fn failing_cache_reads_fall_back_to_fetch() {
        let cache = MemoryCache {
            fail_reads: true,
            ..MemoryCache::default()
        };
        let service = BootstrapService::new(Some(Box::new(cache)), "k");
        let source = CountingSource::new(gzip(b"fresh image"));

        let bytes = service.load_snapshot(&source).expect("load should succeed");

        assert_eq!(bytes, b"fresh image");
        assert_eq!(source.fetches.get(), 1);
    }
}
