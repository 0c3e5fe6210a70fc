use anyhow::Result;

/// Named binary blobs that survive restarts.
pub trait ByteCache {
    fn get(&self, name: &str) -> Result<Option<Vec<u8>>>;
    fn set(&self, name: &str, bytes: &[u8]) -> Result<()>;
}

/// Where the compressed database snapshot comes from.
pub trait SnapshotSource {
    fn describe(&self) -> String;
    fn fetch(&self) -> Result<Vec<u8>>;
}
