pub mod file;
pub mod gzip;
pub mod http;

use crate::usecase::ports::storage::SnapshotSource;

/// URLs go over http, anything else is read from disk.
pub fn snapshot_source(location: &str) -> Box<dyn SnapshotSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(http::HttpSnapshot::new(location))
    } else {
        Box::new(file::FileSnapshot::new(location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_source_by_scheme() {
        assert_eq!(
            snapshot_source("https://example.org/guia.sqlite.gz").describe(),
            "https://example.org/guia.sqlite.gz"
        );
        assert_eq!(
            snapshot_source("public/data/guia.sqlite.gz").describe(),
            "public/data/guia.sqlite.gz"
        );
    }
}
