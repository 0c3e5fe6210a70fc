use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags};

/// Opens the materialized catalog image. The browser never writes to it.
pub fn open_connection(db_path: &Path) -> Result<Connection> {
    Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("failed to open db: {}", db_path.display()))
}

/// Writes the decompressed image to disk so SQLite can open it.
pub fn materialize_image(bytes: &[u8], db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
    }
    std::fs::write(db_path, bytes)
        .with_context(|| format!("failed to write db image: {}", db_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opened_image_rejects_writes() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("guia.sqlite");
        {
            let conn = Connection::open(&path).expect("should create db");
            conn.execute_batch("CREATE TABLE pos (uf TEXT); INSERT INTO pos VALUES ('SP');")
                .expect("should seed db");
        }

        let conn = open_connection(&path).expect("should open read-only");

        assert!(conn.execute("INSERT INTO pos VALUES ('RJ')", []).is_err());
    }

    #[test]
    fn materialize_creates_missing_dirs() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("data").join("guia.sqlite");

        materialize_image(b"image", &path).expect("materialize should succeed");

        assert_eq!(std::fs::read(&path).expect("should read image"), b"image");
    }
}
