use std::io::Read;

use flate2::read::GzDecoder;
use tracing::warn;

/// Gunzips a snapshot. Payloads that are not gzip (or are truncated) are
/// returned unchanged, since the server may have decoded them already.
pub fn decompress_or_passthrough(bytes: &[u8]) -> Vec<u8> {
    let mut decoder = GzDecoder::new(bytes);
    let mut out = Vec::new();
    match decoder.read_to_end(&mut out) {
        Ok(_) => out,
        Err(err) => {
            warn!(error = %err, bytes = bytes.len(), "snapshot is not gzip, using raw bytes");
            bytes.to_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    use super::*;

    #[test]
    fn gzip_payload_is_inflated() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(b"SQLite format 3\0").expect("write should succeed");
        let compressed = encoder.finish().expect("finish should succeed");

        assert_eq!(decompress_or_passthrough(&compressed), b"SQLite format 3\0");
    }

    #[test]
    fn plain_payload_is_returned_as_is() {
        assert_eq!(decompress_or_passthrough(b"not gzip"), b"not gzip");
    }
}
