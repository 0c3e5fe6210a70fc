use std::path::Path;

use anyhow::{Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};

/// Serializes a header and rows, quoting only fields that hold a comma, a
/// quote or a newline.
pub fn write_csv<H: AsRef<str>>(headers: &[H], rows: &[Vec<String>]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(headers.iter().map(|header| header.as_ref()))
        .context("failed to write csv header")?;
    for row in rows {
        writer
            .write_record(row)
            .context("failed to write csv record")?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("failed to flush csv writer: {err}"))?;
    String::from_utf8(bytes).context("csv output is not valid utf-8")
}

pub fn save_csv(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("failed to write csv: {}", path.display()))
}
