use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use directories::ProjectDirs;

use crate::DB_CACHE_KEY;

pub const DEFAULT_SNAPSHOT: &str = "public/data/guia.sqlite.gz";
const DB_FILE_NAME: &str = "guia.sqlite";

const EX1: &str = r#" guia-federais"#;
const EX2: &str = r#" guia-federais --snapshot https://example.org/data/guia.sqlite.gz"#;
const EX3: &str = r#" guia-federais --no-cache --log-filter guia_federais=debug"#;

/// Command-line arguments for the catalog browser.
#[derive(Parser, Debug, Clone)]
#[command(
    author, version, about,
    long_about = None,
    next_line_help = true,
    after_help = format!("EXAMPLES:\n{EX1}\n{EX2}\n{EX3}")
)]
pub struct Arguments {
    /// Gzipped SQLite snapshot: an http(s) URL or a local path.
    #[arg(long, value_name = "URL_OR_PATH", default_value = DEFAULT_SNAPSHOT)]
    pub snapshot: String,

    /// Directory holding the cached database image.
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Directory the image is materialized into before opening.
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Cache entry name. Bump it to invalidate old images.
    #[arg(long, default_value = DB_CACHE_KEY)]
    pub cache_key: String,

    /// Always fetch the snapshot and skip the cache.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub no_cache: bool,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    pub log_filter: String,
}

/// Arguments with every directory resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub snapshot: String,
    pub cache_dir: Option<PathBuf>,
    pub db_path: PathBuf,
    pub cache_key: String,
}

impl AppConfig {
    pub fn resolve(args: &Arguments) -> Result<Self> {
        let dirs = project_dirs();
        let data_dir = match (&args.data_dir, &dirs) {
            (Some(dir), _) => dir.clone(),
            (None, Ok(dirs)) => dirs.data_local_dir().to_path_buf(),
            (None, Err(err)) => return Err(anyhow!("{err}")),
        };
        let cache_dir = if args.no_cache {
            None
        } else {
            match (&args.cache_dir, &dirs) {
                (Some(dir), _) => Some(dir.clone()),
                (None, Ok(dirs)) => Some(dirs.cache_dir().to_path_buf()),
                (None, Err(err)) => return Err(anyhow!("{err}")),
            }
        };

        Ok(Self {
            snapshot: args.snapshot.clone(),
            cache_dir,
            db_path: data_dir.join(DB_FILE_NAME),
            cache_key: args.cache_key.clone(),
        })
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("br", "guiadasfederais", "guia")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))
}

fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview dir: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}

pub fn default_webview_data_dir() -> Result<PathBuf> {
    ensure_webview_data_dir(project_dirs()?.data_local_dir())
}
