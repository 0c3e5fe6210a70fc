mod app;
mod config;
mod domain;
mod infra;
mod ui;
mod usecase;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::app::{App, BootContext};
use crate::config::{default_webview_data_dir, AppConfig, Arguments};
use crate::domain::catalog::SchemaRegistry;
use crate::infra::cache::file_cache::FileByteCache;
use crate::infra::snapshot::snapshot_source;
use crate::infra::sqlite::engine::SqliteEngine;
use crate::infra::sqlite::schema::materialize_image;
use crate::ui::grid::GridModel;
use crate::usecase::ports::storage::ByteCache;
use crate::usecase::services::bootstrap_service::BootstrapService;
use crate::usecase::services::browser_service::DataBrowser;

/// Row cap of every grid query.
pub const GRID_LIMIT: usize = 400;
/// Rows per grid page.
pub const PAGE_SIZE: usize = 50;
/// Columns shown before the user picks any.
pub const DEFAULT_VISIBLE_COLUMNS: usize = 3;
pub const DB_CACHE_KEY: &str = "guia-sqlite-v3";

fn main() {
    let args = Arguments::parse();
    init_tracing(&args.log_filter);

    let outcome = bootstrap(&args).map_err(|err| {
        error!(error = %format!("{err:#}"), "bootstrap failed");
        format!("{err:#}")
    });

    let webview_data_dir = match default_webview_data_dir() {
        Ok(dir) => dir,
        Err(err) => {
            error!(error = %format!("{err:#}"), "cannot prepare webview data dir");
            std::process::exit(1);
        }
    };

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(dioxus::desktop::WindowBuilder::new().with_title("Guia das Federais"))
                .with_data_directory(webview_data_dir),
        )
        .with_context(BootContext { outcome })
        .launch(App);
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Cache lookup, snapshot fetch and decompression. Leaves the image on disk
/// and returns its path.
fn bootstrap(args: &Arguments) -> Result<PathBuf> {
    let config = AppConfig::resolve(args)?;
    let cache = config
        .cache_dir
        .clone()
        .map(|dir| Box::new(FileByteCache::new(dir)) as Box<dyn ByteCache>);
    let service = BootstrapService::new(cache, config.cache_key.clone());
    let source = snapshot_source(&config.snapshot);

    let bytes = service.load_snapshot(source.as_ref())?;
    materialize_image(&bytes, &config.db_path)?;
    info!(path = %config.db_path.display(), bytes = bytes.len(), "database image ready");
    Ok(config.db_path)
}

/// Opens the engine over the image, checks the catalog against it, loads
/// the filter options and runs the first tab's query.
pub fn open_browser(db_path: &Path) -> Result<DataBrowser<GridModel>> {
    let registry = SchemaRegistry::builtin()?;
    let first_tab = registry.keys().first().map(|key| key.to_string());
    let engine = SqliteEngine::open(db_path)?;

    let mut browser = DataBrowser::new(registry, Box::new(engine));
    browser.validate_catalog()?;
    browser.hydrate_filters()?;
    if let Some(key) = first_tab {
        browser.select_tab(&key)?;
    }
    Ok(browser)
}
