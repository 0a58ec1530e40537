use crate::api::CatalogApi;
use crate::backend::http::HttpBackend;
use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const CONFIG_DIR_ENV: &str = "BOOKSHELF_CONFIG_DIR";

pub struct CatalogContext {
    pub api: CatalogApi<HttpBackend>,
    pub config: CatalogConfig,
    pub config_dir: PathBuf,
}

/// `BOOKSHELF_CONFIG_DIR` when set, otherwise the platform config directory.
pub fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "bookshelf", "bookshelf")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| CatalogError::Config("Could not determine config dir".into()))
}

/// Loads config (defaults when missing), applies a one-off server override and
/// builds the HTTP-backed API. Nothing is fetched yet.
pub fn initialize(config_dir: &Path, server_override: Option<&str>) -> Result<CatalogContext> {
    let mut config = CatalogConfig::load(config_dir)?;
    if let Some(server) = server_override {
        config.set_server_url(server);
    }

    let backend = HttpBackend::new(&config)?;
    Ok(CatalogContext {
        api: CatalogApi::new(backend),
        config,
        config_dir: config_dir.to_path_buf(),
    })
}
