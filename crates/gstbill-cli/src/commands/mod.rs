//! CLI subcommands.

pub mod batch;
pub mod compute;
pub mod config;
pub mod gstin;
pub mod words;

use std::path::{Path, PathBuf};

use gstbill_core::BillingConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gstbill")
        .join("config.json")
}

/// Load the config named on the command line, else the default file if present.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<BillingConfig> {
    match config_path {
        Some(path) => Ok(BillingConfig::from_file(Path::new(path))?),
        None => config_or_default(&default_config_path()),
    }
}

/// The file at `path`, or defaults when it has not been created yet.
pub fn config_or_default(path: &Path) -> anyhow::Result<BillingConfig> {
    if path.exists() {
        Ok(BillingConfig::from_file(path)?)
    } else {
        Ok(BillingConfig::default())
    }
}
