//! Command handlers behind the `fatiguemap` subcommands.

pub mod assess;
pub mod dashboard;
pub mod generate;
pub mod init;
pub mod inspect;
pub mod train;

use crate::config::{load_config, load_config_from, FatiguemapConfig};
use crate::formatting::{ColorMode, FormattingConfig};
use anyhow::{Context, Result};
use std::path::Path;

/// Explicit `--config` file, or discovery from the working directory
pub fn resolve_config(explicit: Option<&Path>) -> Result<FatiguemapConfig> {
    match explicit {
        Some(path) => load_config_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(load_config()),
    }
}

/// Environment-derived formatting, overridden by `--plain` and then by the
/// config file's `use_color`
pub fn resolve_formatting(plain: bool, config: &FatiguemapConfig) -> FormattingConfig {
    if plain {
        return FormattingConfig::plain();
    }
    let mut formatting = FormattingConfig::from_env();
    match config.use_color() {
        Some(true) => formatting.color = ColorMode::Always,
        Some(false) => formatting.color = ColorMode::Never,
        None => {}
    }
    formatting
}
