//! Loads simulation config from an optional TOML file layered over the defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use umbra_core::SimConfig;

/// Parses a TOML document. Omitted sections and fields keep their defaults.
pub fn parse_config(content: &str) -> Result<SimConfig> {
    toml::from_str(content).context("failed to parse simulation config toml")
}

/// Reads `path` when given, otherwise returns the default config.
pub fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_config(&content).with_context(|| format!("in config file {}", path.display()))
}
