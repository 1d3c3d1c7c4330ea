//! Application metadata bundled into the executable.
//!
//! `resources/application.toml` is embedded at build time and carries the display
//! name and version used in usage, help and version text. A missing or unreadable
//! resource is not fatal: the tool keeps running with blank values.

use std::io::{self, Write};

use rust_embed::RustEmbed;
use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};

/// File name of the bundled resource
pub const RESOURCE_NAME: &str = "application.toml";

#[derive(RustEmbed)]
#[folder = "resources/"]
#[include = "*.toml"]
struct BundledResources;

/// Immutable application metadata, loaded once at startup
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Display name used in usage, help and version text
    #[serde(rename = "PROGRAM_NAME", default)]
    pub program_name: String,

    /// Free-form version string
    #[serde(rename = "VERSION", default)]
    pub version: String,
}

impl AppConfig {
    /// Load the bundled metadata, falling back to blank values on any failure
    ///
    /// The failure is reported on standard output and logged; startup continues.
    pub fn load() -> Self {
        Self::or_blank(Self::try_load(), &mut io::stdout())
    }

    /// Unwrap a load result, reporting a failure on `out` and substituting blank values
    pub fn or_blank<W: Write>(result: ConfigResult<Self>, out: &mut W) -> Self {
        match result {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(resource = RESOURCE_NAME, error = %err, "using blank application metadata");
                // Best effort: a closed stdout still falls back
                let _ = writeln!(out, "Could not load {}:", RESOURCE_NAME)
                    .and_then(|_| writeln!(out, "{}", err));
                Self::default()
            }
        }
    }

    /// Load the bundled metadata, surfacing any failure
    pub fn try_load() -> ConfigResult<Self> {
        let file = BundledResources::get(RESOURCE_NAME).ok_or_else(|| ConfigError::NotFound {
            name: RESOURCE_NAME.to_string(),
        })?;
        let content = std::str::from_utf8(&file.data)?;
        Self::from_toml_str(content)
    }

    /// Parse metadata from TOML text. Unknown keys are ignored and missing keys
    /// become empty strings.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}
