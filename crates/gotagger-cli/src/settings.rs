//! Configuration file loading
//!
//! A TOML file with the same keys as the protoc parameter:
//!
//! ```toml
//! reserved_field_tags = 'bson:"-"'
//! output_path = "gen"
//! paths = "source_relative"
//! ```

use std::fs;
use std::path::Path;

use gotagger::{TaggerConfig, TaggerError, TaggerResult};

/// Load configuration defaults from a TOML file
pub fn load(path: &Path) -> TaggerResult<TaggerConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        TaggerError::ConfigError(format!(
            "failed to read config file '{}': {e}",
            path.display()
        ))
    })?;

    parse(&content).map_err(|e| e.with_context(format!("config file '{}'", path.display())))
}

/// Parse configuration from TOML text
pub fn parse(content: &str) -> TaggerResult<TaggerConfig> {
    toml::from_str(content).map_err(|e| TaggerError::ConfigError(e.message().trim().to_string()))
}
