//! Optional `lingoflow.toml` defaults for the command line.
//!
//! ```toml
//! [parse]
//! include_non_translatable = true
//!
//! [export]
//! format = "resx"
//! ```

use std::path::Path;

use lingoflow::ParseOptions;
use serde::Deserialize;
use tracing::debug;

/// File picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "lingoflow.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub parse: ParseConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseConfig {
    /// Keep `translatable="false"` Android strings.
    pub include_non_translatable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Output format used when neither `--to` nor the output extension decide it.
    pub format: Option<String>,
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Invalid config: {}", e))
    }

    /// Loads `explicit` if given (it must exist), otherwise
    /// [`DEFAULT_CONFIG_FILE`] from the working directory if present.
    pub fn load(explicit: Option<&Path>) -> Result<Self, String> {
        let path = match explicit {
            Some(path) => path,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    return Ok(Config::default());
                }
                fallback
            }
        };
        debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
        Self::from_toml_str(&content)
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::new().with_non_translatable(self.parse.include_non_translatable)
    }
}
