//! Configuration file support for research-cite.
//!
//! # Configuration File Format
//!
//! ```toml
//! [endpoints]
//! crossref = "https://api.crossref.org"
//! openlibrary = "https://openlibrary.org"
//! noembed = "https://noembed.com"
//! semantic_scholar = "https://api.semanticscholar.org/graph/v1"
//! openalex = "https://api.openalex.org"
//!
//! [http]
//! timeout_secs = 30
//! connect_timeout_secs = 10
//! mailto = "you@example.com"
//! max_attempts = 1
//! retry_delay_ms = 500
//!
//! [api_keys]
//! semantic_scholar = "your-api-key"
//! openalex_email = "you@example.com"
//!
//! [citation]
//! default_style = "apa"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

use std::path::{Path, PathBuf};

use super::Config;

/// File name looked up in the working directory and the user config dir
pub const CONFIG_FILE_NAME: &str = "research-cite.toml";

impl Config {
    /// Load configuration from a TOML file, without environment overrides
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigFileError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigFileError::Parse(e.to_string()))
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigFileError> {
        toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content = self.to_toml_string()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
        }

        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }
}

/// Default location for a new config file: `<config dir>/research-cite/research-cite.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("research-cite").join(CONFIG_FILE_NAME))
}

/// Find a config file: the working directory first, then the user config dir
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    default_config_path().filter(|path| path.is_file())
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
