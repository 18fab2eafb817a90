//! Global run configuration file handling

use std::path::Path;
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::ScenaristError;

/// Maximum config / scenario file size (1 MB)
pub const MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Settings shared by every scenario of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Prefix for every request path
    #[serde(default)]
    pub base_url: String,

    /// Headers sent with every request; scenario headers override them
    #[serde(default)]
    pub headers: IndexMap<String, String>,

    /// Request timeout in seconds; 0 disables the timeout
    #[serde(default)]
    pub timeout: u64,

    /// Abort the run after the first failed scenario
    #[serde(default)]
    pub stop_on_error: bool,

    /// Report every pipeline stage
    #[serde(default)]
    pub verbose: bool,
}

impl GlobalConfig {
    /// Request timeout, `None` when disabled
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_secs(self.timeout))
    }

    /// Load the `global.config` section of a YAML config file
    pub fn load(path: &Path) -> Result<Self, ScenaristError> {
        let content = read_limited(path).map_err(|e| {
            ScenaristError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        Self::from_yaml(&content).map_err(|e| {
            ScenaristError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
        })
    }

    /// Parse config file contents
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes as unit, not as a missing section
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let file: ConfigFile = serde_yaml::from_str(content)?;
        Ok(file.global.config)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    global: GlobalSection,
}

#[derive(Debug, Default, Deserialize)]
struct GlobalSection {
    #[serde(default)]
    config: GlobalConfig,
}

/// Read a file after checking it against [`MAX_FILE_SIZE`]
pub fn read_limited(path: &Path) -> std::io::Result<String> {
    let metadata = std::fs::metadata(path)?;
    if metadata.len() > MAX_FILE_SIZE {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("file too large: {} bytes (max {} bytes)", metadata.len(), MAX_FILE_SIZE),
        ));
    }
    std::fs::read_to_string(path)
}
