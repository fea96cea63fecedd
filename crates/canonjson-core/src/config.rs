use crate::CanonError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "canonjson.toml";
pub const DEFAULT_PATTERN: &str = "data/*/*.biotools.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Glob patterns or literal paths processed when no inputs are given.
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,
    /// Reorder object keys lexicographically before sorting arrays.
    #[serde(default)]
    pub sort_keys: bool,
}

fn default_patterns() -> Vec<String> {
    vec![DEFAULT_PATTERN.to_owned()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
            sort_keys: false,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, CanonError> {
        let content = std::fs::read_to_string(path).map_err(|e| CanonError::io(path, e))?;
        Self::parse(&content)
            .map_err(|e| CanonError::Config(format!("invalid config {}: {e}", path.display())))
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load `explicit` if given, else `canonjson.toml` in `dir` when it exists,
    /// else the defaults.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self, CanonError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}
