//! Layered configuration.
//!
//! Sources, lowest precedence first:
//! - built-in defaults
//! - `.scopehint/settings.toml`, searched from the current directory upward
//! - environment variables
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `SCOPEHINT_` and use double
//! underscores to separate nested levels:
//! - `SCOPEHINT_ANALYSIS__MAX_RETRIES=20` sets `analysis.max_retries`
//! - `SCOPEHINT_WORKER__PENDING_CAPACITY=4` sets `worker.pending_capacity`
//! - `SCOPEHINT_LOGGING__DEFAULT=debug` sets `logging.default`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::parsing::MAX_RETRIES;

const CONFIG_DIR: &str = ".scopehint";
const CONFIG_FILE: &str = "settings.toml";
const ENV_PREFIX: &str = "SCOPEHINT_";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Directory holding `.scopehint`, when one was found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub worker: WorkerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Line repairs allowed per forced analysis
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Treat parser-inserted tokens as recoverable instead of fatal
    #[serde(default = "default_true")]
    pub tolerant: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct WorkerConfig {
    /// Requests that may wait while one is being analyzed
    #[serde(default = "default_pending_capacity")]
    pub pending_capacity: usize,

    /// Stack size of the analysis thread in MiB
    #[serde(default = "default_stack_size_mb")]
    pub stack_size_mb: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Default level: error, warn, info, debug, trace
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-target overrides, e.g. `scopehint::parsing = "debug"`
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_max_retries() -> u32 {
    MAX_RETRIES
}
fn default_true() -> bool {
    true
}
fn default_pending_capacity() -> usize {
    1
}
fn default_stack_size_mb() -> usize {
    8
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            workspace_root: None,
            analysis: AnalysisConfig::default(),
            worker: WorkerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            tolerant: true,
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            pending_capacity: default_pending_capacity(),
            stack_size_mb: default_stack_size_mb(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(CONFIG_FILE));

        Self::figment(&config_path)
            .extract()
            .map_err(Box::new)
            .map(|mut settings: Settings| {
                if settings.workspace_root.is_none() {
                    settings.workspace_root = Self::workspace_root();
                }
                settings
            })
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Self::figment(path.as_ref()).extract().map_err(Box::new)
    }

    fn figment(config_path: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path))
            // Double underscore separates nested levels
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Find `.scopehint/settings.toml` from the current directory upward
    fn find_workspace_config() -> Option<PathBuf> {
        Self::workspace_root().map(|root| root.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Get the workspace root directory (where `.scopehint` is located)
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        current
            .ancestors()
            .find(|ancestor| ancestor.join(CONFIG_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file in the current directory
    pub fn init_config_file(force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = PathBuf::from(CONFIG_DIR).join(CONFIG_FILE);

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        Settings::default().save(&config_path)?;
        Ok(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.analysis.max_retries, 100);
        assert!(settings.analysis.tolerant);
        assert_eq!(settings.worker.pending_capacity, 1);
        assert_eq!(settings.logging.default, "warn");
    }

    #[test]
    fn test_load_from_toml_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            r#"
[analysis]
max_retries = 7

[logging]
default = "debug"

[logging.modules]
"scopehint::parsing" = "trace"
"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.analysis.max_retries, 7);
        assert!(settings.analysis.tolerant, "unset keys keep their defaults");
        assert_eq!(settings.logging.default, "debug");
        assert_eq!(
            settings.logging.modules.get("scopehint::parsing").map(String::as_str),
            Some("trace")
        );
    }

    #[test]
    fn test_save_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_DIR).join(CONFIG_FILE);

        let mut settings = Settings::default();
        settings.worker.stack_size_mb = 16;
        settings.save(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.worker.stack_size_mb, 16);
        assert_eq!(loaded.analysis, settings.analysis);
    }
}
