//! Runtime configuration.
//!
//! Values are layered with the `config` crate: built-in defaults, then an
//! optional TOML file, then `BILIMFORMS_*` environment variables. Command
//! line flags are applied on top by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

pub const APP_NAME: &str = "bilimforms";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const ENV_PREFIX: &str = "BILIMFORMS";
const CONFIG_FILE: &str = "config.toml";
const SETTINGS_FILE: &str = "accessibility.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub api_base_url: String,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub settings_path: Option<PathBuf>,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Loads the configuration.
    ///
    /// An explicitly named file must exist; the default file in the user's
    /// config directory is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path, true),
            None => Self::from_file(&get_config_dir().join(CONFIG_FILE), false),
        }
    }

    pub fn from_file(path: &Path, required: bool) -> Result<Self, ::config::ConfigError> {
        ::config::Config::builder()
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(required),
            )
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn settings_file(&self) -> PathBuf {
        self.settings_path
            .clone()
            .unwrap_or_else(|| get_config_dir().join(SETTINGS_FILE))
    }

    pub fn log_directory(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| get_data_dir().join("logs"))
    }
}

pub fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from(".").join(".config"))
}

pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from(".").join(".data"))
}
