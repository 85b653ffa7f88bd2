//! Optional TOML configuration, by default `<config_dir>/dragon/config.toml`.
//!
//! ```toml
//! machine = "dragon32"
//! rom_path = "/home/me/roms"
//!
//! [run]
//! cycles_per_sec = 894886   # 0 runs unthrottled
//! max_run_time_ms = 20
//! burst_op_count = 10000
//!
//! [trace]
//! path = "trace.log"
//!
//! [keyboard]
//! queue_capacity = 256
//! eof_grace_ms = 500
//! ```

use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub machine: Option<String>,
    pub rom_path: Option<PathBuf>,
    pub run: RunConfig,
    pub trace: TraceConfig,
    pub keyboard: KeyboardConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub cycles_per_sec: Option<u64>,
    pub max_run_time_ms: Option<u64>,
    pub burst_op_count: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraceConfig {
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyboardConfig {
    pub queue_capacity: Option<usize>,
    /// How long queued input keeps running after stdin closes.
    pub eof_grace_ms: Option<u64>,
}

impl Config {
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Load `explicit` if given (it must exist), otherwise the default file
    /// if there is one.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_path() {
            Some(path) if path.is_file() => {
                debug!("using config {}", path.display());
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dragon").join("config.toml"))
}
