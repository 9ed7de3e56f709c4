pub mod types;

use crate::error::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

pub use types::{ClusterConfig, Config, MatchingConfig, OutputConfig};

const CONFIG_FILE_NAME: &str = ".kube-why.toml";

/// Get the global config file path (~/.kube-why.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Get the local config file path (dir/.kube-why.toml)
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Load configuration.
///
/// An explicit path must exist and parse. Otherwise the working directory is
/// checked first, then the home directory; unreadable discovered files are
/// skipped with a warning and defaults are used when nothing is found.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        return read_config_file(path);
    }

    let cwd = std::env::current_dir().ok();
    let candidates = cwd
        .as_deref()
        .map(local_config_path)
        .into_iter()
        .chain(global_config_path());

    Ok(discover_config(candidates))
}

/// First candidate that exists and parses, else defaults.
pub fn discover_config(candidates: impl IntoIterator<Item = PathBuf>) -> Config {
    for path in candidates {
        if !path.exists() {
            continue;
        }
        match read_config_file(&path) {
            Ok(config) => {
                log::debug!("Loaded configuration from {}", path.display());
                return config;
            }
            Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
        }
    }
    Config::default()
}

/// Read and validate one config file.
pub fn read_config_file(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParsingFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    config.validate()?;
    Ok(config)
}
