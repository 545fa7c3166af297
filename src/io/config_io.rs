use std::fs;
use std::path::{Path, PathBuf};

use crate::model::Config;

/// Error type for config file I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no config found at {path}\nrun `jw init` to create one")]
    Missing { path: PathBuf },
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} is not valid config JSON: {source}\nfix it by hand or delete it and run `jw init`")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("configuration is invalid:\n  - {}", .problems.join("\n  - "))]
    Invalid { problems: Vec<String> },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load and structurally validate the config file. All validation
/// violations are reported in one error.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::Missing {
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config: Config = serde_json::from_str(&text).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    let problems = config.validate();
    if !problems.is_empty() {
        return Err(ConfigError::Invalid { problems });
    }
    Ok(config)
}

/// Write the config file: pretty-printed JSON with a trailing newline.
pub fn save_config(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut text = serde_json::to_string_pretty(config)
        .map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
    text.push('\n');
    fs::write(path, text)?;
    Ok(())
}
