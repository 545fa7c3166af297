use std::path::{Path, PathBuf};

/// Resolve the directory holding config.json, state.json, and the log.
/// `-C/--config-dir` overrides the default under the user config root.
pub fn config_dir(override_dir: Option<&str>) -> PathBuf {
    match override_dir {
        Some(dir) => PathBuf::from(dir),
        None => dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("jirawatch"),
    }
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join("config.json")
}

pub fn state_path(dir: &Path) -> PathBuf {
    dir.join("state.json")
}

pub fn log_path(dir: &Path) -> PathBuf {
    dir.join("jw.log")
}
