use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Persisted user state (written to state.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserState {
    /// Issue keys marked for follow-up, in the order they were flagged
    #[serde(rename = "flaggedIssueKeys", default)]
    pub flagged_issue_keys: Vec<String>,
}

/// Read state.json. A missing or corrupt file is treated as empty state;
/// the user loses nothing but flags, and the next toggle rewrites it.
pub fn read_state(path: &Path) -> UserState {
    fs::read_to_string(path)
        .ok()
        .and_then(|text| serde_json::from_str(&text).ok())
        .unwrap_or_default()
}

/// Rewrite state.json (called on every flag toggle).
pub fn write_state(path: &Path, state: &UserState) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut text = serde_json::to_string_pretty(state)?;
    text.push('\n');
    fs::write(path, text)
}
