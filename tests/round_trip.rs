//! Round-trip tests for the config and state files: a saved file loads back
//! to the same value, and a loaded file re-saves to the same bytes modulo
//! pretty-printing and the trailing newline.

use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use jirawatch::io::config_io::{load_config, save_config};
use jirawatch::io::state::{UserState, read_state, write_state};
use jirawatch::model::{ActivityConfig, Config, ViewConfig};

fn full_config() -> Config {
    Config {
        project: "PROJ".into(),
        domain: "example.atlassian.net".into(),
        views: vec![
            ViewConfig {
                name: "Open".into(),
                jql: "status = Open ORDER BY created DESC".into(),
            },
            ViewConfig {
                name: "Mine".into(),
                jql: "assignee = currentUser()".into(),
            },
        ],
        activity: Some(ActivityConfig {
            enabled: true,
            polling_interval_minutes: 5,
            jql: "updated >= -1h".into(),
        }),
    }
}

#[test]
fn config_save_load_save_is_stable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    save_config(&path, &full_config()).unwrap();
    let first_bytes = fs::read_to_string(&path).unwrap();

    let loaded = load_config(&path).unwrap();
    assert_eq!(loaded, full_config());

    save_config(&path, &loaded).unwrap();
    let second_bytes = fs::read_to_string(&path).unwrap();
    assert_eq!(second_bytes, first_bytes);
}

#[test]
fn hand_written_config_loads_and_resaves_equivalently() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    // Compact, hand-formatted JSON a user might write
    fs::write(
        &path,
        r#"{"project":"PROJ","domain":"example.atlassian.net","views":[{"name":"Open","jql":"status = Open"}]}"#,
    )
    .unwrap();

    let loaded = load_config(&path).unwrap();
    save_config(&path, &loaded).unwrap();
    let reloaded = load_config(&path).unwrap();
    assert_eq!(reloaded, loaded);

    // Rewritten pretty-printed with a trailing newline
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.ends_with("\n"));
    assert!(text.contains("\n  "));
}

#[test]
fn absent_activity_section_stays_absent_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    let mut config = full_config();
    config.activity = None;
    save_config(&path, &config).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(!text.contains("activity"));
    assert_eq!(load_config(&path).unwrap(), config);
}

#[test]
fn state_round_trip_preserves_flag_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    let state = UserState {
        flagged_issue_keys: vec!["PROJ-9".into(), "PROJ-2".into(), "PROJ-31".into()],
    };
    write_state(&path, &state).unwrap();
    assert_eq!(read_state(&path).flagged_issue_keys, state.flagged_issue_keys);
}

#[test]
fn corrupt_state_file_is_silently_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, "{\"flaggedIssueKeys\": \"not-a-list\"}").unwrap();
    assert!(read_state(&path).flagged_issue_keys.is_empty());
}
