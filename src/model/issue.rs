use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An immutable snapshot of a Jira issue, replaced wholesale on each fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Stable internal identifier (survives key changes on project move)
    pub id: String,
    /// Human-facing key, e.g. "PROJ-123"
    pub key: String,
    pub summary: String,
    pub status: String,
    pub assignee: Option<String>,
    pub reporter: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// Display ordering over a cached issue list. Server order is whatever
/// order the entry was fetched in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    Server,
    CreatedDesc,
    UpdatedDesc,
    Key,
}

impl SortMode {
    pub fn next(self) -> Self {
        match self {
            SortMode::Server => SortMode::CreatedDesc,
            SortMode::CreatedDesc => SortMode::UpdatedDesc,
            SortMode::UpdatedDesc => SortMode::Key,
            SortMode::Key => SortMode::Server,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortMode::Server => "server",
            SortMode::CreatedDesc => "created",
            SortMode::UpdatedDesc => "updated",
            SortMode::Key => "key",
        }
    }

    /// Apply this ordering to a snapshot copy of a cached list.
    pub fn sort(self, issues: &mut [Issue]) {
        match self {
            SortMode::Server => {}
            SortMode::CreatedDesc => issues.sort_by(|a, b| b.created.cmp(&a.created)),
            SortMode::UpdatedDesc => issues.sort_by(|a, b| b.updated.cmp(&a.updated)),
            SortMode::Key => issues.sort_by(|a, b| key_sort_parts(&a.key).cmp(&key_sort_parts(&b.key))),
        }
    }
}

/// Split "PROJ-123" into (prefix, 123) so keys sort numerically within a
/// project rather than lexically ("PROJ-9" before "PROJ-10").
fn key_sort_parts(key: &str) -> (&str, u64) {
    match key.rsplit_once('-') {
        Some((prefix, digits)) => match digits.parse() {
            Ok(n) => (prefix, n),
            Err(_) => (key, 0),
        },
        None => (key, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn issue(key: &str, created: i64, updated: i64) -> Issue {
        Issue {
            id: key.to_string(),
            key: key.to_string(),
            summary: String::new(),
            status: "Open".into(),
            assignee: None,
            reporter: None,
            created: Utc.timestamp_opt(created, 0).unwrap(),
            updated: Utc.timestamp_opt(updated, 0).unwrap(),
        }
    }

    #[test]
    fn key_sort_is_numeric_within_project() {
        let mut issues = vec![issue("P-10", 0, 0), issue("P-9", 0, 0), issue("P-100", 0, 0)];
        SortMode::Key.sort(&mut issues);
        let keys: Vec<_> = issues.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, ["P-9", "P-10", "P-100"]);
    }

    #[test]
    fn created_desc_puts_newest_first() {
        let mut issues = vec![issue("P-1", 10, 0), issue("P-2", 30, 0), issue("P-3", 20, 0)];
        SortMode::CreatedDesc.sort(&mut issues);
        let keys: Vec<_> = issues.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, ["P-2", "P-3", "P-1"]);
    }

    #[test]
    fn server_order_is_untouched() {
        let mut issues = vec![issue("P-2", 30, 0), issue("P-1", 10, 0)];
        SortMode::Server.sort(&mut issues);
        assert_eq!(issues[0].key, "P-2");
    }

    #[test]
    fn sort_mode_cycles_back_to_server() {
        let mut mode = SortMode::Server;
        for _ in 0..4 {
            mode = mode.next();
        }
        assert_eq!(mode, SortMode::Server);
    }
}
