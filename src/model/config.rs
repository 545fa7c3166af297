use serde::{Deserialize, Serialize};

/// Configuration from config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Jira project key every query is scoped to (e.g. "PROJ")
    pub project: String,
    /// Jira site domain (e.g. "example.atlassian.net")
    pub domain: String,
    pub views: Vec<ViewConfig>,
    /// Optional high-frequency activity view with its own cadence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<ActivityConfig>,
}

/// One named, user-defined query rendered as a selectable tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    pub name: String,
    pub jql: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityConfig {
    pub enabled: bool,
    pub polling_interval_minutes: u64,
    pub jql: String,
}

impl Config {
    /// Check structural invariants. Returns every violation at once so
    /// startup can list them all rather than failing one at a time.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.project.trim().is_empty() {
            problems.push("project key is empty".to_string());
        }
        if self.domain.trim().is_empty() {
            problems.push("domain is empty".to_string());
        }
        if self.views.is_empty() {
            problems.push("no views configured (at least one is required)".to_string());
        }
        for (i, view) in self.views.iter().enumerate() {
            if view.name.trim().is_empty() {
                problems.push(format!("view {} has an empty name", i + 1));
            }
            if view.jql.trim().is_empty() {
                let label = if view.name.trim().is_empty() {
                    format!("view {}", i + 1)
                } else {
                    format!("view '{}'", view.name)
                };
                problems.push(format!("{} has an empty query", label));
            }
        }
        if let Some(activity) = &self.activity
            && activity.enabled
        {
            if activity.jql.trim().is_empty() {
                problems.push("activity view is enabled but its query is empty".to_string());
            }
            if activity.polling_interval_minutes == 0 {
                problems.push("activity polling interval must be at least 1 minute".to_string());
            }
        }
        problems
    }

    /// Whether the activity view participates in polling
    pub fn activity_enabled(&self) -> bool {
        self.activity.as_ref().is_some_and(|a| a.enabled)
    }

    /// Total number of tab slots: standard views plus the activity slot
    pub fn slot_count(&self) -> usize {
        self.views.len() + usize::from(self.activity_enabled())
    }

    /// Index of the activity slot, when enabled. Standard views occupy
    /// indices 0..views.len(); the activity slot always comes last.
    pub fn activity_slot(&self) -> Option<usize> {
        self.activity_enabled().then_some(self.views.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            project: "PROJ".into(),
            domain: "example.atlassian.net".into(),
            views: vec![ViewConfig {
                name: "Open".into(),
                jql: "status = Open".into(),
            }],
            activity: None,
        }
    }

    #[test]
    fn valid_config_has_no_problems() {
        assert!(base_config().validate().is_empty());
    }

    #[test]
    fn all_violations_reported_at_once() {
        let config = Config {
            project: "".into(),
            domain: "".into(),
            views: vec![],
            activity: None,
        };
        assert_eq!(config.validate().len(), 3);
    }

    #[test]
    fn empty_view_fields_are_violations() {
        let mut config = base_config();
        config.views.push(ViewConfig {
            name: "".into(),
            jql: "".into(),
        });
        assert_eq!(config.validate().len(), 2);
    }

    #[test]
    fn enabled_activity_requires_query_and_interval() {
        let mut config = base_config();
        config.activity = Some(ActivityConfig {
            enabled: true,
            polling_interval_minutes: 0,
            jql: "".into(),
        });
        assert_eq!(config.validate().len(), 2);

        // A disabled activity section is exempt
        config.activity.as_mut().unwrap().enabled = false;
        assert!(config.validate().is_empty());
    }

    #[test]
    fn activity_slot_follows_standard_views() {
        let mut config = base_config();
        assert_eq!(config.slot_count(), 1);
        assert_eq!(config.activity_slot(), None);

        config.activity = Some(ActivityConfig {
            enabled: true,
            polling_interval_minutes: 5,
            jql: "updated >= -1h".into(),
        });
        assert_eq!(config.slot_count(), 2);
        assert_eq!(config.activity_slot(), Some(1));
    }
}
