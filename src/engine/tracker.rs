//! Cross-refresh diff that spots issues appearing for the first time.

use std::collections::HashSet;

use crate::model::Issue;

/// Tracks every issue id observed since the process started and the subset
/// currently highlighted as new.
///
/// The seen-set is process-lifetime: it survives settings commits and is
/// never persisted, so a restart treats everything as already-known again
/// via the initial load. Highlights accumulate until explicitly cleared.
#[derive(Debug, Default)]
pub struct NewIssueTracker {
    seen: HashSet<String>,
    highlighted: HashSet<String>,
}

impl NewIssueTracker {
    /// Fold one fetch's issues into the seen-set.
    ///
    /// On an initial load every id is absorbed silently. Otherwise ids not
    /// seen before are returned, and unioned into the highlighted set.
    pub fn fold_in(&mut self, issues: &[Issue], initial_load: bool) -> HashSet<String> {
        let mut new_ids = HashSet::new();
        for issue in issues {
            if self.seen.insert(issue.id.clone()) && !initial_load {
                new_ids.insert(issue.id.clone());
            }
        }
        self.highlighted.extend(new_ids.iter().cloned());
        new_ids
    }

    pub fn is_highlighted(&self, id: &str) -> bool {
        self.highlighted.contains(id)
    }

    /// Count of highlighted issues within one view's current snapshot.
    pub fn highlighted_in(&self, issues: &[Issue]) -> usize {
        issues.iter().filter(|i| self.highlighted.contains(&i.id)).count()
    }

    /// Explicit user action; also invoked on settings re-arm.
    pub fn clear_highlights(&mut self) {
        self.highlighted.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn issue(id: &str) -> Issue {
        Issue {
            id: id.to_string(),
            key: format!("P-{}", id),
            summary: String::new(),
            status: "Open".into(),
            assignee: None,
            reporter: None,
            created: Utc::now(),
            updated: Utc::now(),
        }
    }

    #[test]
    fn initial_load_seeds_without_highlighting() {
        let mut tracker = NewIssueTracker::default();
        let new = tracker.fold_in(&[issue("A"), issue("B")], true);
        assert!(new.is_empty());
        assert!(!tracker.is_highlighted("A"));

        let new = tracker.fold_in(&[issue("A"), issue("B"), issue("C")], false);
        assert_eq!(new, HashSet::from(["C".to_string()]));
        assert!(tracker.is_highlighted("C"));

        // The same snapshot again reports nothing new
        let new = tracker.fold_in(&[issue("A"), issue("B"), issue("C")], false);
        assert!(new.is_empty());
        assert!(tracker.is_highlighted("C"));
    }

    #[test]
    fn highlights_accumulate_across_folds() {
        let mut tracker = NewIssueTracker::default();
        tracker.fold_in(&[issue("A")], true);
        tracker.fold_in(&[issue("A"), issue("B")], false);
        tracker.fold_in(&[issue("A"), issue("B"), issue("C")], false);
        assert!(tracker.is_highlighted("B"));
        assert!(tracker.is_highlighted("C"));
        assert_eq!(tracker.highlighted_in(&[issue("A"), issue("B"), issue("C")]), 2);
    }

    #[test]
    fn clearing_keeps_the_seen_set() {
        let mut tracker = NewIssueTracker::default();
        tracker.fold_in(&[issue("A")], true);
        tracker.fold_in(&[issue("B")], false);
        tracker.clear_highlights();
        assert!(!tracker.is_highlighted("B"));

        // B stays known: it does not re-highlight on the next fold
        let new = tracker.fold_in(&[issue("B")], false);
        assert!(new.is_empty());
    }

    #[test]
    fn ids_are_new_regardless_of_view() {
        // The seen-set spans views: an id first observed in one view is
        // not new when it later appears in another.
        let mut tracker = NewIssueTracker::default();
        tracker.fold_in(&[issue("A")], true);
        tracker.fold_in(&[issue("X")], false);
        let new = tracker.fold_in(&[issue("X"), issue("A")], false);
        assert!(new.is_empty());
    }
}
