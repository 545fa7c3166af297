//! User-local follow-up flags on issue keys.

use indexmap::IndexSet;

/// Insertion-ordered set of flagged issue keys.
///
/// Independent of cache contents: a flag on a key that has dropped out of
/// every result set is retained (and invisible) until the key reappears.
#[derive(Debug, Default)]
pub struct FlaggedKeys {
    keys: IndexSet<String>,
}

impl FlaggedKeys {
    pub fn from_list(keys: Vec<String>) -> Self {
        FlaggedKeys {
            keys: keys.into_iter().collect(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Toggle a key; returns true when the key is now flagged.
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.keys.shift_remove(key) {
            false
        } else {
            self.keys.insert(key.to_string());
            true
        }
    }

    /// Flags in insertion order, for persistence.
    pub fn to_list(&self) -> Vec<String> {
        self.keys.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_membership() {
        let mut flags = FlaggedKeys::default();
        assert!(flags.toggle("P-1"));
        assert!(flags.contains("P-1"));
        assert!(!flags.toggle("P-1"));
        assert!(!flags.contains("P-1"));
    }

    #[test]
    fn list_preserves_insertion_order() {
        let mut flags = FlaggedKeys::from_list(vec!["P-2".into(), "P-1".into()]);
        flags.toggle("P-9");
        assert_eq!(flags.to_list(), vec!["P-2", "P-1", "P-9"]);
    }
}
