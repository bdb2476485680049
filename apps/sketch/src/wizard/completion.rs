use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// A resource ticked off in a given week. The same resource may appear in several weeks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletionKey {
    pub week: String,
    pub resource_id: String,
}

/// Checkmarks on the results screen. Display-only: never read by the presenter.
#[derive(Debug, Clone, Default)]
pub struct CompletionSet {
    keys: IndexSet<CompletionKey>,
}

impl CompletionSet {
    /// Flips the mark and returns whether the resource is now completed.
    pub fn toggle(&mut self, key: CompletionKey) -> bool {
        if self.keys.shift_remove(&key) {
            false
        } else {
            self.keys.insert(key);
            true
        }
    }

    #[cfg(test)]
    pub fn is_completed(&self, key: &CompletionKey) -> bool {
        self.keys.contains(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &CompletionKey> {
        self.keys.iter()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(week: &str, id: &str) -> CompletionKey {
        CompletionKey {
            week: week.to_string(),
            resource_id: id.to_string(),
        }
    }

    #[test]
    fn test_toggle_on_then_off() {
        let mut set = CompletionSet::default();
        assert!(set.toggle(key("1", "res_git_doc")));
        assert!(set.is_completed(&key("1", "res_git_doc")));
        assert!(!set.toggle(key("1", "res_git_doc")));
        assert!(!set.is_completed(&key("1", "res_git_doc")));
    }

    #[test]
    fn test_same_resource_tracked_per_week() {
        let mut set = CompletionSet::default();
        set.toggle(key("1", "res_ostep"));
        assert!(!set.is_completed(&key("2", "res_ostep")));
        set.toggle(key("2", "res_ostep"));
        assert_eq!(set.keys().count(), 2);
    }

    #[test]
    fn test_keys_in_toggle_order() {
        let mut set = CompletionSet::default();
        set.toggle(key("2", "b"));
        set.toggle(key("1", "a"));
        set.toggle(key("3", "c"));
        set.toggle(key("1", "a"));
        let weeks: Vec<&str> = set.keys().map(|k| k.week.as_str()).collect();
        assert_eq!(weeks, vec!["2", "3"]);
    }
}
