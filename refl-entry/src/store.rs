//! In-memory entry list
//!
//! Process-lifetime store owned by the application state and injected
//! into handlers - deliberately not a module-level global. Entries are
//! addressed by position, matching the rendered table rows.

use std::sync::RwLock;

/// A single user entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub first: String,
    pub last: String,
}

/// Positional, append/delete-only entry list
#[derive(Debug, Default)]
pub struct EntryStore {
    entries: RwLock<Vec<Entry>>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry when both names are non-empty; returns whether it
    /// was added.
    pub fn add(&self, first: &str, last: &str) -> bool {
        if first.is_empty() || last.is_empty() {
            return false;
        }
        self.entries.write().unwrap().push(Entry {
            first: first.to_string(),
            last: last.to_string(),
        });
        true
    }

    /// Remove the entry at `index`. An out-of-range index is a no-op,
    /// not an error.
    pub fn remove(&self, index: usize) {
        let mut entries = self.entries.write().unwrap();
        if index < entries.len() {
            entries.remove(index);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the current entries, in insertion order.
    pub fn snapshot(&self) -> Vec<Entry> {
        self.entries.read().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_then_delete_leaves_empty_list() {
        let store = EntryStore::new();
        assert!(store.add("Jane", "Doe"));
        assert_eq!(store.len(), 1);

        store.remove(0);
        assert!(store.is_empty());
    }

    #[test]
    fn out_of_range_delete_is_a_noop() {
        let store = EntryStore::new();
        store.add("Jane", "Doe");

        store.remove(5);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn blank_names_are_not_added() {
        let store = EntryStore::new();
        assert!(!store.add("", "Doe"));
        assert!(!store.add("Jane", ""));
        assert!(store.is_empty());
    }

    #[test]
    fn delete_shifts_later_entries_down() {
        let store = EntryStore::new();
        store.add("Jane", "Doe");
        store.add("John", "Smith");

        store.remove(0);
        let entries = store.snapshot();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].first, "John");
    }
}
