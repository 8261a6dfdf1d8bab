//! Bounded, deduplicated, most-recent-first lists.

use serde::{Deserialize, Serialize};

/// An entry of a [`BoundedList`], identified by a textual key.
pub trait BoundedEntry {
    /// The key compared (ignoring case) for deduplication.
    fn key(&self) -> &str;
}

/// A list capped at a fixed size, most recent entry first, holding no two
/// entries whose keys are equal ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundedList<E> {
    entries: Vec<E>,
}

impl<E> Default for BoundedList<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

fn same_key(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

impl<E: BoundedEntry> BoundedList<E> {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `entry` at the front, removing any entry with the same key
    /// (ignoring case), then truncates to `cap`.
    ///
    /// The new entry replaces the old one, so the most recent casing wins.
    pub fn upsert_front(&mut self, entry: E, cap: usize) {
        self.entries
            .retain(|existing| !same_key(existing.key(), entry.key()));
        self.entries.insert(0, entry);
        self.entries.truncate(cap);
    }

    /// Removes the entry matching `key` (ignoring case). Returns whether
    /// an entry was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|existing| !same_key(existing.key(), key));
        self.entries.len() != before
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Restores the invariants on a list read from storage: drops later
    /// duplicates and truncates to `cap`.
    pub fn enforce(&mut self, cap: usize) {
        let mut kept: Vec<E> = Vec::with_capacity(self.entries.len().min(cap));
        for entry in self.entries.drain(..) {
            if kept.len() == cap {
                break;
            }
            if !kept.iter().any(|k| same_key(k.key(), entry.key())) {
                kept.push(entry);
            }
        }
        self.entries = kept;
    }

    /// Entries, most recent first.
    #[must_use]
    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    /// Keys, most recent first.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(BoundedEntry::key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Key(String);

    impl BoundedEntry for Key {
        fn key(&self) -> &str {
            &self.0
        }
    }

    fn list(keys: &[&str], cap: usize) -> BoundedList<Key> {
        let mut list = BoundedList::new();
        for key in keys.iter().rev() {
            list.upsert_front(Key((*key).into()), cap);
        }
        list
    }

    fn keys(list: &BoundedList<Key>) -> Vec<&str> {
        list.keys().collect()
    }

    #[test]
    fn duplicate_moves_to_front_with_new_casing() {
        let mut history = list(&["Peru", "Chile"], 10);
        assert_eq!(keys(&history), ["Peru", "Chile"]);

        history.upsert_front(Key("peru".into()), 10);
        assert_eq!(keys(&history), ["peru", "Chile"]);

        history.upsert_front(Key("CHILE".into()), 10);
        assert_eq!(keys(&history), ["CHILE", "peru"]);
    }

    #[test]
    fn truncates_oldest() {
        let mut history = list(&["c", "b", "a"], 3);
        history.upsert_front(Key("d".into()), 3);
        assert_eq!(keys(&history), ["d", "c", "b"]);
    }

    #[test]
    fn remove_ignores_case() {
        let mut history = list(&["Peru", "Chile"], 10);
        assert!(history.remove("PERU"));
        assert!(!history.remove("peru"));
        assert_eq!(keys(&history), ["Chile"]);

        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn enforce_repairs_loaded_list() {
        let mut loaded: BoundedList<Key> =
            serde_json::from_str(r#"["a", "B", "b", "c", "d"]"#).unwrap();
        loaded.enforce(3);
        assert_eq!(keys(&loaded), ["a", "B", "c"]);
    }

    #[test]
    fn serializes_as_plain_array() {
        let history = list(&["x", "y"], 10);
        assert_eq!(serde_json::to_string(&history).unwrap(), r#"["x","y"]"#);
    }

    proptest! {
        #[test]
        fn upsert_keeps_invariants(
            inserts in prop::collection::vec("[a-cA-C]{1,2}", 0..60),
            cap in 1usize..12,
        ) {
            let mut list = BoundedList::new();
            for key in &inserts {
                list.upsert_front(Key(key.clone()), cap);

                prop_assert!(list.len() <= cap);
                prop_assert_eq!(list.keys().next(), Some(key.as_str()));

                let lowered: Vec<String> = list.keys().map(str::to_lowercase).collect();
                let mut unique = lowered.clone();
                unique.sort();
                unique.dedup();
                prop_assert_eq!(unique.len(), lowered.len());
            }
        }
    }
}
