//! The smuggled navigation payload
//!
//! Parameters extracted from locations are carried across navigation and
//! scan boundaries: keys are only ever added or overwritten, never cleared,
//! for the lifetime of the router.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A mapping from parameter name to string value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload {
    entries: HashMap<String, String>,
}

impl Payload {
    /// Create an empty payload
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or overwrite a key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }

    /// Check whether a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Merge another payload into this one, overwriting on key collision.
    /// Keys are never removed.
    pub fn merge(&mut self, other: &Payload) {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Payload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overwrites_on_collision() {
        let mut payload = Payload::from_iter([("id", "1"), ("tab", "main")]);
        let newer = Payload::from_iter([("id", "2")]);

        payload.merge(&newer);

        assert_eq!(payload.get("id"), Some("2"));
        assert_eq!(payload.get("tab"), Some("main"));
        assert_eq!(payload.len(), 2);
    }

    #[test]
    fn test_merge_never_removes() {
        let mut payload = Payload::from_iter([("id", "1")]);
        payload.merge(&Payload::new());
        assert_eq!(payload.get("id"), Some("1"));
    }
}
