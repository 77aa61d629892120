//! `FlatState` — A flattened attribute snapshot
//!
//! Nested collections are stored as single-level keys joined with `.`:
//! `ingress.1234.from_port = "80"`. Entry order carries no meaning and no
//! matcher depends on it.

use std::collections::HashMap;
use std::fmt;

/// Flattened key → scalar value map for one resource instance.
///
/// # Example
///
/// ```
/// use flatmatch::FlatState;
///
/// let state = FlatState::new()
///     .with("ingress.#", "1")
///     .with("ingress.0.from_port", "80");
///
/// assert_eq!(state.get("ingress.0.from_port"), Some("80"));
/// assert_eq!(state.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct FlatState {
    attributes: HashMap<String, String>,
}

impl FlatState {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry (builder pattern).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert an entry, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Look up a value by its full flattened key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterate entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries sorted by key, for deterministic output.
    #[must_use]
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable();
        entries
    }
}

impl From<HashMap<String, String>> for FlatState {
    fn from(attributes: HashMap<String, String>) -> Self {
        Self { attributes }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FlatState {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            attributes: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl fmt::Display for FlatState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.sorted().into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key:?}: {value:?}")?;
        }
        f.write_str("}")
    }
}
