//! `ValueCriteria` — Expected nested attributes of one collection element

use std::collections::HashMap;
use std::fmt;

/// Nested-attribute suffix → expected value, all of which must hold for the
/// same element id.
///
/// Suffixes are the key remainder after the element id, so for the state key
/// `ingress.1234.cidr_blocks.0` under pattern `ingress.*` the suffix is
/// `cidr_blocks.0`.
///
/// # Empty values
///
/// A criterion whose expected value is `""` never confirms a match. An
/// element where that attribute is absent and one where it is set to the
/// empty string are indistinguishable, so supply enough non-empty criteria to
/// single out the element you mean. A criteria set with no non-empty values
/// is rejected outright.
///
/// # Example
///
/// ```
/// use flatmatch::ValueCriteria;
///
/// let criteria = ValueCriteria::new()
///     .with("from_port", "80")
///     .with("description", "");
///
/// assert_eq!(criteria.len(), 2);
/// assert_eq!(criteria.required_count(), 1);
/// assert!(criteria.confirms("from_port", "80"));
/// assert!(!criteria.confirms("description", ""));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct ValueCriteria {
    values: HashMap<String, String>,
}

impl ValueCriteria {
    /// Create an empty criteria set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a criterion (builder pattern).
    #[must_use]
    pub fn with(mut self, suffix: impl Into<String>, expected: impl Into<String>) -> Self {
        self.values.insert(suffix.into(), expected.into());
        self
    }

    /// Expected value for a suffix, if any.
    #[must_use]
    pub fn get(&self, suffix: &str) -> Option<&str> {
        self.values.get(suffix).map(String::as_str)
    }

    /// Total number of criteria, empty-valued ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no criteria at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of criteria with a non-empty expected value. An element matches
    /// once this many criteria are confirmed for its id.
    #[must_use]
    pub fn required_count(&self) -> usize {
        self.values.values().filter(|v| !v.is_empty()).count()
    }

    /// Returns `true` if `suffix` names a non-empty criterion equal to `value`.
    #[inline]
    #[must_use]
    pub fn confirms(&self, suffix: &str, value: &str) -> bool {
        self.get(suffix)
            .is_some_and(|expected| !expected.is_empty() && expected == value)
    }

    /// Iterate criteria in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<HashMap<String, String>> for ValueCriteria {
    fn from(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ValueCriteria {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl fmt::Display for ValueCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable();
        f.write_str("{")?;
        for (i, (suffix, expected)) in entries.into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{suffix:?}: {expected:?}")?;
        }
        f.write_str("}")
    }
}
