//! Scalar element matching
//!
//! Checks that a set or list of primitive values contains a given value:
//! some key with exactly the pattern's segment count, whose literal segments
//! line up with the pattern, holds the expected value.

use crate::path::Verdict;
use crate::{AttributePattern, CheckError, Expected, FlatState, SEPARATOR};
use tracing::debug;

/// Find an element of the collection addressed by `pattern` equal to `expected`.
///
/// Existential: the outcome does not depend on iteration order, only on
/// whether any qualifying key exists.
///
/// # Errors
///
/// - [`CheckError::InvalidPattern`] if `pattern` does not end in `*`
///   (checked before any key is looked at)
/// - [`CheckError::ElementNotFound`] if no key qualifies
///
/// # Example
///
/// ```
/// use flatmatch::{match_scalar, FlatState};
///
/// let state = FlatState::new()
///     .with("security_groups.#", "2")
///     .with("security_groups.3311", "sg-web")
///     .with("security_groups.9042", "sg-db");
///
/// assert!(match_scalar(&state, "security_groups.*", "sg-db").is_ok());
/// assert!(match_scalar(&state, "security_groups.*", "sg-cache").is_err());
/// ```
pub fn match_scalar(state: &FlatState, pattern: &str, expected: &str) -> Result<(), CheckError> {
    let pattern = AttributePattern::parse(pattern)?;
    check_scalar(state, &pattern, expected)
}

/// [`match_scalar`] over an already-parsed pattern.
///
/// # Errors
///
/// Returns [`CheckError::ElementNotFound`] if no key qualifies.
pub fn check_scalar(
    state: &FlatState,
    pattern: &AttributePattern,
    expected: &str,
) -> Result<(), CheckError> {
    match find_scalar_element(state.iter(), pattern, expected) {
        Some(id) => {
            debug!(pattern = %pattern, expected, id, "scalar element matched");
            Ok(())
        }
        None => {
            debug!(pattern = %pattern, expected, keys = state.len(), "no scalar element matched");
            Err(CheckError::ElementNotFound {
                resource: None,
                pattern: pattern.as_str().to_owned(),
                expected: Expected::Value(expected.to_owned()),
                state: state.clone(),
            })
        }
    }
}

/// Scan entries and return the element id of the first qualifying key.
pub(crate) fn find_scalar_element<'s, I>(
    entries: I,
    pattern: &AttributePattern,
    expected: &str,
) -> Option<&'s str>
where
    I: IntoIterator<Item = (&'s str, &'s str)>,
{
    entries
        .into_iter()
        .find_map(|(key, value)| match scalar_verdict(key, value, pattern, expected) {
            Verdict::Hit(id) => Some(id),
            _ => None,
        })
}

/// Classify one state entry against a scalar query.
pub(crate) fn scalar_verdict<'k>(
    key: &'k str,
    value: &str,
    pattern: &AttributePattern,
    expected: &str,
) -> Verdict<'k> {
    let parts: Vec<&'k str> = key.split(SEPARATOR).collect();
    if parts.len() != pattern.segment_count() {
        return Verdict::WrongLength;
    }
    if !pattern.matches_prefix(&parts) {
        return Verdict::PathMismatch;
    }
    if value != expected {
        return Verdict::ValueMismatch;
    }
    Verdict::Hit(parts[pattern.id_position()])
}
