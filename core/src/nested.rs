//! Nested attribute element matching
//!
//! Checks that a set or list of records contains one element whose nested
//! attributes satisfy every non-empty criterion. Confirmations are counted
//! per element id, so partial matches on different elements never add up to
//! a false positive.

use crate::path::Verdict;
use crate::{AttributePattern, CheckError, Expected, FlatState, ValueCriteria, SEPARATOR};
use std::collections::HashMap;
use tracing::debug;

/// Find an element of the collection addressed by `pattern` whose nested
/// attributes satisfy `criteria`.
///
/// # Errors
///
/// - [`CheckError::InvalidPattern`] if `pattern` does not end in `*`
/// - [`CheckError::EmptyCriteria`] if no criterion has a non-empty value
///   (checked before scanning, whatever the state holds)
/// - [`CheckError::ElementNotFound`] if no single element id confirms every
///   non-empty criterion
///
/// # Example
///
/// ```
/// use flatmatch::{match_nested, FlatState, ValueCriteria};
///
/// let state = FlatState::new()
///     .with("ingress.#", "2")
///     .with("ingress.1111.protocol", "tcp")
///     .with("ingress.1111.from_port", "80")
///     .with("ingress.2222.protocol", "udp")
///     .with("ingress.2222.from_port", "53");
///
/// let http = ValueCriteria::new().with("protocol", "tcp").with("from_port", "80");
/// assert!(match_nested(&state, "ingress.*", &http).is_ok());
///
/// // tcp on one element and 53 on another is not a match
/// let mixed = ValueCriteria::new().with("protocol", "tcp").with("from_port", "53");
/// assert!(match_nested(&state, "ingress.*", &mixed).is_err());
/// ```
pub fn match_nested(
    state: &FlatState,
    pattern: &str,
    criteria: &ValueCriteria,
) -> Result<(), CheckError> {
    let pattern = AttributePattern::parse(pattern)?;
    check_nested(state, &pattern, criteria)
}

/// [`match_nested`] over an already-parsed pattern.
///
/// # Errors
///
/// Returns [`CheckError::EmptyCriteria`] or [`CheckError::ElementNotFound`]
/// as described on [`match_nested`].
pub fn check_nested(
    state: &FlatState,
    pattern: &AttributePattern,
    criteria: &ValueCriteria,
) -> Result<(), CheckError> {
    let required = require_criteria(criteria)?;

    match find_nested_element(state.iter(), pattern, criteria, required) {
        Some(id) => {
            debug!(pattern = %pattern, id, required, "nested element matched");
            Ok(())
        }
        None => {
            debug!(pattern = %pattern, required, keys = state.len(), "no nested element matched");
            Err(CheckError::ElementNotFound {
                resource: None,
                pattern: pattern.as_str().to_owned(),
                expected: Expected::Criteria(criteria.clone()),
                state: state.clone(),
            })
        }
    }
}

/// Number of confirmations an element needs, or [`CheckError::EmptyCriteria`].
pub(crate) fn require_criteria(criteria: &ValueCriteria) -> Result<usize, CheckError> {
    match criteria.required_count() {
        0 => Err(CheckError::EmptyCriteria {
            criteria: criteria.clone(),
        }),
        n => Ok(n),
    }
}

/// Scan entries, counting confirmations per element id, and return the first
/// id to reach `required`.
pub(crate) fn find_nested_element<'s, I>(
    entries: I,
    pattern: &AttributePattern,
    criteria: &ValueCriteria,
    required: usize,
) -> Option<&'s str>
where
    I: IntoIterator<Item = (&'s str, &'s str)>,
{
    let mut confirmed: HashMap<&'s str, usize> = HashMap::new();

    for (key, value) in entries {
        if let Verdict::Hit(id) = nested_verdict(key, value, pattern, criteria) {
            let count = confirmed.entry(id).or_insert(0);
            *count += 1;
            if *count == required {
                return Some(id);
            }
        }
    }

    None
}

/// Classify one state entry against a nested query.
///
/// The key is split into the pattern's segments plus an unsplit remainder,
/// which is the nested-attribute suffix looked up in `criteria`.
pub(crate) fn nested_verdict<'k>(
    key: &'k str,
    value: &str,
    pattern: &AttributePattern,
    criteria: &ValueCriteria,
) -> Verdict<'k> {
    let parts: Vec<&'k str> = key.splitn(pattern.segment_count() + 1, SEPARATOR).collect();
    // Need the element id plus at least one nested field.
    let Some((suffix, leading)) = parts.split_last() else {
        return Verdict::WrongLength;
    };
    if leading.len() != pattern.segment_count() {
        return Verdict::WrongLength;
    }
    if !pattern.matches_prefix(leading) {
        return Verdict::PathMismatch;
    }
    if !criteria.confirms(suffix, value) {
        return Verdict::ValueMismatch;
    }
    Verdict::Hit(leading[pattern.id_position()])
}
