//! Evaluation traces for debugging element queries.
//!
//! Traces run the same per-key classification as the matchers but scan the
//! whole snapshot (no early exit) and record what happened to every key.
//! Use them to see why an expected element was not found.
//!
//! # INV: `matched()` == matcher result
//!
//! [`ScalarTrace::matched`] is `true` exactly when
//! [`check_scalar`](crate::check_scalar) succeeds for the same inputs, and
//! likewise for [`NestedTrace`] and [`check_nested`](crate::check_nested).
//!
//! # Example
//!
//! ```
//! use flatmatch::{explain_nested, FlatState, KeyVerdict, ValueCriteria};
//!
//! let state = FlatState::new()
//!     .with("set.0.name", "a")
//!     .with("set.1.port", "80");
//! let criteria = ValueCriteria::new().with("name", "a").with("port", "80");
//!
//! let trace = explain_nested(&state, "set.*", &criteria).unwrap();
//! assert!(!trace.matched());
//! assert_eq!(trace.confirmations["0"], 1);
//! assert_eq!(trace.confirmations["1"], 1);
//! assert_eq!(trace.keys[0].verdict, KeyVerdict::Counted { id: "0".into() });
//! ```

use crate::nested::{nested_verdict, require_criteria};
use crate::path::Verdict;
use crate::scalar::scalar_verdict;
use crate::{AttributePattern, CheckError, FlatState, ValueCriteria};
use std::collections::BTreeMap;
use std::fmt;

/// What happened to one state key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyVerdict {
    /// Segment count cannot hold an element at the wildcard position.
    WrongLength,
    /// A literal segment differs from the pattern.
    PathMismatch,
    /// Path matched but the value confirmed nothing.
    ValueMismatch,
    /// Confirmed the element with this id.
    Counted {
        /// Element id at the wildcard position.
        id: String,
    },
}

impl From<Verdict<'_>> for KeyVerdict {
    fn from(verdict: Verdict<'_>) -> Self {
        match verdict {
            Verdict::WrongLength => Self::WrongLength,
            Verdict::PathMismatch => Self::PathMismatch,
            Verdict::ValueMismatch => Self::ValueMismatch,
            Verdict::Hit(id) => Self::Counted { id: id.to_owned() },
        }
    }
}

impl fmt::Display for KeyVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongLength => f.write_str("wrong length"),
            Self::PathMismatch => f.write_str("path mismatch"),
            Self::ValueMismatch => f.write_str("value mismatch"),
            Self::Counted { id } => write!(f, "counted for element {id:?}"),
        }
    }
}

/// One key's classification in a trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTrace {
    /// The flattened state key.
    pub key: String,
    /// Its value.
    pub value: String,
    /// How it was classified.
    pub verdict: KeyVerdict,
}

fn trace_keys<'s>(
    state: &'s FlatState,
    mut classify: impl FnMut(&'s str, &'s str) -> Verdict<'s>,
) -> Vec<KeyTrace> {
    state
        .sorted()
        .into_iter()
        .map(|(key, value)| KeyTrace {
            key: key.to_owned(),
            value: value.to_owned(),
            verdict: classify(key, value).into(),
        })
        .collect()
}

/// Trace of a scalar element query.
#[derive(Debug, Clone)]
pub struct ScalarTrace {
    /// The pattern searched.
    pub pattern: String,
    /// The value searched for.
    pub expected: String,
    /// Every key, sorted, with its verdict.
    pub keys: Vec<KeyTrace>,
}

impl ScalarTrace {
    /// Ids of every element equal to the expected value.
    #[must_use]
    pub fn matching_ids(&self) -> Vec<&str> {
        self.keys
            .iter()
            .filter_map(|k| match &k.verdict {
                KeyVerdict::Counted { id } => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether the query succeeds.
    #[must_use]
    pub fn matched(&self) -> bool {
        !self.matching_ids().is_empty()
    }
}

/// Trace a scalar element query over the whole snapshot.
///
/// # Errors
///
/// Returns [`CheckError::InvalidPattern`] if `pattern` is malformed.
pub fn explain_scalar(
    state: &FlatState,
    pattern: &str,
    expected: &str,
) -> Result<ScalarTrace, CheckError> {
    let parsed = AttributePattern::parse(pattern)?;
    let keys = trace_keys(state, |key, value| {
        scalar_verdict(key, value, &parsed, expected)
    });
    Ok(ScalarTrace {
        pattern: pattern.to_owned(),
        expected: expected.to_owned(),
        keys,
    })
}

/// Trace of a nested element query.
#[derive(Debug, Clone)]
pub struct NestedTrace {
    /// The pattern searched.
    pub pattern: String,
    /// The criteria searched for.
    pub criteria: ValueCriteria,
    /// Confirmations an element needs (non-empty criteria count).
    pub required: usize,
    /// Every key, sorted, with its verdict.
    pub keys: Vec<KeyTrace>,
    /// Confirmations per element id.
    pub confirmations: BTreeMap<String, usize>,
}

impl NestedTrace {
    /// Ids of every element that confirmed all non-empty criteria.
    #[must_use]
    pub fn matching_ids(&self) -> Vec<&str> {
        self.confirmations
            .iter()
            .filter(|&(_, &count)| count >= self.required)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Whether the query succeeds.
    #[must_use]
    pub fn matched(&self) -> bool {
        !self.matching_ids().is_empty()
    }
}

/// Trace a nested element query over the whole snapshot.
///
/// # Errors
///
/// Returns [`CheckError::InvalidPattern`] or [`CheckError::EmptyCriteria`],
/// exactly as [`match_nested`](crate::match_nested) would.
pub fn explain_nested(
    state: &FlatState,
    pattern: &str,
    criteria: &ValueCriteria,
) -> Result<NestedTrace, CheckError> {
    let parsed = AttributePattern::parse(pattern)?;
    let required = require_criteria(criteria)?;

    let keys = trace_keys(state, |key, value| {
        nested_verdict(key, value, &parsed, criteria)
    });

    let mut confirmations = BTreeMap::new();
    for key in &keys {
        if let KeyVerdict::Counted { id } = &key.verdict {
            *confirmations.entry(id.clone()).or_insert(0) += 1;
        }
    }

    Ok(NestedTrace {
        pattern: pattern.to_owned(),
        criteria: criteria.clone(),
        required,
        keys,
        confirmations,
    })
}
