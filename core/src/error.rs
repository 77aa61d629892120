//! `CheckError` — Everything that can make an element query fail
//!
//! All failures are terminal for the query that produced them. Each variant
//! carries enough context (pattern, expected value or criteria, the full
//! snapshot) to diagnose a mismatch without re-running the test.

use crate::{FlatState, ValueCriteria, SENTINEL};
use std::fmt;

/// Why a pattern string was rejected by [`AttributePattern::parse`](crate::AttributePattern::parse).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternFault {
    /// The last segment is not the wildcard sentinel.
    MissingSentinel,
    /// The sentinel appears before the last segment.
    InteriorSentinel {
        /// Zero-based segment index of the misplaced sentinel.
        position: usize,
    },
}

impl fmt::Display for PatternFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSentinel => {
                write!(f, "does not end with the special value \"{SENTINEL}\"")
            }
            Self::InteriorSentinel { position } => write!(
                f,
                "uses \"{SENTINEL}\" at segment {position}; only the last segment may be a wildcard"
            ),
        }
    }
}

/// What an element query was looking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    /// A scalar element equal to this value.
    Value(String),
    /// A nested element satisfying every non-empty criterion.
    Criteria(ValueCriteria),
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "value {v:?}"),
            Self::Criteria(c) => write!(f, "nested attrs {c}"),
        }
    }
}

/// Errors from pattern parsing, state resolution, and element matching.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    /// The attribute pattern is malformed.
    #[error("{pattern:?} {fault}")]
    InvalidPattern {
        /// The pattern as supplied.
        pattern: String,
        /// What is wrong with it.
        fault: PatternFault,
    },

    /// The state provider has no resource by that name.
    #[error("not found: {resource} in {module}")]
    ResourceNotFound {
        /// The requested resource name.
        resource: String,
        /// The module path that was searched.
        module: String,
    },

    /// The resource exists but has no primary instance.
    #[error("no primary instance: {resource} in {module}")]
    InstanceNotFound {
        /// The requested resource name.
        resource: String,
        /// The module path that was searched.
        module: String,
    },

    /// Every criterion has an empty expected value.
    #[error("{criteria} has no non-empty values")]
    EmptyCriteria {
        /// The criteria as supplied.
        criteria: ValueCriteria,
    },

    /// No element satisfied the query.
    #[error(
        "{}no element matching {pattern:?} with {expected} in state: {state}",
        resource_prefix(.resource)
    )]
    ElementNotFound {
        /// The resource the snapshot belongs to, when known.
        resource: Option<String>,
        /// The pattern that was searched.
        pattern: String,
        /// The value or criteria that no element satisfied.
        expected: Expected,
        /// The full snapshot that was searched.
        state: FlatState,
    },
}

fn resource_prefix(resource: &Option<String>) -> String {
    resource
        .as_ref()
        .map(|r| format!("{r:?} "))
        .unwrap_or_default()
}

impl CheckError {
    /// The field-less kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPattern { .. } => ErrorKind::InvalidPattern,
            Self::ResourceNotFound { .. } => ErrorKind::ResourceNotFound,
            Self::InstanceNotFound { .. } => ErrorKind::InstanceNotFound,
            Self::EmptyCriteria { .. } => ErrorKind::EmptyCriteria,
            Self::ElementNotFound { .. } => ErrorKind::ElementNotFound,
        }
    }

    /// Attach the resource name to an [`ElementNotFound`](Self::ElementNotFound)
    /// that was raised by a snapshot-level matcher. Other variants pass through.
    #[must_use]
    pub fn with_resource(self, name: impl fmt::Display) -> Self {
        match self {
            Self::ElementNotFound {
                resource: None,
                pattern,
                expected,
                state,
            } => Self::ElementNotFound {
                resource: Some(name.to_string()),
                pattern,
                expected,
                state,
            },
            other => other,
        }
    }
}

/// Discriminant of [`CheckError`], used by fixtures and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ErrorKind {
    /// See [`CheckError::InvalidPattern`].
    InvalidPattern,
    /// See [`CheckError::ResourceNotFound`].
    ResourceNotFound,
    /// See [`CheckError::InstanceNotFound`].
    InstanceNotFound,
    /// See [`CheckError::EmptyCriteria`].
    EmptyCriteria,
    /// See [`CheckError::ElementNotFound`].
    ElementNotFound,
}

impl ErrorKind {
    /// Snake-case name, identical to the serialized form.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidPattern => "invalid_pattern",
            Self::ResourceNotFound => "resource_not_found",
            Self::InstanceNotFound => "instance_not_found",
            Self::EmptyCriteria => "empty_criteria",
            Self::ElementNotFound => "element_not_found",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
