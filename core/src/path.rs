//! `AttributePattern` — Wildcarded paths into flattened state
//!
//! A pattern like `ingress.*` addresses the elements of the `ingress`
//! collection: literal segments must match the state key exactly, and the
//! trailing `*` stands for the element id. Patterns are parsed once per
//! query and compared positionally against the split state keys.

use crate::{CheckError, PatternFault, SENTINEL, SEPARATOR};
use std::fmt;
use std::str::FromStr;

/// One segment of an [`AttributePattern`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Must equal the state-key segment exactly.
    Literal(String),
    /// Matches any single state-key segment.
    Wildcard,
}

impl Segment {
    fn parse(segment: &str) -> Self {
        if segment == SENTINEL {
            Self::Wildcard
        } else {
            Self::Literal(segment.to_owned())
        }
    }

    /// Returns `true` if this segment accepts the given state-key segment.
    #[inline]
    #[must_use]
    pub fn matches(&self, segment: &str) -> bool {
        match self {
            Self::Literal(literal) => literal == segment,
            Self::Wildcard => true,
        }
    }

    /// Returns `true` for [`Segment::Wildcard`].
    #[inline]
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(literal) => f.write_str(literal),
            Self::Wildcard => f.write_str(SENTINEL),
        }
    }
}

/// A dot-separated attribute path ending in the wildcard sentinel.
///
/// # INV: exactly one wildcard, in last position
///
/// [`parse`](Self::parse) rejects any pattern whose last segment is not `*`,
/// and any pattern with a `*` before the last segment. The wildcard therefore
/// always marks the element-id position.
///
/// # Example
///
/// ```
/// use flatmatch::{AttributePattern, Segment};
///
/// let pattern = AttributePattern::parse("ingress.*").unwrap();
/// assert_eq!(pattern.segment_count(), 2);
/// assert_eq!(pattern.id_position(), 1);
/// assert_eq!(pattern.segments()[0], Segment::Literal("ingress".into()));
///
/// assert!(AttributePattern::parse("ingress.0").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl AttributePattern {
    /// Parse and validate a pattern string.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::InvalidPattern`] if the last segment is not the
    /// sentinel, or if the sentinel appears anywhere else.
    pub fn parse(pattern: &str) -> Result<Self, CheckError> {
        let segments: Vec<Segment> = pattern.split(SEPARATOR).map(Segment::parse).collect();

        let invalid = |fault| CheckError::InvalidPattern {
            pattern: pattern.to_owned(),
            fault,
        };

        let Some((last, leading)) = segments.split_last() else {
            return Err(invalid(PatternFault::MissingSentinel));
        };
        if !last.is_wildcard() {
            return Err(invalid(PatternFault::MissingSentinel));
        }
        if let Some(position) = leading.iter().position(Segment::is_wildcard) {
            return Err(invalid(PatternFault::InteriorSentinel { position }));
        }

        Ok(Self {
            raw: pattern.to_owned(),
            segments,
        })
    }

    /// The pattern as originally written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed segments, wildcard last.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments, including the wildcard.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Index of the element-id segment (always the last one).
    #[must_use]
    pub fn id_position(&self) -> usize {
        self.segments.len() - 1
    }

    /// Returns `true` if the leading key segments satisfy every pattern segment
    /// position-for-position. Keys shorter than the pattern never match.
    #[must_use]
    pub fn matches_prefix(&self, key_segments: &[&str]) -> bool {
        key_segments.len() >= self.segments.len()
            && self
                .segments
                .iter()
                .zip(key_segments)
                .all(|(segment, key)| segment.matches(key))
    }
}

impl FromStr for AttributePattern {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AttributePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// How a single state key relates to a query. Shared by the matchers and
/// their traces so both classify keys identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict<'k> {
    /// Too few (or, for scalars, too many) segments.
    WrongLength,
    /// A literal segment differs.
    PathMismatch,
    /// Path matched but the value does not confirm anything.
    ValueMismatch,
    /// Confirms the element with this id.
    Hit(&'k str),
}
