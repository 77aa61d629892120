//! Resource-level element checks
//!
//! The two exposed query operations resolve a resource through a
//! [`StateProvider`] and run the matching engine over its attributes.
//! [`Check`] packages the same queries as values that can be built up front
//! (validating patterns at construction) and evaluated later, possibly many
//! times, against any provider.

use crate::nested::{check_nested, require_criteria};
use crate::scalar::check_scalar;
use crate::{
    match_nested, match_scalar, AttributePattern, CheckError, ResourceRef, StateProvider,
    ValueCriteria,
};
use std::fmt;
use tracing::debug;

/// Assert that the collection at `pattern` on `resource` contains `expected`.
///
/// Resolves the resource first, then parses the pattern, then scans.
///
/// # Errors
///
/// [`CheckError::ResourceNotFound`], [`CheckError::InstanceNotFound`],
/// [`CheckError::InvalidPattern`] or [`CheckError::ElementNotFound`], in that
/// order of precedence.
///
/// # Example
///
/// ```
/// use flatmatch::{match_scalar_element, FlatState, ResourceRef, ResourceState, State};
///
/// let sg = ResourceRef::new("aws_security_group.web");
/// let state = State::new().with_resource(
///     &sg,
///     ResourceState::with_attributes(
///         "sg-123",
///         FlatState::new().with("ingress.0.cidr_blocks.0", "10.0.0.0/8"),
///     ),
/// );
///
/// assert!(match_scalar_element(&state, &sg, "ingress.0.cidr_blocks.*", "10.0.0.0/8").is_ok());
/// ```
pub fn match_scalar_element<P: StateProvider + ?Sized>(
    provider: &P,
    resource: &ResourceRef,
    pattern: &str,
    expected: &str,
) -> Result<(), CheckError> {
    let attributes = provider.attributes(resource)?;
    match_scalar(attributes, pattern, expected).map_err(|e| e.with_resource(resource))
}

/// Assert that the collection at `pattern` on `resource` contains one element
/// whose nested attributes satisfy `criteria`.
///
/// Resolves the resource first, then parses the pattern, then checks the
/// criteria, then scans.
///
/// # Errors
///
/// [`CheckError::ResourceNotFound`], [`CheckError::InstanceNotFound`],
/// [`CheckError::InvalidPattern`], [`CheckError::EmptyCriteria`] or
/// [`CheckError::ElementNotFound`], in that order of precedence.
pub fn match_nested_element<P: StateProvider + ?Sized>(
    provider: &P,
    resource: &ResourceRef,
    pattern: &str,
    criteria: &ValueCriteria,
) -> Result<(), CheckError> {
    let attributes = provider.attributes(resource)?;
    match_nested(attributes, pattern, criteria).map_err(|e| e.with_resource(resource))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Check values
// ═══════════════════════════════════════════════════════════════════════════════

/// A deferred assertion against a state provider.
///
/// `Display` renders a one-line description for reports.
pub trait Check: Send + Sync + fmt::Debug + fmt::Display {
    /// Evaluate this check.
    ///
    /// # Errors
    ///
    /// Any [`CheckError`] raised while resolving the resource or matching.
    fn check(&self, provider: &dyn StateProvider) -> Result<(), CheckError>;
}

/// [`match_scalar_element`] with the pattern parsed up front.
#[derive(Debug, Clone)]
pub struct ScalarElementCheck {
    resource: ResourceRef,
    pattern: AttributePattern,
    expected: String,
}

impl ScalarElementCheck {
    /// Build a scalar element check.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::InvalidPattern`] if `pattern` is malformed.
    pub fn new(
        resource: ResourceRef,
        pattern: &str,
        expected: impl Into<String>,
    ) -> Result<Self, CheckError> {
        Ok(Self {
            resource,
            pattern: AttributePattern::parse(pattern)?,
            expected: expected.into(),
        })
    }
}

impl Check for ScalarElementCheck {
    fn check(&self, provider: &dyn StateProvider) -> Result<(), CheckError> {
        let attributes = provider.attributes(&self.resource)?;
        check_scalar(attributes, &self.pattern, &self.expected)
            .map_err(|e| e.with_resource(&self.resource))
    }
}

impl fmt::Display for ScalarElementCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} contains {:?}",
            self.resource, self.pattern, self.expected
        )
    }
}

/// [`match_nested_element`] with the pattern and criteria validated up front.
#[derive(Debug, Clone)]
pub struct NestedElementCheck {
    resource: ResourceRef,
    pattern: AttributePattern,
    criteria: ValueCriteria,
}

impl NestedElementCheck {
    /// Build a nested element check.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::InvalidPattern`] if `pattern` is malformed, or
    /// [`CheckError::EmptyCriteria`] if no criterion has a non-empty value.
    pub fn new(
        resource: ResourceRef,
        pattern: &str,
        criteria: ValueCriteria,
    ) -> Result<Self, CheckError> {
        let pattern = AttributePattern::parse(pattern)?;
        require_criteria(&criteria)?;
        Ok(Self {
            resource,
            pattern,
            criteria,
        })
    }
}

impl Check for NestedElementCheck {
    fn check(&self, provider: &dyn StateProvider) -> Result<(), CheckError> {
        let attributes = provider.attributes(&self.resource)?;
        check_nested(attributes, &self.pattern, &self.criteria)
            .map_err(|e| e.with_resource(&self.resource))
    }
}

impl fmt::Display for NestedElementCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} has element {}",
            self.resource, self.pattern, self.criteria
        )
    }
}

/// The result of one check in a batch.
#[derive(Debug)]
pub struct CheckOutcome {
    /// The check's `Display` description.
    pub description: String,
    /// What the check returned.
    pub result: Result<(), CheckError>,
}

impl CheckOutcome {
    /// Returns `true` if the check succeeded.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

/// Evaluate every check, without stopping at the first failure.
pub fn run_checks(checks: &[Box<dyn Check>], provider: &dyn StateProvider) -> Vec<CheckOutcome> {
    checks
        .iter()
        .map(|check| {
            let result = check.check(provider);
            debug!(check = %check, passed = result.is_ok(), "check evaluated");
            CheckOutcome {
                description: check.to_string(),
                result,
            }
        })
        .collect()
}
