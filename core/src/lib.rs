//! flatmatch - Set and list element matching over flattened state
//!
//! Infrastructure state stores nested collections as flat key/value pairs:
//! an unordered set of ingress rules becomes `ingress.1234.from_port = "80"`,
//! `ingress.1234.protocol = "tcp"`, and so on, with a synthetic element id in
//! place of a position. Asserting "this set contains such an element" means
//! searching those keys through a wildcarded path.
//!
//! # Architecture
//!
//! - [`AttributePattern`] — `ingress.*`, parsed once per query into
//!   [`Segment::Literal`]s and a trailing [`Segment::Wildcard`]
//! - [`FlatState`] — the flattened snapshot of one resource instance
//! - [`match_scalar`] — some element equals a value
//! - [`match_nested`] — some element's nested attributes satisfy [`ValueCriteria`]
//! - [`StateProvider`] — resolves a [`ResourceRef`] to its [`FlatState`];
//!   [`State`] is the in-memory implementation
//! - [`match_scalar_element`] / [`match_nested_element`] — the resource-level
//!   queries; [`Check`] packages them as deferred assertions
//!
//! # Key Invariants
//!
//! 1. **Existential, order-free**: a query succeeds iff some key qualifies;
//!    iteration order of the snapshot never changes the outcome.
//!
//! 2. **Per-element counting**: nested confirmations are tallied per element
//!    id, so attributes of different elements never combine into a match.
//!
//! 3. **Empty values never confirm**: criteria with `""` values do not count
//!    toward a match, and a criteria set with none non-empty is rejected.
//!
//! # Example
//!
//! ```
//! use flatmatch::prelude::*;
//!
//! let sg = ResourceRef::new("aws_security_group.web");
//! let state = State::new().with_resource(
//!     &sg,
//!     ResourceState::with_attributes(
//!         "sg-0a1b",
//!         FlatState::new()
//!             .with("ingress.#", "2")
//!             .with("ingress.3102.from_port", "80")
//!             .with("ingress.3102.protocol", "tcp")
//!             .with("ingress.7749.from_port", "443")
//!             .with("ingress.7749.protocol", "tcp"),
//!     ),
//! );
//!
//! let https = ValueCriteria::new().with("from_port", "443").with("protocol", "tcp");
//! assert!(match_nested_element(&state, &sg, "ingress.*", &https).is_ok());
//!
//! let ssh = ValueCriteria::new().with("from_port", "22");
//! let err = match_nested_element(&state, &sg, "ingress.*", &ssh).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::ElementNotFound);
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod check;
mod criteria;
mod error;
mod flat_state;
mod nested;
mod path;
mod scalar;
mod state;
mod trace;

#[cfg(feature = "serde")]
mod config;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use criteria::ValueCriteria;
pub use error::{CheckError, ErrorKind, Expected, PatternFault};
pub use flat_state::FlatState;
pub use path::{AttributePattern, Segment};

// Matchers
pub use nested::{check_nested, match_nested};
pub use scalar::{check_scalar, match_scalar};

// State provider
pub use state::{
    InstanceState, ModuleState, ParseResourceRefError, ResourceRef, ResourceState, State,
    StateProvider,
};

// Checks
pub use check::{
    match_nested_element, match_scalar_element, run_checks, Check, CheckOutcome,
    NestedElementCheck, ScalarElementCheck,
};

// Trace types
pub use trace::{explain_nested, explain_scalar, KeyTrace, KeyVerdict, NestedTrace, ScalarTrace};

// Config (feature-gated)
#[cfg(feature = "serde")]
pub use config::{load_file, CheckConfig, ChecksConfig, ConfigError, Format};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use flatmatch::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Patterns and snapshots
        AttributePattern,
        // Checks
        Check,
        // Errors
        CheckError,
        ErrorKind,
        FlatState,
        // Operations
        match_nested,
        match_nested_element,
        match_scalar,
        match_scalar_element,
        NestedElementCheck,
        // State
        ResourceRef,
        ResourceState,
        ScalarElementCheck,
        State,
        StateProvider,
        ValueCriteria,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Pattern segment that stands for the element id.
pub const SENTINEL: &str = "*";

/// Joins field names and element ids in flattened keys.
pub const SEPARATOR: char = '.';

/// Path of the root module.
pub const ROOT_MODULE: &str = "root";
