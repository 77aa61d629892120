//! Config types for declarative checks.
//!
//! These types mirror the runtime check types but are serde-deserializable,
//! so a list of assertions can live in a JSON or YAML file next to the state
//! it is run against.
//!
//! | Config type | Runtime type | Conversion |
//! |-------------|-------------|------------|
//! | [`CheckConfig::Scalar`] | [`ScalarElementCheck`] | [`CheckConfig::into_check()`] |
//! | [`CheckConfig::Nested`] | [`NestedElementCheck`] | [`CheckConfig::into_check()`] |
//! | [`ChecksConfig`] | `Vec<Box<dyn Check>>` | [`ChecksConfig::into_checks()`] |
//!
//! ```yaml
//! checks:
//!   - type: scalar
//!     resource: aws_security_group.web
//!     pattern: ingress.3102.cidr_blocks.*
//!     value: 10.0.0.0/8
//!   - type: nested
//!     resource: root.network:aws_security_group.db
//!     pattern: ingress.*
//!     criteria: { from_port: "5432", protocol: tcp }
//! ```

use crate::{
    match_nested_element, match_scalar_element, Check, CheckError, NestedElementCheck,
    ResourceRef, ScalarElementCheck, StateProvider, ValueCriteria,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One declarative element check.
///
/// Uses `#[serde(tag = "type")]`:
///
/// ```json
/// { "type": "scalar", "resource": "...", "pattern": "...", "value": "..." }
/// { "type": "nested", "resource": "...", "pattern": "...", "criteria": { ... } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckConfig {
    /// A scalar element check.
    Scalar {
        /// The resource whose attributes are searched.
        resource: ResourceRef,
        /// Attribute pattern ending in `*`.
        pattern: String,
        /// The element value to find.
        value: String,
    },
    /// A nested attribute element check.
    Nested {
        /// The resource whose attributes are searched.
        resource: ResourceRef,
        /// Attribute pattern ending in `*`.
        pattern: String,
        /// Nested attribute suffix → expected value.
        criteria: ValueCriteria,
    },
}

impl CheckConfig {
    /// Validate and convert to a runtime [`Check`].
    ///
    /// # Errors
    ///
    /// [`CheckError::InvalidPattern`] or [`CheckError::EmptyCriteria`].
    pub fn into_check(self) -> Result<Box<dyn Check>, CheckError> {
        Ok(match self {
            Self::Scalar {
                resource,
                pattern,
                value,
            } => Box::new(ScalarElementCheck::new(resource, &pattern, value)?),
            Self::Nested {
                resource,
                pattern,
                criteria,
            } => Box::new(NestedElementCheck::new(resource, &pattern, criteria)?),
        })
    }

    /// Evaluate directly through [`match_scalar_element`] or
    /// [`match_nested_element`], with their error precedence (resource
    /// resolution before pattern validation).
    ///
    /// # Errors
    ///
    /// Whatever the underlying operation returns.
    pub fn evaluate<P: StateProvider + ?Sized>(&self, provider: &P) -> Result<(), CheckError> {
        match self {
            Self::Scalar {
                resource,
                pattern,
                value,
            } => match_scalar_element(provider, resource, pattern, value),
            Self::Nested {
                resource,
                pattern,
                criteria,
            } => match_nested_element(provider, resource, pattern, criteria),
        }
    }
}

/// A file of checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksConfig {
    /// Checks, evaluated in order.
    #[serde(default)]
    pub checks: Vec<CheckConfig>,
}

impl ChecksConfig {
    /// Validate and convert every check.
    ///
    /// # Errors
    ///
    /// The first [`CheckError`] raised by [`CheckConfig::into_check`].
    pub fn into_checks(self) -> Result<Vec<Box<dyn Check>>, CheckError> {
        self.checks.into_iter().map(CheckConfig::into_check).collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Loading
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from reading or parsing config and state files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// The path that was read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// JSON deserialization failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// YAML deserialization failed.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// File format, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `.json`
    Json,
    /// Anything else (`.yaml`, `.yml`, no extension, …).
    Yaml,
}

impl Format {
    /// JSON for a `.json` or `.tfstate` extension (case-insensitive), YAML otherwise.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let is_json = path.extension().is_some_and(|ext| {
            ext.eq_ignore_ascii_case("json") || ext.eq_ignore_ascii_case("tfstate")
        });
        if is_json {
            Self::Json
        } else {
            Self::Yaml
        }
    }

    /// Deserialize `content` in this format.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Json`] or [`ConfigError::Yaml`].
    pub fn parse<T: DeserializeOwned>(self, content: &str) -> Result<T, ConfigError> {
        Ok(match self {
            Self::Json => serde_json::from_str(content)?,
            Self::Yaml => serde_yaml::from_str(content)?,
        })
    }
}

/// Read and deserialize a JSON or YAML file.
///
/// # Errors
///
/// [`ConfigError::Io`] if the file cannot be read, otherwise a parse error.
pub fn load_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Format::from_path(path).parse(&content)
}
