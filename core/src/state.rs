//! State model and the `StateProvider` seam
//!
//! The matchers only ever see a [`FlatState`]. Where that snapshot comes from
//! is the provider's business: [`State`] is the in-memory, file-loadable
//! implementation, laid out as modules → resources → primary instance →
//! flattened attributes.

use crate::{CheckError, FlatState, ROOT_MODULE};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Supplies the flattened attributes of a resource's primary instance.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; checks are evaluated against a
/// shared, read-only provider.
pub trait StateProvider: Send + Sync {
    /// Resolve `resource` to its attribute snapshot.
    ///
    /// # Errors
    ///
    /// - [`CheckError::ResourceNotFound`] if the module or resource is absent
    /// - [`CheckError::InstanceNotFound`] if the resource has no primary instance
    fn attributes(&self, resource: &ResourceRef) -> Result<&FlatState, CheckError>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// ResourceRef
// ═══════════════════════════════════════════════════════════════════════════════

/// Names a resource within a module.
///
/// Parses from `name` (root module) or `module.path:name`:
///
/// ```
/// use flatmatch::ResourceRef;
///
/// let web: ResourceRef = "aws_instance.web".parse().unwrap();
/// assert_eq!(web.module(), &["root".to_string()]);
///
/// let nested: ResourceRef = "root.network:aws_vpc.main".parse().unwrap();
/// assert_eq!(nested.name(), "aws_vpc.main");
/// assert_eq!(nested.module_path(), "root.network");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct ResourceRef {
    module: Vec<String>,
    name: String,
}

impl ResourceRef {
    /// A resource in the root module.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            module: vec![ROOT_MODULE.to_owned()],
            name: name.into(),
        }
    }

    /// A resource in the module at `path`. An empty path means the root module.
    pub fn in_module<I, S>(path: I, name: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let module: Vec<String> = path.into_iter().map(Into::into).collect();
        if module.is_empty() {
            return Self::new(name);
        }
        Self {
            module,
            name: name.into(),
        }
    }

    /// The resource name, e.g. `aws_security_group.web`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The module path segments, starting at `root`.
    #[must_use]
    pub fn module(&self) -> &[String] {
        &self.module
    }

    /// The module path joined with `.`.
    #[must_use]
    pub fn module_path(&self) -> String {
        self.module.join(".")
    }

    fn is_root(&self) -> bool {
        self.module.len() == 1 && self.module[0] == ROOT_MODULE
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}:{}", self.module_path(), self.name)
        }
    }
}

/// A resource reference string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid resource reference {input:?}: {reason}")]
pub struct ParseResourceRefError {
    input: String,
    reason: &'static str,
}

impl FromStr for ResourceRef {
    type Err = ParseResourceRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| ParseResourceRefError {
            input: s.to_owned(),
            reason,
        };
        match s.split_once(':') {
            None if s.is_empty() => Err(err("empty resource name")),
            None => Ok(Self::new(s)),
            Some((_, "")) => Err(err("empty resource name")),
            Some(("", _)) => Err(err("empty module path")),
            Some((module, name)) => Ok(Self::in_module(module.split('.'), name)),
        }
    }
}

impl TryFrom<String> for ResourceRef {
    type Error = ParseResourceRefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ResourceRef> for String {
    fn from(value: ResourceRef) -> Self {
        value.to_string()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// State
// ═══════════════════════════════════════════════════════════════════════════════

/// A full state snapshot: a list of modules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct State {
    /// Modules in this state. The root module has path `["root"]`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub modules: Vec<ModuleState>,
}

/// Resources of one module.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModuleState {
    /// Module path, starting at `root`.
    pub path: Vec<String>,
    /// Resources keyed by name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub resources: BTreeMap<String, ResourceState>,
}

/// A resource and its primary instance, if one has been materialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceState {
    /// Resource type, e.g. `aws_security_group`.
    #[cfg_attr(feature = "serde", serde(rename = "type", default))]
    pub resource_type: String,
    /// The primary instance.
    #[cfg_attr(feature = "serde", serde(default))]
    pub primary: Option<InstanceState>,
}

/// One materialized instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceState {
    /// Provider-assigned id.
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: String,
    /// Flattened attributes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: FlatState,
}

impl ModuleState {
    /// An empty module at `path`.
    pub fn new<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            resources: BTreeMap::new(),
        }
    }
}

impl ResourceState {
    /// A resource with a primary instance holding `attributes`.
    #[must_use]
    pub fn with_attributes(id: impl Into<String>, attributes: FlatState) -> Self {
        Self {
            resource_type: String::new(),
            primary: Some(InstanceState {
                id: id.into(),
                attributes,
            }),
        }
    }

    /// A resource with no primary instance.
    #[must_use]
    pub fn without_instance() -> Self {
        Self::default()
    }
}

impl State {
    /// An empty state with no modules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource, creating its module if needed (builder pattern).
    #[must_use]
    pub fn with_resource(mut self, resource: &ResourceRef, state: ResourceState) -> Self {
        self.insert_resource(resource, state);
        self
    }

    /// Add a resource, creating its module if needed.
    pub fn insert_resource(&mut self, resource: &ResourceRef, state: ResourceState) {
        let index = match self.modules.iter().position(|m| m.path == resource.module) {
            Some(index) => index,
            None => {
                self.modules.push(ModuleState::new(resource.module.iter().cloned()));
                self.modules.len() - 1
            }
        };
        self.modules[index]
            .resources
            .insert(resource.name.clone(), state);
    }

    /// The module with the given path.
    #[must_use]
    pub fn module(&self, path: &[String]) -> Option<&ModuleState> {
        self.modules.iter().find(|m| m.path == path)
    }

    /// The root module.
    #[must_use]
    pub fn root_module(&self) -> Option<&ModuleState> {
        self.modules
            .iter()
            .find(|m| m.path.len() == 1 && m.path[0] == ROOT_MODULE)
    }
}

impl StateProvider for State {
    fn attributes(&self, resource: &ResourceRef) -> Result<&FlatState, CheckError> {
        let module = resource.module_path();
        let resource_state = self
            .module(resource.module())
            .and_then(|m| m.resources.get(resource.name()))
            .ok_or_else(|| CheckError::ResourceNotFound {
                resource: resource.name().to_owned(),
                module: module.clone(),
            })?;

        resource_state
            .primary
            .as_ref()
            .map(|instance| &instance.attributes)
            .ok_or_else(|| CheckError::InstanceNotFound {
                resource: resource.name().to_owned(),
                module,
            })
    }
}
