//! flatmatch-test: Conformance fixtures for flatmatch
//!
//! Provides a compact way to build single-resource states for tests, and
//! (feature `fixtures`) a YAML fixture format plus runner that exercises
//! both evaluation paths: the resource-level operations and the prebuilt
//! [`Check`](flatmatch::Check) values.
//!
//! # Example
//!
//! ```
//! use flatmatch_test::prelude::*;
//!
//! let state = single_resource(
//!     "aws_instance.web",
//!     [("tags.0", "prod"), ("tags.1", "web")],
//! );
//!
//! let web = ResourceRef::new("aws_instance.web");
//! assert!(match_scalar_element(&state, &web, "tags.*", "web").is_ok());
//! ```

use flatmatch::{FlatState, ResourceRef, ResourceState, State};

#[cfg(feature = "fixtures")]
pub mod fixture;

/// A state holding one root-module resource whose primary instance has the
/// given attributes.
pub fn single_resource<I, K, V>(name: &str, attributes: I) -> State
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let attributes: FlatState = attributes.into_iter().collect();
    State::new().with_resource(
        &ResourceRef::new(name),
        ResourceState::with_attributes(format!("{name}-id"), attributes),
    )
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::single_resource;
    pub use flatmatch::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatmatch::{match_nested_element, ErrorKind, StateProvider, ValueCriteria};

    #[test]
    fn single_resource_builds_root_module() {
        let state = single_resource("aws_instance.web", [("ami", "ami-1")]);
        assert!(state.root_module().is_some());

        let attrs = state.attributes(&ResourceRef::new("aws_instance.web")).unwrap();
        assert_eq!(attrs.get("ami"), Some("ami-1"));
    }

    #[test]
    fn other_resources_are_not_found() {
        let state = single_resource("aws_instance.web", [("ami", "ami-1")]);
        let err = state
            .attributes(&ResourceRef::new("aws_instance.db"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
    }

    #[test]
    fn nested_match_through_helper() {
        let state = single_resource(
            "aws_lb.main",
            [
                ("listener.4.port", "443"),
                ("listener.4.protocol", "HTTPS"),
                ("listener.9.port", "80"),
            ],
        );
        let criteria = ValueCriteria::new().with("port", "443").with("protocol", "HTTPS");
        assert!(match_nested_element(
            &state,
            &ResourceRef::new("aws_lb.main"),
            "listener.*",
            &criteria
        )
        .is_ok());
    }
}
