//! Test utilities for girbind unit tests.
//!
//! The builders in [`fixtures`] produce description trees the same shape
//! the loader produces, so tests exercise the real builders and resolver.
//!
//! # Example
//!
//! ```rust,ignore
//! use girbind::test_support::fixtures;
//!
//! let mut gtk = fixtures::repository("Gtk", "3.0", &[("GLib", "2.0")]);
//! gtk.namespace.classes.push(fixtures::class("Widget"));
//! ```

pub mod fixtures;

/// Assertion helpers for testing.
pub mod assertions {
    use crate::resolver::GenError;
    use miette::Diagnostic as _;

    /// Assert that a result failed with the given diagnostic code.
    pub fn assert_error_code<T: std::fmt::Debug>(result: Result<T, GenError>, code: &str) {
        match result {
            Ok(v) => panic!("expected error `{}`, got Ok: {:?}", code, v),
            Err(e) => {
                let actual = e.code().map(|c| c.to_string()).unwrap_or_default();
                assert_eq!(actual, code, "unexpected error: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::RepositoryGraph;

    #[test]
    fn test_fixture_repository_builds() {
        let mut gtk = fixtures::repository("Gtk", "3.0", &[]);
        gtk.namespace.classes.push(fixtures::class("Widget"));
        gtk.namespace.records.push(fixtures::record("Border"));

        let graph = RepositoryGraph::build(&[gtk]).unwrap();
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_assert_error_code() {
        let gtk = fixtures::repository("Gtk", "3.0", &[("Gio", "2.0")]);
        assertions::assert_error_code(
            RepositoryGraph::build(&[gtk]),
            "girbind::resolve::unresolved_dependency",
        );
    }
}
