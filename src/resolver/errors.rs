//! Resolution error types and diagnostics.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error while building the repository graph or deciding a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum GenError {
    #[error("{declaration} is missing required attribute `{field}`")]
    #[diagnostic(code(girbind::build::missing_field))]
    MissingField {
        declaration: String,
        field: &'static str,
    },

    #[error("{declaration} has invalid {field} `{value}`")]
    #[diagnostic(code(girbind::build::invalid_field))]
    InvalidField {
        declaration: String,
        field: &'static str,
        value: String,
    },

    #[error("unresolved symbol `{name}` referenced from `{namespace}`")]
    #[diagnostic(code(girbind::resolve::unresolved_symbol))]
    UnresolvedSymbol { name: String, namespace: String },

    #[error("include `{include}` of `{required_by}` is not resolved")]
    #[diagnostic(code(girbind::resolve::unresolved_dependency))]
    UnresolvedDependency { include: String, required_by: String },

    #[error("unsupported native type `{ctype}`")]
    #[diagnostic(code(girbind::resolve::unsupported_type))]
    UnsupportedType { ctype: String },

    #[error("class struct `{record}` points at `{owner}`, which has no namespace context")]
    #[diagnostic(code(girbind::build::ambiguous_class_struct))]
    AmbiguousClassStruct { record: String, owner: String },

    #[error("alias cycle: {}", .chain.join(" -> "))]
    #[diagnostic(code(girbind::resolve::alias_cycle))]
    AliasCycle { chain: Vec<String> },

    #[error("dependency cycle between namespaces: {}", .namespaces.join(", "))]
    #[diagnostic(code(girbind::build::dependency_cycle))]
    DependencyCycle { namespaces: Vec<String> },

    #[error("namespace `{namespace}` is declared more than once")]
    #[diagnostic(code(girbind::build::duplicate_namespace))]
    DuplicateNamespace { namespace: String },

    #[error("include `{include}` is already bound to another repository")]
    #[diagnostic(code(girbind::build::include_rebound))]
    IncludeRebound { include: String },
}

impl GenError {
    /// Structural errors abort the run; the rest only fail one declaration.
    pub fn is_structural(&self) -> bool {
        match self {
            GenError::MissingField { .. }
            | GenError::InvalidField { .. }
            | GenError::UnresolvedDependency { .. }
            | GenError::AmbiguousClassStruct { .. }
            | GenError::DependencyCycle { .. }
            | GenError::DuplicateNamespace { .. }
            | GenError::IncludeRebound { .. } => true,
            GenError::UnresolvedSymbol { .. }
            | GenError::UnsupportedType { .. }
            | GenError::AliasCycle { .. } => false,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());

        match self {
            GenError::MissingField { .. } | GenError::InvalidField { .. } => {
                diag.with_suggestion(suggestions::MISSING_FIELD)
            }

            GenError::UnresolvedSymbol { namespace, .. } => diag
                .with_context(format!("searched `{}` and its includes", namespace))
                .with_suggestion(suggestions::UNRESOLVED_SYMBOL),

            GenError::UnresolvedDependency { include, .. } => diag
                .with_context(format!("no input declares namespace `{}`", include))
                .with_suggestion(suggestions::MISSING_INCLUDE),

            GenError::UnsupportedType { .. } => {
                diag.with_suggestion(suggestions::UNSUPPORTED_TYPE)
            }

            GenError::AmbiguousClassStruct { owner, .. } => diag.with_context(format!(
                "`{}` must be a class or interface of the same namespace",
                owner
            )),

            GenError::AliasCycle { chain } => {
                diag.with_context(format!("cycle: {}", chain.join(" -> ")))
            }

            GenError::DependencyCycle { namespaces } => diag
                .with_context(format!("cycle: {}", namespaces.join(" -> ")))
                .with_suggestion(
                    "help: Break the cycle by removing one of the includes".to_string(),
                ),

            GenError::DuplicateNamespace { .. } | GenError::IncludeRebound { .. } => diag
                .with_suggestion("help: Pass each namespace description only once".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_split() {
        let missing = GenError::MissingField {
            declaration: "class in Gtk-3.0".to_string(),
            field: "name",
        };
        assert!(missing.is_structural());

        let unsupported = GenError::UnsupportedType {
            ctype: "AtkObject*".to_string(),
        };
        assert!(!unsupported.is_structural());
    }

    #[test]
    fn test_unresolved_dependency_diagnostic() {
        let err = GenError::UnresolvedDependency {
            include: "Gio-2.0".to_string(),
            required_by: "Gtk-3.0".to_string(),
        };

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("include `Gio-2.0` of `Gtk-3.0` is not resolved"));
        assert!(output.contains("no input declares namespace `Gio-2.0`"));
    }

    #[test]
    fn test_alias_cycle_message() {
        let err = GenError::AliasCycle {
            chain: vec!["GLib.A".to_string(), "GLib.B".to_string(), "GLib.A".to_string()],
        };
        assert_eq!(err.to_string(), "alias cycle: GLib.A -> GLib.B -> GLib.A");
    }
}
