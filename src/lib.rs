//! girbind - interop signature generation from interface descriptions
//!
//! This crate loads GObject-style interface descriptions, resolves every
//! type reference across namespaces and decides how each value crosses the
//! managed/native boundary.

pub mod core;
pub mod description;
pub mod interop;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test utilities for girbind unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides description builders for common scenarios.
#[cfg(test)]
pub mod test_support;

pub use core::{
    classify, namespace::NamespaceKey, repository::Repository, type_ref::DecidedType,
    type_ref::TypeReference,
};
pub use description::RepositoryDescription;
pub use interop::{DecisionEngine, Emitter};
pub use ops::{GenerateOptions, GenerationReport};
pub use resolver::{GenError, RepositoryGraph, TypeResolver};
