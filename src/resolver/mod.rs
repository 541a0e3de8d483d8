//! Symbol and type resolution.
//!
//! Descriptions are built into repositories, linked into a
//! [`RepositoryGraph`] in dependency order, and type references are then
//! decided against that graph by a [`TypeResolver`]. Graph building is
//! sequential; once linked, the graph is read-only and resolution may run
//! on many threads.

pub mod class_struct;
pub mod errors;
pub mod factory;
pub mod graph;
pub mod type_resolver;

pub use errors::GenError;
pub use factory::{build_repository, NamespaceFactory};
pub use graph::{RepositoryGraph, SymbolTarget};
pub use type_resolver::TypeResolver;
