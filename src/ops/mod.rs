//! High-level operations.
//!
//! This module contains the implementation of girbind commands.

pub mod generate;

pub use generate::{
    find_namespace, generate, generate_from_descriptions, write_report, GenerateOptions,
    GenerationReport, NamespaceOutput, SkippedDeclaration,
};
