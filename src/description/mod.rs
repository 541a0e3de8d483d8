//! Interface description input.
//!
//! The description is consumed read-only; it is bound from JSON or TOML and
//! never mutated by the resolver.

pub mod loader;
pub mod types;

pub use loader::{expand_inputs, load_all, load_description};
pub use types::{
    AliasDescription, ArrayDescription, CallbackDescription, ClassDescription,
    ConstantDescription, EnumDescription, FieldDescription, IncludeDescription,
    InterfaceDescription, MemberDescription, MethodDescription, NamespaceDescription,
    ParameterDescription, RecordDescription, RepositoryDescription, ReturnValueDescription,
    SignalDescription, TypeDescription, UnionDescription,
};
