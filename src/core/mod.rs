//! Core data model.
//!
//! Namespaces, repositories, symbols and type references, plus the pure
//! native type classifier and alias table the resolver builds on.

pub mod alias;
pub mod ctype;
pub mod namespace;
pub mod naming;
pub mod parameter;
pub mod repository;
pub mod symbol;
pub mod type_ref;

pub use alias::{Alias, AliasTable};
pub use ctype::{
    classify, fundamental_token, Category, Classification, NativeTypeToken, PrimitiveKind,
};
pub use namespace::{ClassStructSlot, Namespace, NamespaceKey};
pub use naming::SymbolName;
pub use parameter::{Direction, Parameter, ParameterList, ReturnValue, Transfer};
pub use repository::{Include, RepoId, Repository};
pub use symbol::{
    Callables, Callback, Class, ClassStructKind, Constant, Enumeration, Field, Interface, Member,
    Method, MethodKind, Record, RecordKind, Signal, SymbolKind, SymbolRef, Union,
};
pub use type_ref::{
    ArrayInfo, DecidedType, InteropType, StringKind, TypeContext, TypeReference, TypeSpec,
};
