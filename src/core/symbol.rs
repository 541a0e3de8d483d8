//! Declared symbols.
//!
//! Every named entity of a namespace: classes, interfaces, records, unions,
//! enumerations, callbacks and the callables and fields they own.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::core::ctype::NativeTypeToken;
use crate::core::naming::SymbolName;
use crate::core::parameter::{ParameterList, ReturnValue};
use crate::core::repository::RepoId;
use crate::core::type_ref::TypeReference;

/// Kind of a declared type symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolKind {
    Class,
    Interface,
    Record,
    Union,
    Enumeration,
    Bitfield,
    Callback,
    Alias,
    /// A record folded into its class or interface as a layout.
    ClassStruct,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SymbolKind::Class => "class",
            SymbolKind::Interface => "interface",
            SymbolKind::Record => "record",
            SymbolKind::Union => "union",
            SymbolKind::Enumeration => "enumeration",
            SymbolKind::Bitfield => "bitfield",
            SymbolKind::Callback => "callback",
            SymbolKind::Alias => "alias",
            SymbolKind::ClassStruct => "class-struct",
        };
        f.write_str(s)
    }
}

/// Stable address of a symbol inside a repository graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SymbolRef {
    pub repo: RepoId,
    pub kind: SymbolKind,
    pub index: usize,
}

impl SymbolRef {
    /// Whether the symbol lives in another repository than `current`.
    pub fn is_external(&self, current: RepoId) -> bool {
        self.repo != current
    }
}

/// How a record is represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordKind {
    /// Opaque or boxed; passed as a handle.
    Ref,
    /// Plain struct passed by value.
    Value,
    /// Public class/interface layout.
    PublicClass,
    /// Private class/interface layout.
    PrivateClass,
}

/// Which layout of its owner a folded class-struct describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ClassStructKind {
    Public,
    Private,
}

impl ClassStructKind {
    /// Metadata key and nested type name of the folded layout.
    pub fn identifier(&self) -> &'static str {
        match self {
            ClassStructKind::Public => "ClassStruct",
            ClassStructKind::Private => "PrivateClassStruct",
        }
    }
}

/// What a callable is to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Function,
    Method,
    Constructor,
}

/// A native function, method or constructor.
#[derive(Debug, Clone)]
pub struct Method {
    pub name: SymbolName,
    /// Exported symbol of the shared library.
    pub c_identifier: String,
    pub kind: MethodKind,
    pub return_value: ReturnValue,
    pub parameters: ParameterList,
    pub throws: bool,
}

/// A struct, class or union field.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: SymbolName,
    pub type_ref: TypeReference,
    pub private: bool,
}

/// A class or interface signal.
#[derive(Debug, Clone)]
pub struct Signal {
    pub name: SymbolName,
    pub return_value: ReturnValue,
    pub parameters: ParameterList,
}

/// Callables shared by classes, interfaces, records and unions.
#[derive(Debug, Clone, Default)]
pub struct Callables {
    pub constructors: Vec<Method>,
    pub methods: Vec<Method>,
    pub functions: Vec<Method>,
}

impl Callables {
    pub fn iter(&self) -> impl Iterator<Item = &Method> {
        self.constructors
            .iter()
            .chain(self.methods.iter())
            .chain(self.functions.iter())
    }

    pub fn len(&self) -> usize {
        self.constructors.len() + self.methods.len() + self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub struct Class {
    pub name: SymbolName,
    pub ctype: Option<NativeTypeToken>,
    /// Parent class name, qualified when declared in an include.
    pub parent: Option<String>,
    /// Implemented interface names.
    pub implements: Vec<String>,
    pub callables: Callables,
    pub fields: Vec<Field>,
    pub signals: Vec<Signal>,
    /// Folded class-struct layouts.
    pub class_structs: BTreeMap<ClassStructKind, Record>,
}

#[derive(Debug, Clone)]
pub struct Interface {
    pub name: SymbolName,
    pub ctype: Option<NativeTypeToken>,
    pub callables: Callables,
    pub signals: Vec<Signal>,
    pub class_structs: BTreeMap<ClassStructKind, Record>,
}

#[derive(Debug, Clone)]
pub struct Record {
    pub name: SymbolName,
    pub ctype: Option<NativeTypeToken>,
    pub kind: RecordKind,
    /// Name of the class or interface whose layout this record describes.
    pub class_struct_for: Option<String>,
    pub callables: Callables,
    pub fields: Vec<Field>,
}

impl Record {
    pub fn is_class_struct(&self) -> bool {
        self.class_struct_for.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Union {
    pub name: SymbolName,
    pub ctype: Option<NativeTypeToken>,
    pub callables: Callables,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone)]
pub struct Member {
    pub name: SymbolName,
    pub c_identifier: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct Enumeration {
    pub name: SymbolName,
    pub ctype: Option<NativeTypeToken>,
    pub is_bitfield: bool,
    pub members: Vec<Member>,
    pub functions: Vec<Method>,
}

#[derive(Debug, Clone)]
pub struct Callback {
    pub name: SymbolName,
    pub ctype: Option<NativeTypeToken>,
    pub return_value: ReturnValue,
    pub parameters: ParameterList,
    pub throws: bool,
}

#[derive(Debug, Clone)]
pub struct Constant {
    pub name: SymbolName,
    pub c_identifier: Option<String>,
    pub value: String,
    pub type_ref: TypeReference,
}
