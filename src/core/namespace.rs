//! Namespaces: the declarations of one named, versioned module.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::core::alias::Alias;
use crate::core::naming::SymbolName;
use crate::core::symbol::{
    Callback, Class, ClassStructKind, Constant, Enumeration, Interface, Method, Record,
    RecordKind, SymbolKind, Union,
};

/// Unique key of a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NamespaceKey {
    pub name: String,
    pub version: String,
}

impl NamespaceKey {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        NamespaceKey {
            name: name.into(),
            version: version.into(),
        }
    }

    /// `Name-Version`, as used for file names.
    pub fn canonical_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}

impl fmt::Display for NamespaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.version)
    }
}

/// Where a folded class-struct record lives: the layout `kind` of the class
/// or interface at `owner_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassStructSlot {
    pub owner: SymbolKind,
    pub owner_index: usize,
    pub kind: ClassStructKind,
}

/// All top-level declarations of one module.
#[derive(Debug, Clone)]
pub struct Namespace {
    pub key: NamespaceKey,
    pub shared_library: Option<String>,
    pub aliases: Vec<Alias>,
    pub classes: Vec<Class>,
    pub interfaces: Vec<Interface>,
    pub records: Vec<Record>,
    pub unions: Vec<Union>,
    pub enumerations: Vec<Enumeration>,
    pub bitfields: Vec<Enumeration>,
    pub callbacks: Vec<Callback>,
    pub functions: Vec<Method>,
    pub constants: Vec<Constant>,
    /// Folded class structs, still addressable by their record name.
    pub class_struct_slots: Vec<ClassStructSlot>,
    index: HashMap<String, (SymbolKind, usize)>,
}

impl Namespace {
    pub fn new(key: NamespaceKey) -> Self {
        Namespace {
            key,
            shared_library: None,
            aliases: Vec::new(),
            classes: Vec::new(),
            interfaces: Vec::new(),
            records: Vec::new(),
            unions: Vec::new(),
            enumerations: Vec::new(),
            bitfields: Vec::new(),
            callbacks: Vec::new(),
            functions: Vec::new(),
            constants: Vec::new(),
            class_struct_slots: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    /// Rebuild the name index. Must run after the declaration lists change.
    pub(crate) fn reindex(&mut self) {
        let mut index = HashMap::new();

        fn add<'a>(
            index: &mut HashMap<String, (SymbolKind, usize)>,
            kind: SymbolKind,
            names: impl Iterator<Item = &'a SymbolName>,
        ) {
            for (i, name) in names.enumerate() {
                index.entry(name.native.clone()).or_insert((kind, i));
            }
        }

        add(&mut index, SymbolKind::Class, self.classes.iter().map(|c| &c.name));
        add(&mut index, SymbolKind::Interface, self.interfaces.iter().map(|i| &i.name));
        add(&mut index, SymbolKind::Record, self.records.iter().map(|r| &r.name));
        add(&mut index, SymbolKind::Union, self.unions.iter().map(|u| &u.name));
        add(&mut index, SymbolKind::Enumeration, self.enumerations.iter().map(|e| &e.name));
        add(&mut index, SymbolKind::Bitfield, self.bitfields.iter().map(|e| &e.name));
        add(&mut index, SymbolKind::Callback, self.callbacks.iter().map(|c| &c.name));
        add(&mut index, SymbolKind::Alias, self.aliases.iter().map(|a| &a.name));
        for i in 0..self.class_struct_slots.len() {
            if let Some(record) = self.class_struct(i) {
                index
                    .entry(record.name.native.clone())
                    .or_insert((SymbolKind::ClassStruct, i));
            }
        }

        self.index = index;
    }

    /// Find a type symbol by its unqualified native name.
    pub fn lookup(&self, name: &str) -> Option<(SymbolKind, usize)> {
        self.index.get(name).copied()
    }

    /// Name of the symbol at `(kind, index)`.
    pub fn symbol_name(&self, kind: SymbolKind, index: usize) -> Option<&SymbolName> {
        match kind {
            SymbolKind::Class => self.classes.get(index).map(|s| &s.name),
            SymbolKind::Interface => self.interfaces.get(index).map(|s| &s.name),
            SymbolKind::Record => self.records.get(index).map(|s| &s.name),
            SymbolKind::Union => self.unions.get(index).map(|s| &s.name),
            SymbolKind::Enumeration => self.enumerations.get(index).map(|s| &s.name),
            SymbolKind::Bitfield => self.bitfields.get(index).map(|s| &s.name),
            SymbolKind::Callback => self.callbacks.get(index).map(|s| &s.name),
            SymbolKind::Alias => self.aliases.get(index).map(|s| &s.name),
            SymbolKind::ClassStruct => self.class_struct(index).map(|s| &s.name),
        }
    }

    /// The folded class-struct record behind slot `index`.
    pub fn class_struct(&self, index: usize) -> Option<&Record> {
        let slot = self.class_struct_slots.get(index)?;
        let layouts = match slot.owner {
            SymbolKind::Class => &self.classes.get(slot.owner_index)?.class_structs,
            SymbolKind::Interface => &self.interfaces.get(slot.owner_index)?.class_structs,
            _ => return None,
        };
        layouts.get(&slot.kind)
    }

    /// Classes, interfaces and boxed records have reference semantics.
    pub fn is_reference_type(&self, kind: SymbolKind, index: usize) -> bool {
        match kind {
            SymbolKind::Class | SymbolKind::Interface => true,
            SymbolKind::Record => self
                .records
                .get(index)
                .is_some_and(|r| r.kind == RecordKind::Ref),
            _ => false,
        }
    }

    /// Number of indexed type symbols.
    pub fn symbol_count(&self) -> usize {
        self.index.len()
    }
}
