//! Type references and decided interop types.
//!
//! A [`TypeReference`] is what a parameter, field or return value declares.
//! The resolver turns it into a [`DecidedType`], which is cached in the
//! reference after the first successful resolution.

use std::sync::OnceLock;

use serde::Serialize;

use crate::core::ctype::{fundamental_token, NativeTypeToken, PrimitiveKind};
use crate::core::repository::RepoId;
use crate::core::symbol::SymbolRef;

/// Where a type reference appears. Parameters marshal strings directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeContext {
    Parameter,
    ReturnValue,
    Field,
    Constant,
    AliasTarget,
}

impl TypeContext {
    pub fn is_parameter(self) -> bool {
        matches!(self, TypeContext::Parameter)
    }
}

/// A declared scalar type: introspection name plus native spelling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeSpec {
    /// Symbol name, possibly namespace-qualified (`Gio.File`).
    pub name: Option<String>,
    pub ctype: Option<NativeTypeToken>,
}

impl TypeSpec {
    pub fn new(name: Option<&str>, ctype: Option<&str>) -> Self {
        TypeSpec {
            name: name.map(str::to_string),
            ctype: ctype.map(NativeTypeToken::new),
        }
    }

    /// Native spelling used for classification: the declared one, or the
    /// spelling of a fundamental type name.
    pub fn native_token(&self) -> Option<NativeTypeToken> {
        match (&self.ctype, &self.name) {
            (Some(ctype), _) => Some(ctype.clone()),
            (None, Some(name)) => fundamental_token(name),
            (None, None) => None,
        }
    }

    /// Short label for error messages.
    pub fn label(&self) -> String {
        match (&self.name, &self.ctype) {
            (Some(name), Some(ctype)) => format!("{} ({})", name, ctype),
            (Some(name), None) => name.clone(),
            (None, Some(ctype)) => ctype.to_string(),
            (None, None) => "<untyped>".to_string(),
        }
    }
}

/// Array metadata of a type reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrayInfo {
    /// Zero-based index of the sibling parameter carrying the element count.
    pub length: Option<usize>,
    pub ctype: Option<NativeTypeToken>,
    pub element: Option<TypeSpec>,
}

/// A (possibly unresolved) reference to a type.
#[derive(Debug, Clone)]
pub struct TypeReference {
    pub spec: TypeSpec,
    pub array: Option<ArrayInfo>,
    pub context: TypeContext,
    decided: OnceLock<DecidedType>,
}

impl TypeReference {
    /// Reference a scalar type.
    pub fn scalar(spec: TypeSpec, context: TypeContext) -> Self {
        TypeReference {
            spec,
            array: None,
            context,
            decided: OnceLock::new(),
        }
    }

    /// Reference an array type.
    pub fn array(array: ArrayInfo, context: TypeContext) -> Self {
        TypeReference {
            spec: TypeSpec {
                name: None,
                ctype: array.ctype.clone(),
            },
            array: Some(array),
            context,
            decided: OnceLock::new(),
        }
    }

    /// A reference with no type information, used for inline callbacks
    /// and varargs. It always decides to the opaque handle.
    pub fn opaque(context: TypeContext) -> Self {
        TypeReference::scalar(TypeSpec::new(None, Some("gpointer")), context)
    }

    pub fn is_array(&self) -> bool {
        self.array.is_some()
    }

    /// Native spelling of the reference itself.
    pub fn ctype(&self) -> Option<&NativeTypeToken> {
        self.spec.ctype.as_ref()
    }

    /// Whether the native spelling is a pointer.
    pub fn is_pointer(&self) -> bool {
        self.ctype().is_some_and(NativeTypeToken::is_pointer)
    }

    /// The cached decision, if resolution already ran.
    pub fn decided(&self) -> Option<&DecidedType> {
        self.decided.get()
    }

    /// Store a decision. A second store keeps the first value.
    pub(crate) fn bind(&self, decided: DecidedType) -> &DecidedType {
        self.decided.get_or_init(|| decided)
    }

    /// Short label for error messages.
    pub fn label(&self) -> String {
        match &self.array {
            Some(array) => match &array.element {
                Some(element) => format!("array of {}", element.label()),
                None => "array".to_string(),
            },
            None => self.spec.label(),
        }
    }
}

/// String marshalling flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StringKind {
    Utf8,
    /// File-system encoding (`filename`).
    Platform,
}

/// The target representation chosen for a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteropType {
    Primitive(PrimitiveKind),
    /// `GValue`, marshalled as the runtime's value struct.
    Value,
    Str(StringKind),
    /// Address-sized handle without structural information.
    Handle,
    /// Untyped function pointer.
    Delegate,
    /// A declared symbol.
    Symbol(SymbolRef),
}

/// A fully decided interop type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DecidedType {
    pub interop: InteropType,
    /// Pointer-to-primitive passed by reference.
    pub by_ref: bool,
    /// Typed array of `interop` elements.
    pub array: bool,
    /// The native spelling carried a pointer marker.
    pub pointer: bool,
    /// Sibling length parameter index, set in parameter context only.
    pub length_index: Option<usize>,
}

impl DecidedType {
    pub fn of(interop: InteropType) -> Self {
        DecidedType {
            interop,
            by_ref: false,
            array: false,
            pointer: false,
            length_index: None,
        }
    }

    pub fn handle() -> Self {
        DecidedType::of(InteropType::Handle)
    }

    pub fn with_pointer(mut self, pointer: bool) -> Self {
        self.pointer = pointer;
        self
    }

    pub fn by_ref(mut self) -> Self {
        self.by_ref = true;
        self
    }

    /// Whether the representation is the generic opaque handle.
    pub fn is_opaque_handle(&self) -> bool {
        matches!(self.interop, InteropType::Handle) && !self.array
    }

    pub fn is_string(&self) -> bool {
        matches!(self.interop, InteropType::Str(_)) && !self.array
    }

    pub fn is_void(&self) -> bool {
        matches!(self.interop, InteropType::Primitive(PrimitiveKind::Void))
            && !self.array
            && !self.by_ref
    }

    pub fn symbol(&self) -> Option<SymbolRef> {
        match self.interop {
            InteropType::Symbol(sref) => Some(sref),
            _ => None,
        }
    }

    /// Whether the type is a symbol declared outside `current`.
    pub fn is_external(&self, current: RepoId) -> bool {
        self.symbol().is_some_and(|sref| sref.is_external(current))
    }
}
