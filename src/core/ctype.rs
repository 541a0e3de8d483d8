//! Native type classification.
//!
//! Maps C type spellings as they appear in interface descriptions to the
//! fixed set of categories the interop layer knows how to marshal.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static SPACE_BEFORE_STAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\*").unwrap());

/// Spellings that are always passed as an untyped handle, pointer or not.
pub const ALWAYS_OPAQUE: &[&str] = &["va_list", "GType", "gpointer", "gconstpointer"];

/// Foreign library prefixes the generator refuses to marshal.
pub const UNSUPPORTED_PREFIXES: &[&str] = &["Atk", "Cogl"];

/// A native type spelling, e.g. `const gchar*`.
///
/// Whitespace is normalized on construction so `const gchar *` and
/// `const gchar*` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct NativeTypeToken(String);

impl NativeTypeToken {
    /// Create a token from a raw spelling.
    pub fn new(spelling: impl AsRef<str>) -> Self {
        let collapsed = WHITESPACE.replace_all(spelling.as_ref().trim(), " ");
        let normalized = SPACE_BEFORE_STAR.replace_all(&collapsed, "*");
        NativeTypeToken(normalized.into_owned())
    }

    /// Get the normalized spelling.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of pointer markers in the spelling.
    pub fn pointer_depth(&self) -> usize {
        self.0.matches('*').count()
    }

    /// Check if the spelling carries any pointer marker.
    pub fn is_pointer(&self) -> bool {
        self.pointer_depth() > 0
    }

    /// The spelling with every pointer marker removed.
    pub fn base(&self) -> String {
        let without = self.0.replace('*', " ");
        WHITESPACE.replace_all(without.trim(), " ").into_owned()
    }

    /// Check if this spelling is one of the always-opaque tokens.
    pub fn is_always_opaque(&self) -> bool {
        ALWAYS_OPAQUE.contains(&self.0.as_str())
    }
}

impl From<String> for NativeTypeToken {
    fn from(s: String) -> Self {
        NativeTypeToken::new(s)
    }
}

impl From<&str> for NativeTypeToken {
    fn from(s: &str) -> Self {
        NativeTypeToken::new(s)
    }
}

impl From<NativeTypeToken> for String {
    fn from(token: NativeTypeToken) -> Self {
        token.0
    }
}

impl fmt::Display for NativeTypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Primitive kinds with a direct interop representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Void,
    Bool,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl PrimitiveKind {
    /// Target-language spelling of the primitive.
    pub fn as_interop(&self) -> &'static str {
        match self {
            PrimitiveKind::Void => "void",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::I8 => "sbyte",
            PrimitiveKind::U8 => "byte",
            PrimitiveKind::I16 => "short",
            PrimitiveKind::U16 => "ushort",
            PrimitiveKind::I32 => "int",
            PrimitiveKind::U32 => "uint",
            PrimitiveKind::I64 => "long",
            PrimitiveKind::U64 => "ulong",
            PrimitiveKind::F32 => "float",
            PrimitiveKind::F64 => "double",
        }
    }
}

/// Semantic category of a type.
///
/// `classify` only ever produces the token-level categories. The
/// `ReferenceCountedHandle` and the symbol-backed `StructuredValue` cases are
/// assigned to declared symbols by the repository graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Primitive(PrimitiveKind),
    /// A value type passed like a primitive (`GValue`, value records).
    StructuredValue,
    String,
    OpaqueHandle,
    /// Untyped function pointer; the signature depends on its use site.
    Callback,
    /// Class, interface or boxed record passed as a handle.
    ReferenceCountedHandle,
    NotSupported,
    NotFound,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Primitive(kind) => write!(f, "primitive({})", kind.as_interop()),
            Category::StructuredValue => write!(f, "structured-value"),
            Category::String => write!(f, "string"),
            Category::OpaqueHandle => write!(f, "opaque-handle"),
            Category::Callback => write!(f, "callback"),
            Category::ReferenceCountedHandle => write!(f, "reference-counted-handle"),
            Category::NotSupported => write!(f, "not-supported"),
            Category::NotFound => write!(f, "not-found"),
        }
    }
}

/// Result of classifying one native spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: Category,
    pub is_pointer: bool,
    /// Whether a pointer to this type is passed by reference.
    pub is_primitive: bool,
}

/// Classify a native spelling.
///
/// Pure function of the token: repeated calls give identical results and
/// unknown spellings yield `Category::NotFound`.
pub fn classify(token: &NativeTypeToken) -> Classification {
    let is_pointer = token.is_pointer();
    let base = token.base();

    let category = match (base.as_str(), is_pointer) {
        ("void", true) | ("JSCValue", true) => Category::OpaqueHandle,
        ("void", false) => Category::Primitive(PrimitiveKind::Void),
        ("gboolean", _) => Category::Primitive(PrimitiveKind::Bool),
        ("gfloat" | "float", _) => Category::Primitive(PrimitiveKind::F32),

        ("GCallback", _) => Category::Callback,

        ("guchar" | "gchar" | "const gchar" | "const char" | "char", true) => Category::String,

        ("gconstpointer" | "va_list" | "gpointer" | "GType" | "tm", _) => Category::OpaqueHandle,

        ("GValue" | "const GValue", _) => Category::StructuredValue,

        ("guint16" | "gushort", _) => Category::Primitive(PrimitiveKind::U16),
        ("gint16" | "gshort", _) => Category::Primitive(PrimitiveKind::I16),

        ("gdouble" | "double" | "long double", _) => Category::Primitive(PrimitiveKind::F64),

        // Some aliases target the plain C spelling instead of the g-prefixed one.
        ("int" | "gint" | "gint32", _) => Category::Primitive(PrimitiveKind::I32),

        ("guint" | "guint32" | "GQuark" | "gunichar" | "const gunichar", _)
        | ("const guint32", true) => Category::Primitive(PrimitiveKind::U32),

        ("guint8" | "gchar" | "guchar", _) | ("const guint8", true) => {
            Category::Primitive(PrimitiveKind::U8)
        }
        ("gint8", _) => Category::Primitive(PrimitiveKind::I8),

        ("glong" | "gssize" | "gint64" | "goffset" | "time_t", _) => {
            Category::Primitive(PrimitiveKind::I64)
        }
        ("gsize" | "guint64" | "gulong" | "Window", _) => Category::Primitive(PrimitiveKind::U64),

        (t, _) if UNSUPPORTED_PREFIXES.iter().any(|p| t.starts_with(p)) => Category::NotSupported,

        _ => Category::NotFound,
    };

    let is_primitive = matches!(
        category,
        Category::Primitive(_) | Category::StructuredValue
    );

    Classification {
        category,
        is_pointer,
        is_primitive,
    }
}

/// Native spelling of a fundamental introspection type name.
///
/// `utf8` and `filename` are strings, `none` is void; names the classifier
/// knows map to themselves. Anything else is a symbol name.
pub fn fundamental_token(name: &str) -> Option<NativeTypeToken> {
    match name {
        "utf8" | "filename" => Some(NativeTypeToken::new("gchar*")),
        "none" => Some(NativeTypeToken::new("void")),
        _ => {
            let token = NativeTypeToken::new(name);
            match classify(&token).category {
                Category::NotFound | Category::NotSupported => None,
                _ => Some(token),
            }
        }
    }
}
