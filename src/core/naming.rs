//! Symbol names and case conversion.

use std::fmt;

use serde::Serialize;

/// Keywords of the target language that cannot be used as identifiers.
const RESERVED: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// The native (original) and managed (target-language) name of a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SymbolName {
    pub native: String,
    pub managed: String,
}

impl SymbolName {
    /// Name a type or method: the managed name is PascalCase.
    pub fn pascal(native: impl Into<String>) -> Self {
        let native = native.into();
        let managed = to_pascal_case(&native);
        SymbolName { native, managed }
    }

    /// Name a parameter: the managed name is escaped camelCase.
    pub fn parameter(native: impl Into<String>) -> Self {
        let native = native.into();
        let managed = escape_identifier(&to_camel_case(&native));
        SymbolName { native, managed }
    }
}

impl fmt::Display for SymbolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.native)
    }
}

/// Convert `snake_case` or `kebab-case` to `PascalCase`.
pub fn to_pascal_case(s: &str) -> String {
    s.split(|c| c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Convert `snake_case` or `kebab-case` to `camelCase`.
pub fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Prefix reserved words with `@`.
pub fn escape_identifier(s: &str) -> String {
    if RESERVED.contains(&s) {
        format!("@{}", s)
    } else {
        s.to_string()
    }
}

/// Split `Gio.File` into `(Some("Gio"), "File")`.
pub fn split_qualified(name: &str) -> (Option<&str>, &str) {
    match name.split_once('.') {
        Some((ns, local)) => (Some(ns), local),
        None => (None, name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_conversion() {
        assert_eq!(to_pascal_case("set_title"), "SetTitle");
        assert_eq!(to_pascal_case("notify-event"), "NotifyEvent");
        assert_eq!(to_camel_case("user_data"), "userData");
        assert_eq!(to_pascal_case("Window"), "Window");
    }

    #[test]
    fn test_parameter_names_are_escaped() {
        assert_eq!(SymbolName::parameter("object").managed, "@object");
        assert_eq!(SymbolName::parameter("out").managed, "@out");
        assert_eq!(SymbolName::parameter("n_items").managed, "nItems");
    }

    #[test]
    fn test_split_qualified() {
        assert_eq!(split_qualified("Gio.File"), (Some("Gio"), "File"));
        assert_eq!(split_qualified("Widget"), (None, "Widget"));
    }
}
