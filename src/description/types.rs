//! Parse tree of an interface description.
//!
//! These types mirror the introspection format one to one. Every attribute
//! is optional here; the builders in [`crate::resolver::factory`] validate
//! what a declaration requires.

use serde::{Deserialize, Serialize};

/// One description file: a namespace and the modules it includes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RepositoryDescription {
    pub includes: Vec<IncludeDescription>,
    pub namespace: NamespaceDescription,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct IncludeDescription {
    pub name: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct NamespaceDescription {
    pub name: Option<String>,
    pub version: Option<String>,
    pub shared_library: Option<String>,
    pub aliases: Vec<AliasDescription>,
    pub classes: Vec<ClassDescription>,
    pub interfaces: Vec<InterfaceDescription>,
    pub records: Vec<RecordDescription>,
    pub unions: Vec<UnionDescription>,
    pub enumerations: Vec<EnumDescription>,
    pub bitfields: Vec<EnumDescription>,
    pub callbacks: Vec<CallbackDescription>,
    pub functions: Vec<MethodDescription>,
    pub constants: Vec<ConstantDescription>,
}

/// A `<type>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TypeDescription {
    pub name: Option<String>,
    pub c_type: Option<String>,
}

impl TypeDescription {
    pub fn new(name: &str, c_type: &str) -> Self {
        TypeDescription {
            name: Some(name.to_string()),
            c_type: Some(c_type.to_string()),
        }
    }
}

/// An `<array>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ArrayDescription {
    pub length: Option<usize>,
    pub c_type: Option<String>,
    #[serde(rename = "type")]
    pub element: Option<TypeDescription>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AliasDescription {
    pub name: Option<String>,
    pub c_type: Option<String>,
    #[serde(rename = "type")]
    pub target: Option<TypeDescription>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ParameterDescription {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub type_: Option<TypeDescription>,
    pub array: Option<ArrayDescription>,
    pub varargs: bool,
    pub direction: Option<String>,
    pub transfer_ownership: Option<String>,
    pub nullable: bool,
    pub allow_none: bool,
    pub caller_allocates: bool,
    pub closure: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ReturnValueDescription {
    #[serde(rename = "type")]
    pub type_: Option<TypeDescription>,
    pub array: Option<ArrayDescription>,
    pub transfer_ownership: Option<String>,
    pub nullable: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MethodDescription {
    pub name: Option<String>,
    pub c_identifier: Option<String>,
    pub return_value: Option<ReturnValueDescription>,
    pub instance_parameter: Option<ParameterDescription>,
    pub parameters: Vec<ParameterDescription>,
    pub throws: bool,
    pub introspectable: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FieldDescription {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub type_: Option<TypeDescription>,
    pub array: Option<ArrayDescription>,
    /// Inline callback field (function pointer).
    pub callback: Option<CallbackDescription>,
    pub private: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SignalDescription {
    pub name: Option<String>,
    pub return_value: Option<ReturnValueDescription>,
    pub parameters: Vec<ParameterDescription>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ClassDescription {
    pub name: Option<String>,
    pub c_type: Option<String>,
    pub parent: Option<String>,
    pub implements: Vec<String>,
    pub constructors: Vec<MethodDescription>,
    pub methods: Vec<MethodDescription>,
    pub functions: Vec<MethodDescription>,
    pub fields: Vec<FieldDescription>,
    pub signals: Vec<SignalDescription>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct InterfaceDescription {
    pub name: Option<String>,
    pub c_type: Option<String>,
    pub constructors: Vec<MethodDescription>,
    pub methods: Vec<MethodDescription>,
    pub functions: Vec<MethodDescription>,
    pub signals: Vec<SignalDescription>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RecordDescription {
    pub name: Option<String>,
    pub c_type: Option<String>,
    pub disguised: bool,
    /// Back-reference to the class or interface this record lays out.
    pub glib_type_struct_for: Option<String>,
    pub get_type: Option<String>,
    pub constructors: Vec<MethodDescription>,
    pub methods: Vec<MethodDescription>,
    pub functions: Vec<MethodDescription>,
    pub fields: Vec<FieldDescription>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UnionDescription {
    pub name: Option<String>,
    pub c_type: Option<String>,
    pub constructors: Vec<MethodDescription>,
    pub methods: Vec<MethodDescription>,
    pub functions: Vec<MethodDescription>,
    pub fields: Vec<FieldDescription>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EnumDescription {
    pub name: Option<String>,
    pub c_type: Option<String>,
    pub members: Vec<MemberDescription>,
    pub functions: Vec<MethodDescription>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MemberDescription {
    pub name: Option<String>,
    pub c_identifier: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CallbackDescription {
    pub name: Option<String>,
    pub c_type: Option<String>,
    pub return_value: Option<ReturnValueDescription>,
    pub parameters: Vec<ParameterDescription>,
    pub throws: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ConstantDescription {
    pub name: Option<String>,
    pub c_identifier: Option<String>,
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub type_: Option<TypeDescription>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_json() {
        let json = r#"{
            "includes": [{ "name": "GObject", "version": "2.0" }],
            "namespace": {
                "name": "Gio",
                "version": "2.0",
                "functions": [{
                    "name": "bus_get",
                    "c-identifier": "g_bus_get",
                    "parameters": [{
                        "name": "names",
                        "array": { "length": 1, "type": { "name": "utf8", "c-type": "gchar*" } },
                        "transfer-ownership": "none"
                    }]
                }]
            }
        }"#;

        let desc: RepositoryDescription = serde_json::from_str(json).unwrap();
        assert_eq!(desc.includes.len(), 1);
        assert_eq!(desc.namespace.name.as_deref(), Some("Gio"));

        let param = &desc.namespace.functions[0].parameters[0];
        let array = param.array.as_ref().unwrap();
        assert_eq!(array.length, Some(1));
        assert_eq!(array.element, Some(TypeDescription::new("utf8", "gchar*")));
        assert_eq!(param.transfer_ownership.as_deref(), Some("none"));
    }

    #[test]
    fn test_deserialize_toml() {
        let src = r#"
            [namespace]
            name = "GLib"
            version = "2.0"

            [[namespace.aliases]]
            name = "Pid"
            c-type = "GPid"
            type = { name = "gint", c-type = "gint" }
        "#;

        let desc: RepositoryDescription = toml::from_str(src).unwrap();
        let alias = &desc.namespace.aliases[0];
        assert_eq!(alias.c_type.as_deref(), Some("GPid"));
        assert_eq!(alias.target, Some(TypeDescription::new("gint", "gint")));
    }
}
