//! Description builders for common test scenarios.
//!
//! Every builder fills in exactly the attributes the factory requires, so a
//! test only spells out what it is about.

use crate::description::{
    AliasDescription, ClassDescription, FieldDescription, IncludeDescription,
    InterfaceDescription, MethodDescription, NamespaceDescription, ParameterDescription,
    RecordDescription, RepositoryDescription, TypeDescription,
};

/// An empty namespace `name`-`version` including `includes`.
pub fn repository(name: &str, version: &str, includes: &[(&str, &str)]) -> RepositoryDescription {
    RepositoryDescription {
        includes: includes
            .iter()
            .map(|(name, version)| IncludeDescription {
                name: Some(name.to_string()),
                version: Some(version.to_string()),
            })
            .collect(),
        namespace: NamespaceDescription {
            name: Some(name.to_string()),
            version: Some(version.to_string()),
            ..Default::default()
        },
    }
}

pub fn class(name: &str) -> ClassDescription {
    ClassDescription {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

pub fn interface(name: &str) -> InterfaceDescription {
    InterfaceDescription {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

/// A record with no fields, which the factory treats as opaque.
pub fn record(name: &str) -> RecordDescription {
    RecordDescription {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

pub fn field(name: &str, type_name: &str, ctype: &str) -> FieldDescription {
    FieldDescription {
        name: Some(name.to_string()),
        type_: Some(TypeDescription::new(type_name, ctype)),
        ..Default::default()
    }
}

/// An `in` parameter transferring nothing.
pub fn param(name: &str, type_name: &str, ctype: &str) -> ParameterDescription {
    ParameterDescription {
        name: Some(name.to_string()),
        type_: Some(TypeDescription::new(type_name, ctype)),
        transfer_ownership: Some("none".to_string()),
        ..Default::default()
    }
}

/// An `out` parameter whose value the caller owns.
pub fn out_param(name: &str, type_name: &str, ctype: &str) -> ParameterDescription {
    ParameterDescription {
        direction: Some("out".to_string()),
        transfer_ownership: Some("full".to_string()),
        ..param(name, type_name, ctype)
    }
}

/// A free function returning nothing.
pub fn function(
    name: &str,
    c_identifier: &str,
    parameters: Vec<ParameterDescription>,
) -> MethodDescription {
    MethodDescription {
        name: Some(name.to_string()),
        c_identifier: Some(c_identifier.to_string()),
        parameters,
        ..Default::default()
    }
}

/// An instance method. `instance` is the (type name, c-type) of the
/// receiver, which is always named `instance`.
pub fn method(
    name: &str,
    c_identifier: &str,
    instance: (&str, &str),
    parameters: Vec<ParameterDescription>,
) -> MethodDescription {
    MethodDescription {
        instance_parameter: Some(param("instance", instance.0, instance.1)),
        ..function(name, c_identifier, parameters)
    }
}

pub fn alias(name: &str, ctype: &str, target_name: &str, target_ctype: &str) -> AliasDescription {
    AliasDescription {
        name: Some(name.to_string()),
        c_type: Some(ctype.to_string()),
        target: Some(TypeDescription::new(target_name, target_ctype)),
    }
}
