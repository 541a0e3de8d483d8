//! Per-kind builders turning the description tree into the model.
//!
//! Each builder validates the attributes its declaration requires and fails
//! with a [`GenError::MissingField`] naming the declaration otherwise.

use crate::core::{
    Alias, ArrayInfo, Callables, Callback, Class, Constant, Direction, Enumeration, Field,
    Interface, Member, Method, MethodKind, Namespace, NamespaceKey, NativeTypeToken, Parameter,
    ParameterList, Record, RecordKind, Repository, ReturnValue, Signal, SymbolName, Transfer,
    TypeContext, TypeReference, TypeSpec, Union,
};
use crate::description::{
    AliasDescription, ArrayDescription, CallbackDescription, ClassDescription,
    ConstantDescription, EnumDescription, FieldDescription, IncludeDescription,
    InterfaceDescription, MethodDescription, NamespaceDescription, ParameterDescription,
    RecordDescription, RepositoryDescription, ReturnValueDescription, SignalDescription,
    TypeDescription, UnionDescription,
};
use crate::resolver::class_struct::fold_class_structs;
use crate::resolver::errors::GenError;

fn require<'a>(
    value: Option<&'a String>,
    declaration: impl FnOnce() -> String,
    field: &'static str,
) -> Result<&'a str, GenError> {
    value.map(String::as_str).ok_or_else(|| GenError::MissingField {
        declaration: declaration(),
        field,
    })
}

/// Key of a namespace description.
pub fn namespace_key(desc: &NamespaceDescription) -> Result<NamespaceKey, GenError> {
    let name = require(desc.name.as_ref(), || "namespace".to_string(), "name")?;
    let version = require(
        desc.version.as_ref(),
        || format!("namespace `{}`", name),
        "version",
    )?;
    Ok(NamespaceKey::new(name, version))
}

/// Key of an include.
pub fn include_key(
    desc: &IncludeDescription,
    owner: &NamespaceKey,
) -> Result<NamespaceKey, GenError> {
    let label = || format!("include of `{}`", owner);
    let name = require(desc.name.as_ref(), label, "name")?;
    let version = require(desc.version.as_ref(), label, "version")?;
    Ok(NamespaceKey::new(name, version))
}

/// Build one repository from its description.
///
/// Includes are created unbound; the graph binds them.
pub fn build_repository(desc: &RepositoryDescription) -> Result<Repository, GenError> {
    let key = namespace_key(&desc.namespace)?;
    let includes = desc
        .includes
        .iter()
        .map(|include| include_key(include, &key))
        .collect::<Result<Vec<_>, _>>()?;

    let namespace = NamespaceFactory::new(key).create(&desc.namespace)?;
    Ok(Repository::new(namespace, includes))
}

/// Builds the declarations of one namespace.
pub struct NamespaceFactory {
    key: NamespaceKey,
}

impl NamespaceFactory {
    pub fn new(key: NamespaceKey) -> Self {
        NamespaceFactory { key }
    }

    fn label(&self, kind: &str, name: Option<&String>) -> String {
        match name {
            Some(name) => format!("{} `{}.{}`", kind, self.key.name, name),
            None => format!("{} in `{}`", kind, self.key),
        }
    }

    /// Create the namespace, fold class structs and index it.
    pub fn create(&self, desc: &NamespaceDescription) -> Result<Namespace, GenError> {
        let mut namespace = Namespace::new(self.key.clone());
        namespace.shared_library = desc.shared_library.clone();

        namespace.aliases = collect(&desc.aliases, |a| self.alias(a))?;
        namespace.callbacks = collect(&desc.callbacks, |c| self.callback(c))?;
        namespace.enumerations = collect(&desc.enumerations, |e| self.enumeration(e, false))?;
        namespace.bitfields = collect(&desc.bitfields, |e| self.enumeration(e, true))?;
        namespace.interfaces = collect(&desc.interfaces, |i| self.interface(i))?;
        namespace.records = collect(&desc.records, |r| self.record(r))?;
        namespace.classes = collect(&desc.classes, |c| self.class(c))?;
        namespace.unions = collect(&desc.unions, |u| self.union(u))?;
        namespace.functions = self.methods(&desc.functions, MethodKind::Function)?;
        namespace.constants = collect(&desc.constants, |c| self.constant(c))?;

        fold_class_structs(&mut namespace)?;
        namespace.reindex();

        tracing::debug!(
            "Built namespace {} ({} symbols, {} functions)",
            namespace.key,
            namespace.symbol_count(),
            namespace.functions.len()
        );

        Ok(namespace)
    }

    fn alias(&self, desc: &AliasDescription) -> Result<Alias, GenError> {
        let label = || self.label("alias", desc.name.as_ref());
        let name = require(desc.name.as_ref(), label, "name")?;
        let ctype = require(desc.c_type.as_ref(), label, "c-type")?;
        let target = desc.target.as_ref().ok_or_else(|| GenError::MissingField {
            declaration: label(),
            field: "type",
        })?;
        require(target.name.as_ref(), label, "type name")?;

        Ok(Alias {
            name: SymbolName::pascal(name),
            ctype: NativeTypeToken::new(ctype),
            target: TypeReference::scalar(type_spec(target), TypeContext::AliasTarget),
        })
    }

    fn class(&self, desc: &ClassDescription) -> Result<Class, GenError> {
        let name = require(desc.name.as_ref(), || self.label("class", None), "name")?;

        Ok(Class {
            name: SymbolName::pascal(name),
            ctype: desc.c_type.as_deref().map(NativeTypeToken::new),
            parent: desc.parent.clone(),
            implements: desc.implements.clone(),
            callables: self.callables(&desc.constructors, &desc.methods, &desc.functions)?,
            fields: collect(&desc.fields, |f| self.field(name, f))?,
            signals: collect(&desc.signals, |s| self.signal(name, s))?,
            class_structs: Default::default(),
        })
    }

    fn interface(&self, desc: &InterfaceDescription) -> Result<Interface, GenError> {
        let name = require(desc.name.as_ref(), || self.label("interface", None), "name")?;

        Ok(Interface {
            name: SymbolName::pascal(name),
            ctype: desc.c_type.as_deref().map(NativeTypeToken::new),
            callables: self.callables(&desc.constructors, &desc.methods, &desc.functions)?,
            signals: collect(&desc.signals, |s| self.signal(name, s))?,
            class_structs: Default::default(),
        })
    }

    fn record(&self, desc: &RecordDescription) -> Result<Record, GenError> {
        let name = require(desc.name.as_ref(), || self.label("record", None), "name")?;

        let kind = match &desc.glib_type_struct_for {
            Some(_) if name.ends_with("Private") => RecordKind::PrivateClass,
            Some(_) => RecordKind::PublicClass,
            None if desc.disguised || desc.get_type.is_some() || desc.fields.is_empty() => {
                RecordKind::Ref
            }
            None => RecordKind::Value,
        };

        Ok(Record {
            name: SymbolName::pascal(name),
            ctype: desc.c_type.as_deref().map(NativeTypeToken::new),
            kind,
            class_struct_for: desc.glib_type_struct_for.clone(),
            callables: self.callables(&desc.constructors, &desc.methods, &desc.functions)?,
            fields: collect(&desc.fields, |f| self.field(name, f))?,
        })
    }

    fn union(&self, desc: &UnionDescription) -> Result<Union, GenError> {
        let name = require(desc.name.as_ref(), || self.label("union", None), "name")?;

        Ok(Union {
            name: SymbolName::pascal(name),
            ctype: desc.c_type.as_deref().map(NativeTypeToken::new),
            callables: self.callables(&desc.constructors, &desc.methods, &desc.functions)?,
            fields: collect(&desc.fields, |f| self.field(name, f))?,
        })
    }

    fn enumeration(
        &self,
        desc: &EnumDescription,
        is_bitfield: bool,
    ) -> Result<Enumeration, GenError> {
        let kind = if is_bitfield { "bitfield" } else { "enumeration" };
        let name = require(desc.name.as_ref(), || self.label(kind, None), "name")?;

        let mut members = Vec::with_capacity(desc.members.len());
        for member in &desc.members {
            let label = || match &member.name {
                Some(m) => format!("member `{}` of {} `{}.{}`", m, kind, self.key.name, name),
                None => format!("member of {} `{}.{}`", kind, self.key.name, name),
            };
            let member_name = require(member.name.as_ref(), label, "name")?;
            let c_identifier = require(member.c_identifier.as_ref(), label, "c-identifier")?;
            let value = require(member.value.as_ref(), label, "value")?;

            members.push(Member {
                name: SymbolName::pascal(member_name),
                c_identifier: c_identifier.to_string(),
                value: value.to_string(),
            });
        }

        Ok(Enumeration {
            name: SymbolName::pascal(name),
            ctype: desc.c_type.as_deref().map(NativeTypeToken::new),
            is_bitfield,
            members,
            functions: self.methods(&desc.functions, MethodKind::Function)?,
        })
    }

    fn callback(&self, desc: &CallbackDescription) -> Result<Callback, GenError> {
        let name = require(desc.name.as_ref(), || self.label("callback", None), "name")?;
        let label = self.label("callback", desc.name.as_ref());

        Ok(Callback {
            name: SymbolName::pascal(name),
            ctype: desc.c_type.as_deref().map(NativeTypeToken::new),
            return_value: self.return_value(desc.return_value.as_ref(), &label)?,
            parameters: self.parameter_list(None, &desc.parameters, &label)?,
            throws: desc.throws,
        })
    }

    fn constant(&self, desc: &ConstantDescription) -> Result<Constant, GenError> {
        let label = || self.label("constant", desc.name.as_ref());
        let name = require(desc.name.as_ref(), label, "name")?;
        let value = require(desc.value.as_ref(), label, "value")?;
        let type_ = desc.type_.as_ref().ok_or_else(|| GenError::MissingField {
            declaration: label(),
            field: "type",
        })?;

        Ok(Constant {
            name: SymbolName::pascal(name),
            c_identifier: desc.c_identifier.clone(),
            value: value.to_string(),
            type_ref: TypeReference::scalar(
                self.type_spec(type_, &label())?,
                TypeContext::Constant,
            ),
        })
    }

    fn callables(
        &self,
        constructors: &[MethodDescription],
        methods: &[MethodDescription],
        functions: &[MethodDescription],
    ) -> Result<Callables, GenError> {
        Ok(Callables {
            constructors: self.methods(constructors, MethodKind::Constructor)?,
            methods: self.methods(methods, MethodKind::Method)?,
            functions: self.methods(functions, MethodKind::Function)?,
        })
    }

    /// Build callables, leaving out those marked not introspectable.
    fn methods(
        &self,
        descs: &[MethodDescription],
        kind: MethodKind,
    ) -> Result<Vec<Method>, GenError> {
        descs
            .iter()
            .filter(|desc| {
                let keep = desc.introspectable != Some(false);
                if !keep {
                    tracing::debug!(
                        "Ignoring non-introspectable {}",
                        desc.c_identifier.as_deref().unwrap_or("callable")
                    );
                }
                keep
            })
            .map(|desc| self.method(desc, kind))
            .collect()
    }

    fn method(&self, desc: &MethodDescription, kind: MethodKind) -> Result<Method, GenError> {
        let label = || self.label("callable", desc.name.as_ref());
        let name = require(desc.name.as_ref(), label, "name")?;
        let c_identifier = require(desc.c_identifier.as_ref(), label, "c-identifier")?;
        let label = format!("`{}`", c_identifier);

        Ok(Method {
            name: SymbolName::pascal(name),
            c_identifier: c_identifier.to_string(),
            kind,
            return_value: self.return_value(desc.return_value.as_ref(), &label)?,
            parameters: self.parameter_list(
                desc.instance_parameter.as_ref(),
                &desc.parameters,
                &label,
            )?,
            throws: desc.throws,
        })
    }

    fn signal(&self, owner: &str, desc: &SignalDescription) -> Result<Signal, GenError> {
        let name = require(
            desc.name.as_ref(),
            || format!("signal of `{}.{}`", self.key.name, owner),
            "name",
        )?;
        let label = format!("signal `{}.{}::{}`", self.key.name, owner, name);

        Ok(Signal {
            name: SymbolName::pascal(name),
            return_value: self.return_value(desc.return_value.as_ref(), &label)?,
            parameters: self.parameter_list(None, &desc.parameters, &label)?,
        })
    }

    fn field(&self, owner: &str, desc: &FieldDescription) -> Result<Field, GenError> {
        let name = require(
            desc.name.as_ref(),
            || format!("field of `{}.{}`", self.key.name, owner),
            "name",
        )?;
        let label = format!("field `{}.{}.{}`", self.key.name, owner, name);

        // Inline function pointers carry no type of their own.
        let type_ref = if desc.callback.is_some() {
            TypeReference::opaque(TypeContext::Field)
        } else {
            self.type_reference(
                desc.type_.as_ref(),
                desc.array.as_ref(),
                TypeContext::Field,
                &label,
            )?
        };

        Ok(Field {
            name: SymbolName::pascal(name),
            type_ref,
            private: desc.private,
        })
    }

    fn parameter_list(
        &self,
        instance: Option<&ParameterDescription>,
        parameters: &[ParameterDescription],
        owner: &str,
    ) -> Result<ParameterList, GenError> {
        Ok(ParameterList {
            instance: instance.map(|p| self.parameter(p, owner)).transpose()?,
            parameters: parameters
                .iter()
                .map(|p| self.parameter(p, owner))
                .collect::<Result<_, _>>()?,
        })
    }

    fn parameter(&self, desc: &ParameterDescription, owner: &str) -> Result<Parameter, GenError> {
        let name = require(desc.name.as_ref(), || format!("parameter of {}", owner), "name")?;
        let label = format!("parameter `{}` of {}", name, owner);

        let transfer = desc.transfer_ownership.as_deref().ok_or_else(|| GenError::MissingField {
            declaration: label.clone(),
            field: "transfer-ownership",
        })?;
        let transfer = Transfer::parse(transfer).ok_or_else(|| GenError::InvalidField {
            declaration: label.clone(),
            field: "transfer-ownership",
            value: transfer.to_string(),
        })?;

        let direction = Direction::parse(desc.direction.as_deref()).ok_or_else(|| {
            GenError::InvalidField {
                declaration: label.clone(),
                field: "direction",
                value: desc.direction.clone().unwrap_or_default(),
            }
        })?;

        let type_ref = if desc.varargs {
            TypeReference::opaque(TypeContext::Parameter)
        } else {
            self.type_reference(
                desc.type_.as_ref(),
                desc.array.as_ref(),
                TypeContext::Parameter,
                &label,
            )?
        };

        Ok(Parameter {
            name: SymbolName::parameter(name),
            type_ref,
            direction,
            transfer,
            nullable: desc.nullable || desc.allow_none,
            caller_allocates: desc.caller_allocates,
            closure: desc.closure,
        })
    }

    fn return_value(
        &self,
        desc: Option<&ReturnValueDescription>,
        owner: &str,
    ) -> Result<ReturnValue, GenError> {
        let Some(desc) = desc else {
            return Ok(void_return());
        };

        let transfer = match desc.transfer_ownership.as_deref() {
            None => Transfer::None,
            Some(s) => Transfer::parse(s).ok_or_else(|| GenError::InvalidField {
                declaration: format!("return value of {}", owner),
                field: "transfer-ownership",
                value: s.to_string(),
            })?,
        };

        let type_ref = if desc.type_.is_none() && desc.array.is_none() {
            void_return().type_ref
        } else {
            self.type_reference(
                desc.type_.as_ref(),
                desc.array.as_ref(),
                TypeContext::ReturnValue,
                &format!("return value of {}", owner),
            )?
        };

        Ok(ReturnValue {
            type_ref,
            transfer,
            nullable: desc.nullable,
        })
    }

    fn type_reference(
        &self,
        type_: Option<&TypeDescription>,
        array: Option<&ArrayDescription>,
        context: TypeContext,
        owner: &str,
    ) -> Result<TypeReference, GenError> {
        match (type_, array) {
            (Some(type_), _) => Ok(TypeReference::scalar(
                self.type_spec(type_, owner)?,
                context,
            )),
            (None, Some(array)) => Ok(TypeReference::array(
                self.array_info(array, owner)?,
                context,
            )),
            (None, None) => Err(GenError::MissingField {
                declaration: owner.to_string(),
                field: "type",
            }),
        }
    }

    fn array_info(&self, desc: &ArrayDescription, owner: &str) -> Result<ArrayInfo, GenError> {
        Ok(ArrayInfo {
            length: desc.length,
            ctype: desc.c_type.as_deref().map(NativeTypeToken::new),
            element: desc
                .element
                .as_ref()
                .map(|element| self.type_spec(element, owner))
                .transpose()?,
        })
    }

    fn type_spec(&self, desc: &TypeDescription, owner: &str) -> Result<TypeSpec, GenError> {
        if desc.name.is_none() && desc.c_type.is_none() {
            return Err(GenError::MissingField {
                declaration: owner.to_string(),
                field: "type name or c-type",
            });
        }
        Ok(type_spec(desc))
    }
}

fn type_spec(desc: &TypeDescription) -> TypeSpec {
    TypeSpec::new(desc.name.as_deref(), desc.c_type.as_deref())
}

fn void_return() -> ReturnValue {
    ReturnValue {
        type_ref: TypeReference::scalar(
            TypeSpec::new(Some("none"), Some("void")),
            TypeContext::ReturnValue,
        ),
        transfer: Transfer::None,
        nullable: false,
    }
}

fn collect<T, U>(
    items: &[T],
    build: impl Fn(&T) -> Result<U, GenError>,
) -> Result<Vec<U>, GenError> {
    items.iter().map(build).collect()
}
