//! Emitted declarations.
//!
//! The emitter turns model declarations into render-ready records: every
//! type name, decoration, nullability suffix and marshalling attribute is
//! decided here, so a renderer only has to concatenate.

use std::fmt;

use serde::Serialize;

use crate::core::naming::to_pascal_case;
use crate::core::{
    classify, Callback, Category, Class, Constant, DecidedType, Enumeration, Field, InteropType,
    Method, MethodKind, Namespace, NativeTypeToken, Parameter, ParameterList, RepoId, ReturnValue,
    Signal, SymbolName, Transfer,
};
use crate::interop::decision::{DecisionEngine, ParameterDecision, ReturnDecision, Target};
use crate::resolver::{GenError, RepositoryGraph, TypeResolver};

/// One rendered parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmittedParameter {
    /// Marshalling attribute; empty when none applies.
    pub attribute: String,
    /// Type with direction keyword and nullability suffix.
    pub type_name: String,
    pub name: String,
}

impl fmt::Display for EmittedParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.attribute.is_empty() {
            write!(f, "{} {}", self.type_name, self.name)
        } else {
            write!(f, "{} {} {}", self.attribute, self.type_name, self.name)
        }
    }
}

fn join(parameters: &[EmittedParameter]) -> String {
    parameters
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A function, method or constructor in both signatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmittedSignature {
    /// `Namespace[.Owner].name`
    pub identifier: String,
    pub kind: MethodKind,
    pub managed_name: String,
    pub entry_point: String,
    pub library: String,
    pub summary: Vec<String>,
    pub native_return: String,
    pub managed_return: String,
    pub native_parameters: Vec<EmittedParameter>,
    pub managed_parameters: Vec<EmittedParameter>,
    pub throws: bool,
}

impl EmittedSignature {
    /// Native import declaration.
    pub fn native_declaration(&self) -> String {
        format!(
            "public static extern {} {}({});",
            self.native_return,
            self.managed_name,
            join(&self.native_parameters)
        )
    }

    pub fn managed_declaration(&self) -> String {
        format!(
            "public {} {}({})",
            self.managed_return,
            self.managed_name,
            join(&self.managed_parameters)
        )
    }
}

/// A callback type, native side only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmittedCallback {
    pub identifier: String,
    pub managed_name: String,
    pub native_return: String,
    pub parameters: Vec<EmittedParameter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignalArgument {
    /// Position in the signal's argument vector; 0 is the emitter.
    pub index: usize,
    pub type_name: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmittedSignal {
    pub identifier: String,
    pub managed_name: String,
    pub return_type: String,
    pub arguments: Vec<SignalArgument>,
}

/// Output folder of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Folder {
    Classes,
    Interfaces,
    Records,
    Unions,
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Folder::Classes => "Classes",
            Folder::Interfaces => "Interfaces",
            Folder::Records => "Records",
            Folder::Unions => "Unions",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmittedField {
    pub type_name: String,
    pub name: String,
    pub private: bool,
}

/// Native memory layout of a struct-like declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmittedLayout {
    pub identifier: String,
    pub managed_name: String,
    pub native_name: Option<String>,
    pub folder: Folder,
    /// Managed names of the parent class and implemented interfaces,
    /// parent first.
    pub inheritance: Vec<String>,
    pub fields: Vec<EmittedField>,
}

impl EmittedLayout {
    /// `: Parent, IFace`, or empty without a base.
    pub fn inheritance_clause(&self) -> String {
        if self.inheritance.is_empty() {
            String::new()
        } else {
            format!(": {}", self.inheritance.join(", "))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmittedMember {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmittedEnumeration {
    pub identifier: String,
    pub managed_name: String,
    pub flags: bool,
    pub members: Vec<EmittedMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmittedConstant {
    pub identifier: String,
    pub managed_name: String,
    pub type_name: String,
    pub value: String,
}

/// Any emitted declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Declaration {
    Function(EmittedSignature),
    Callback(EmittedCallback),
    Signal(EmittedSignal),
    Layout(EmittedLayout),
    Enumeration(EmittedEnumeration),
    Constant(EmittedConstant),
}

impl Declaration {
    pub fn identifier(&self) -> &str {
        match self {
            Declaration::Function(d) => &d.identifier,
            Declaration::Callback(d) => &d.identifier,
            Declaration::Signal(d) => &d.identifier,
            Declaration::Layout(d) => &d.identifier,
            Declaration::Enumeration(d) => &d.identifier,
            Declaration::Constant(d) => &d.identifier,
        }
    }
}

/// Emits the declarations of one repository.
#[derive(Debug, Clone, Copy)]
pub struct Emitter<'g> {
    engine: DecisionEngine<'g>,
}

impl<'g> Emitter<'g> {
    pub fn new(graph: &'g RepositoryGraph, repo: RepoId) -> Self {
        Emitter {
            engine: DecisionEngine::new(TypeResolver::new(graph, repo)),
        }
    }

    fn graph(&self) -> &'g RepositoryGraph {
        self.engine.resolver().graph()
    }

    fn repo(&self) -> RepoId {
        self.engine.resolver().repo()
    }

    fn namespace(&self) -> &'g Namespace {
        &self.graph().repository(self.repo()).namespace
    }

    /// `Namespace.name` or `Namespace.Owner.name`.
    pub fn identifier(&self, owner: Option<&SymbolName>, name: &str) -> String {
        match owner {
            Some(owner) => format!("{}.{}.{}", self.namespace().name(), owner.native, name),
            None => format!("{}.{}", self.namespace().name(), name),
        }
    }

    /// Type name of a decided type.
    pub fn render_type(&self, decided: &DecidedType, target: Target) -> String {
        let graph = self.graph();

        let base = match decided.interop {
            InteropType::Primitive(kind) => kind.as_interop().to_string(),
            InteropType::Value => "GObject.Value".to_string(),
            InteropType::Str(_) => "string".to_string(),
            InteropType::Handle => "IntPtr".to_string(),
            InteropType::Delegate => "Delegate".to_string(),
            InteropType::Symbol(sref) => match target {
                Target::Native if graph.is_reference_type(sref) => "IntPtr".to_string(),
                _ => graph.managed_type_name(sref, self.repo()),
            },
        };

        let base = if decided.array {
            format!("{}[]", base)
        } else {
            base
        };

        if decided.by_ref {
            format!("ref {}", base)
        } else {
            base
        }
    }

    fn parameter(
        &self,
        parameter: &Parameter,
        decision: &ParameterDecision,
        target: Target,
    ) -> EmittedParameter {
        EmittedParameter {
            attribute: decision.hint.map(|h| h.attribute()).unwrap_or_default(),
            type_name: format!(
                "{}{}{}",
                decision.decoration.as_prefix(),
                self.render_type(&decision.decided, target),
                if decision.nullable { "?" } else { "" }
            ),
            name: parameter.name.managed.clone(),
        }
    }

    fn return_type(&self, decision: &ReturnDecision, target: Target) -> String {
        let name = self.render_type(&decision.decided, target);
        if decision.nullable && !decision.decided.is_void() {
            format!("{}?", name)
        } else {
            name
        }
    }

    fn native_parameters(
        &self,
        parameters: &ParameterList,
        throws: bool,
    ) -> Result<Vec<EmittedParameter>, GenError> {
        let offset = parameters.instance_offset();
        let mut emitted = Vec::with_capacity(parameters.parameters.len() + 2);

        if let Some(instance) = &parameters.instance {
            let decision = self.engine.decide_instance(instance, Target::Native)?;
            emitted.push(self.parameter(instance, &decision, Target::Native));
        }

        for parameter in &parameters.parameters {
            let decision = self.engine.decide(parameter, Target::Native, offset)?;
            emitted.push(self.parameter(parameter, &decision, Target::Native));
        }

        if throws {
            emitted.push(EmittedParameter {
                attribute: String::new(),
                type_name: "out IntPtr".to_string(),
                name: "error".to_string(),
            });
        }

        Ok(emitted)
    }

    fn managed_parameters(
        &self,
        parameters: &ParameterList,
    ) -> Result<Vec<EmittedParameter>, GenError> {
        parameters
            .managed()
            .into_iter()
            .map(|parameter| {
                let decision = self.engine.decide(parameter, Target::Managed, 0)?;
                Ok(self.parameter(parameter, &decision, Target::Managed))
            })
            .collect::<Result<Vec<_>, GenError>>()
    }

    fn summary(&self, method: &Method) -> Vec<String> {
        let mut lines = vec![format!("Calls native method {}.", method.c_identifier)];
        for parameter in method.parameters.native_order() {
            lines.push(describe(&parameter.name.native, parameter.transfer, parameter.nullable));
        }
        let ReturnValue {
            transfer, nullable, ..
        } = &method.return_value;
        lines.push(describe("returns", *transfer, *nullable));
        lines
    }

    /// Emit a function, method or constructor.
    pub fn emit_function(
        &self,
        owner: Option<&SymbolName>,
        method: &Method,
    ) -> Result<EmittedSignature, GenError> {
        let native_return = self.engine.decide_return(&method.return_value, Target::Native)?;
        let managed_return = self.engine.decide_return(&method.return_value, Target::Managed)?;

        let namespace = self.namespace();
        Ok(EmittedSignature {
            identifier: self.identifier(owner, &method.name.native),
            kind: method.kind,
            managed_name: method.name.managed.clone(),
            entry_point: method.c_identifier.clone(),
            library: namespace
                .shared_library
                .clone()
                .unwrap_or_else(|| namespace.name().to_string()),
            summary: self.summary(method),
            native_return: self.return_type(&native_return, Target::Native),
            managed_return: self.return_type(&managed_return, Target::Managed),
            native_parameters: self.native_parameters(&method.parameters, method.throws)?,
            managed_parameters: self.managed_parameters(&method.parameters)?,
            throws: method.throws,
        })
    }

    pub fn emit_callback(&self, callback: &Callback) -> Result<EmittedCallback, GenError> {
        let native_return = self.engine.decide_return(&callback.return_value, Target::Native)?;

        Ok(EmittedCallback {
            identifier: self.identifier(None, &callback.name.native),
            managed_name: callback.name.managed.clone(),
            native_return: self.return_type(&native_return, Target::Native),
            parameters: self.native_parameters(&callback.parameters, callback.throws)?,
        })
    }

    pub fn emit_signal(
        &self,
        owner: &SymbolName,
        signal: &Signal,
    ) -> Result<EmittedSignal, GenError> {
        let return_value = self.engine.decide_return(&signal.return_value, Target::Native)?;

        let mut arguments = Vec::with_capacity(signal.parameters.parameters.len());
        for (i, parameter) in signal.parameters.parameters.iter().enumerate() {
            let decision = self.engine.decide(parameter, Target::Native, 0)?;
            arguments.push(SignalArgument {
                index: i + 1,
                type_name: self.render_type(&decision.decided, Target::Native),
                name: to_pascal_case(&parameter.name.native),
            });
        }

        Ok(EmittedSignal {
            identifier: format!(
                "{}.{}::{}",
                self.namespace().name(),
                owner.native,
                signal.name.native
            ),
            managed_name: signal.name.managed.clone(),
            return_type: self.return_type(&return_value, Target::Native),
            arguments,
        })
    }

    /// Emit the field layout of a struct-like declaration.
    pub fn emit_layout(
        &self,
        identifier: String,
        name: &SymbolName,
        ctype: Option<&NativeTypeToken>,
        fields: &[Field],
        folder: Folder,
    ) -> Result<EmittedLayout, GenError> {
        let resolver = self.engine.resolver();

        let fields = fields
            .iter()
            .map(|field| {
                let decided = resolver.resolve(&field.type_ref)?;
                Ok(EmittedField {
                    type_name: self.render_type(decided, Target::Native),
                    name: field.name.managed.clone(),
                    private: field.private,
                })
            })
            .collect::<Result<Vec<_>, GenError>>()?;

        Ok(EmittedLayout {
            identifier,
            managed_name: name.managed.clone(),
            native_name: ctype.map(ToString::to_string),
            folder,
            inheritance: Vec::new(),
            fields,
        })
    }

    /// Emit the instance layout of a class together with its base types.
    pub fn emit_class_layout(
        &self,
        identifier: String,
        class: &Class,
    ) -> Result<EmittedLayout, GenError> {
        let mut layout = self.emit_layout(
            identifier,
            &class.name,
            class.ctype.as_ref(),
            &class.fields,
            Folder::Classes,
        )?;

        layout.inheritance = class
            .parent
            .iter()
            .chain(class.implements.iter())
            .map(|name| {
                let sref = self.graph().lookup_symbol(self.repo(), name)?;
                Ok(self.graph().managed_type_name(sref, self.repo()))
            })
            .collect::<Result<Vec<_>, GenError>>()?;

        Ok(layout)
    }

    pub fn emit_enumeration(&self, enumeration: &Enumeration) -> EmittedEnumeration {
        EmittedEnumeration {
            identifier: self.identifier(None, &enumeration.name.native),
            managed_name: enumeration.name.managed.clone(),
            flags: enumeration.is_bitfield,
            members: enumeration
                .members
                .iter()
                .map(|m| EmittedMember {
                    name: m.name.managed.clone(),
                    value: m.value.clone(),
                })
                .collect(),
        }
    }

    pub fn emit_constant(&self, constant: &Constant) -> Result<EmittedConstant, GenError> {
        let decided = self.engine.resolver().resolve(&constant.type_ref)?;

        // Constants keep strings as literals.
        let is_string = constant
            .type_ref
            .spec
            .native_token()
            .is_some_and(|token| classify(&token).category == Category::String);
        let type_name = if is_string {
            "string".to_string()
        } else {
            self.render_type(decided, Target::Native)
        };

        Ok(EmittedConstant {
            identifier: self.identifier(None, &constant.name.native),
            managed_name: constant.name.managed.clone(),
            type_name,
            value: constant.value.clone(),
        })
    }
}

fn describe(name: &str, transfer: Transfer, nullable: bool) -> String {
    format!("{}: transfer ownership {}, nullable {}", name, transfer, nullable)
}
