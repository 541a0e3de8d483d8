//! Per-parameter interop decisions.
//!
//! For every parameter and target signature the engine decides the
//! direction decoration, the nullability and an optional marshalling hint.
//! Managed signatures use the declared metadata; native signatures force
//! non-nullable for everything marshalled as an address.

use std::fmt;

use serde::Serialize;

use crate::core::{
    Category, DecidedType, Direction, InteropType, Parameter, ReturnValue, StringKind,
    TypeReference,
};
use crate::resolver::{GenError, TypeResolver};

/// Which side of the binding a signature is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Managed,
    Native,
}

/// Direction keyword in front of a parameter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decoration {
    None,
    Ref,
    Out,
}

impl Decoration {
    /// Source prefix, including the trailing space.
    pub fn as_prefix(&self) -> &'static str {
        match self {
            Decoration::None => "",
            Decoration::Ref => "ref ",
            Decoration::Out => "out ",
        }
    }
}

/// Marshalling attribute attached to a native parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarshalHint {
    /// Array whose element count is passed in the parameter at this index.
    SizedArray { size_param_index: usize },
    Utf8String,
    /// Marshalled in the platform encoding, which matches the native
    /// file-system encoding only on some platforms.
    PlatformString,
}

impl MarshalHint {
    pub fn attribute(&self) -> String {
        match self {
            MarshalHint::SizedArray { size_param_index } => format!(
                "[MarshalAs(UnmanagedType.LPArray, SizeParamIndex={})]",
                size_param_index
            ),
            MarshalHint::Utf8String => "[MarshalAs(UnmanagedType.LPUTF8Str)]".to_string(),
            MarshalHint::PlatformString => "[MarshalAs(UnmanagedType.LPStr)]".to_string(),
        }
    }
}

impl fmt::Display for MarshalHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.attribute())
    }
}

/// Everything decided about one parameter for one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParameterDecision {
    pub decoration: Decoration,
    pub nullable: bool,
    pub hint: Option<MarshalHint>,
    /// Representation after decoration; never both decorated and by-ref.
    pub decided: DecidedType,
}

/// Decision for a return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReturnDecision {
    pub nullable: bool,
    pub decided: DecidedType,
}

/// Direction decoration from direction, array-ness and caller allocation.
pub fn direction_decoration(parameter: &Parameter) -> Decoration {
    match (
        parameter.direction,
        parameter.type_ref.is_array(),
        parameter.caller_allocates,
    ) {
        (Direction::Ref, true, _) => Decoration::None,
        (Direction::Ref, false, _) => Decoration::Ref,
        (Direction::Out, _, true) => Decoration::Ref,
        (Direction::Out, _, false) => Decoration::Out,
        (Direction::In, _, _) => Decoration::None,
    }
}

/// Decides parameters and return values of callables in one repository.
#[derive(Debug, Clone, Copy)]
pub struct DecisionEngine<'g> {
    resolver: TypeResolver<'g>,
}

impl<'g> DecisionEngine<'g> {
    pub fn new(resolver: TypeResolver<'g>) -> Self {
        DecisionEngine { resolver }
    }

    pub fn resolver(&self) -> &TypeResolver<'g> {
        &self.resolver
    }

    /// Decide one parameter.
    ///
    /// `instance_offset` is added to declared length indices: it is 1 in
    /// native signatures of instance methods, 0 otherwise.
    pub fn decide(
        &self,
        parameter: &Parameter,
        target: Target,
        instance_offset: usize,
    ) -> Result<ParameterDecision, GenError> {
        let mut decided = *self.resolver.resolve(&parameter.type_ref)?;

        if decided.is_void() {
            decided = DecidedType::handle();
        }

        let decoration = direction_decoration(parameter);
        if decoration != Decoration::None {
            decided.by_ref = false;
        }

        Ok(ParameterDecision {
            decoration,
            nullable: self.parameter_nullable(parameter, &decided, target),
            hint: self.hint(parameter, &decided, target, instance_offset),
            decided,
        })
    }

    /// Decide the instance parameter. It never carries a decoration.
    pub fn decide_instance(
        &self,
        parameter: &Parameter,
        target: Target,
    ) -> Result<ParameterDecision, GenError> {
        let decided = *self.resolver.resolve(&parameter.type_ref)?;

        Ok(ParameterDecision {
            decoration: Decoration::None,
            nullable: self.parameter_nullable(parameter, &decided, target),
            hint: None,
            decided,
        })
    }

    pub fn decide_return(
        &self,
        return_value: &ReturnValue,
        target: Target,
    ) -> Result<ReturnDecision, GenError> {
        let decided = *self.resolver.resolve(&return_value.type_ref)?;
        let nullable = match target {
            Target::Managed => return_value.nullable,
            Target::Native => {
                return_value.nullable
                    && !self.forced_non_nullable(&return_value.type_ref, &decided)
            }
        };

        Ok(ReturnDecision { nullable, decided })
    }

    fn parameter_nullable(
        &self,
        parameter: &Parameter,
        decided: &DecidedType,
        target: Target,
    ) -> bool {
        match target {
            Target::Managed => parameter.nullable,
            Target::Native => {
                parameter.nullable && !self.forced_non_nullable(&parameter.type_ref, decided)
            }
        }
    }

    /// Native signatures cannot mark address-like values nullable.
    fn forced_non_nullable(&self, reference: &TypeReference, decided: &DecidedType) -> bool {
        let graph = self.resolver.graph();

        decided.is_opaque_handle()
            || reference.is_array()
            || decided.array
            || decided
                .symbol()
                .is_some_and(|sref| graph.is_reference_type(sref))
            || (reference.is_pointer() && self.is_primitive_value(decided))
    }

    fn is_primitive_value(&self, decided: &DecidedType) -> bool {
        match decided.interop {
            InteropType::Primitive(_) | InteropType::Value => true,
            InteropType::Symbol(sref) => matches!(
                self.resolver.graph().category_of(sref),
                Category::Primitive(_) | Category::StructuredValue
            ),
            InteropType::Str(_) | InteropType::Handle | InteropType::Delegate => false,
        }
    }

    fn hint(
        &self,
        parameter: &Parameter,
        decided: &DecidedType,
        target: Target,
        instance_offset: usize,
    ) -> Option<MarshalHint> {
        if target == Target::Managed {
            return None;
        }

        match (decided.interop, decided.length_index) {
            (_, Some(index)) if decided.array => Some(MarshalHint::SizedArray {
                size_param_index: index + instance_offset,
            }),
            (InteropType::Str(StringKind::Utf8), _) if !decided.array => {
                Some(MarshalHint::Utf8String)
            }
            (InteropType::Str(StringKind::Platform), _) if !decided.array => {
                Some(MarshalHint::PlatformString)
            }
            _ => None,
        }
    }
}
