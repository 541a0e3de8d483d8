//! Parameters, parameter lists and return values.

use std::fmt;

use serde::Serialize;

use crate::core::naming::SymbolName;
use crate::core::type_ref::TypeReference;

/// Data flow direction of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    In,
    Out,
    /// In and out (`inout`).
    Ref,
}

impl Direction {
    /// Parse a direction attribute. Absent means `in`.
    pub fn parse(s: Option<&str>) -> Option<Self> {
        match s {
            None | Some("in") => Some(Direction::In),
            Some("out") => Some(Direction::Out),
            Some("inout") | Some("ref") => Some(Direction::Ref),
            Some(_) => None,
        }
    }
}

/// Who releases a value after the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transfer {
    #[default]
    None,
    Container,
    Full,
}

impl Transfer {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Transfer::None),
            "container" => Some(Transfer::Container),
            "full" => Some(Transfer::Full),
            _ => None,
        }
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transfer::None => write!(f, "none"),
            Transfer::Container => write!(f, "container"),
            Transfer::Full => write!(f, "full"),
        }
    }
}

/// A function or callback parameter.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: SymbolName,
    pub type_ref: TypeReference,
    pub direction: Direction,
    pub transfer: Transfer,
    pub nullable: bool,
    /// Only meaningful for `Direction::Out`.
    pub caller_allocates: bool,
    /// Index of the user-data parameter belonging to this callback parameter.
    pub closure: Option<usize>,
}

/// Parameters of one callable, the instance parameter kept apart.
#[derive(Debug, Clone, Default)]
pub struct ParameterList {
    pub instance: Option<Parameter>,
    pub parameters: Vec<Parameter>,
}

impl ParameterList {
    /// Offset added to declared parameter indices in native signatures.
    pub fn instance_offset(&self) -> usize {
        usize::from(self.instance.is_some())
    }

    /// All parameters in native order: instance first.
    pub fn native_order(&self) -> impl Iterator<Item = &Parameter> {
        self.instance.iter().chain(self.parameters.iter())
    }

    /// Parameters visible in managed signatures.
    ///
    /// Parameters referenced as user data by another parameter's closure
    /// index are excluded.
    pub fn managed(&self) -> Vec<&Parameter> {
        let excluded: Vec<usize> = self
            .parameters
            .iter()
            .filter_map(|p| p.closure)
            .filter(|&index| index != 0)
            .collect();

        self.parameters
            .iter()
            .enumerate()
            .filter(|(index, _)| !excluded.contains(index))
            .map(|(_, p)| p)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.instance.is_none() && self.parameters.is_empty()
    }
}

/// Return value of a callable.
#[derive(Debug, Clone)]
pub struct ReturnValue {
    pub type_ref: TypeReference,
    pub transfer: Transfer,
    pub nullable: bool,
}
