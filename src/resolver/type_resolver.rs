//! Deciding the interop representation of a type reference.
//!
//! The decision depends on the native spelling, the declared array shape and
//! whether the reference is a parameter. Results are cached in the reference
//! itself, so a reference is decided at most once.

use crate::core::{
    classify, Category, Classification, DecidedType, InteropType, NativeTypeToken, RepoId,
    StringKind, TypeReference, TypeSpec,
};
use crate::resolver::errors::GenError;
use crate::resolver::graph::{RepositoryGraph, SymbolTarget};

/// Resolves type references declared in one repository.
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'g> {
    graph: &'g RepositoryGraph,
    repo: RepoId,
}

impl<'g> TypeResolver<'g> {
    pub fn new(graph: &'g RepositoryGraph, repo: RepoId) -> Self {
        TypeResolver { graph, repo }
    }

    pub fn graph(&self) -> &'g RepositoryGraph {
        self.graph
    }

    pub fn repo(&self) -> RepoId {
        self.repo
    }

    /// Decide `reference`, reusing an earlier decision.
    pub fn resolve<'r>(&self, reference: &'r TypeReference) -> Result<&'r DecidedType, GenError> {
        if let Some(decided) = reference.decided() {
            return Ok(decided);
        }
        let decided = self.decide(reference)?;
        Ok(reference.bind(decided))
    }

    /// Decide `reference` without touching the cache.
    pub fn decide(&self, reference: &TypeReference) -> Result<DecidedType, GenError> {
        let is_parameter = reference.context.is_parameter();

        let Some(array) = &reference.array else {
            return self.resolve_spec(&reference.spec, is_parameter);
        };

        match (array.length, &array.element) {
            (Some(length), Some(element)) if element.name.is_some() || element.ctype.is_some() => {
                self.resolve_array(element, length, is_parameter)
            }
            _ => Ok(DecidedType::handle()),
        }
    }

    fn resolve_array(
        &self,
        element: &TypeSpec,
        length: usize,
        is_parameter: bool,
    ) -> Result<DecidedType, GenError> {
        let element_type = self.resolve_spec(element, is_parameter)?;

        if element_type.is_string() {
            return Ok(DecidedType::handle().by_ref());
        }

        if length == 0 || self.is_opaque_element(&element_type) {
            return Ok(DecidedType::handle());
        }

        let mut decided = element_type;
        decided.array = true;
        decided.length_index = is_parameter.then_some(length);
        Ok(decided)
    }

    /// Elements that cannot form a typed array.
    fn is_opaque_element(&self, element: &DecidedType) -> bool {
        match element.interop {
            InteropType::Handle | InteropType::Delegate => true,
            InteropType::Symbol(sref) => self.graph.is_reference_type(sref),
            InteropType::Primitive(_) | InteropType::Value | InteropType::Str(_) => element.by_ref,
        }
    }

    fn resolve_spec(&self, spec: &TypeSpec, is_parameter: bool) -> Result<DecidedType, GenError> {
        let Some(token) = spec.native_token() else {
            if spec.name.is_none() {
                // Nothing declared at all: treat as an untyped pointer.
                return Ok(DecidedType::handle());
            }
            return self.resolve_symbol(spec, false, is_parameter);
        };

        if token.is_always_opaque() {
            return Ok(DecidedType::handle().with_pointer(token.is_pointer()));
        }

        let token = self.graph.alias_hop(self.repo, &token).unwrap_or(token);
        let classification = classify(&token);

        match represent(spec, &token, classification, is_parameter)? {
            Some(decided) => Ok(decided),
            None => self.resolve_symbol(spec, classification.is_pointer, is_parameter),
        }
    }

    fn resolve_symbol(
        &self,
        spec: &TypeSpec,
        pointer: bool,
        is_parameter: bool,
    ) -> Result<DecidedType, GenError> {
        let unresolved = || GenError::UnresolvedSymbol {
            name: spec.label(),
            namespace: self.graph.repository(self.repo).key().canonical_name(),
        };
        let name = spec.name.as_deref().ok_or_else(unresolved)?;

        match self.graph.resolve_type_name(self.repo, name)? {
            SymbolTarget::Symbol(sref) => {
                Ok(DecidedType::of(InteropType::Symbol(sref)).with_pointer(pointer))
            }
            SymbolTarget::Native(target) => {
                let token = target.native_token().ok_or_else(unresolved)?;
                let mut classification = classify(&token);
                classification.is_pointer |= pointer;

                represent(&target, &token, classification, is_parameter)?.ok_or_else(unresolved)
            }
        }
    }
}

/// Representation of a classified token, or `None` when the token names a
/// declared symbol.
fn represent(
    spec: &TypeSpec,
    token: &NativeTypeToken,
    classification: Classification,
    is_parameter: bool,
) -> Result<Option<DecidedType>, GenError> {
    let interop = match classification.category {
        Category::NotSupported => {
            return Err(GenError::UnsupportedType {
                ctype: token.to_string(),
            })
        }
        Category::NotFound | Category::ReferenceCountedHandle => return Ok(None),
        Category::Primitive(kind) => InteropType::Primitive(kind),
        Category::StructuredValue => InteropType::Value,
        Category::String => InteropType::Str(string_kind(spec)),
        Category::OpaqueHandle => InteropType::Handle,
        Category::Callback => InteropType::Delegate,
    };

    Ok(Some(fix_representation(interop, classification, is_parameter)))
}

/// Adjust for pointers: parameters take strings directly, pointers to
/// primitives pass by reference and every other pointer is a handle.
fn fix_representation(
    interop: InteropType,
    classification: Classification,
    is_parameter: bool,
) -> DecidedType {
    let pointer = classification.is_pointer;

    match (interop, is_parameter, pointer, classification.is_primitive) {
        (InteropType::Str(_), true, _, _) => DecidedType::of(interop).with_pointer(pointer),
        (_, _, true, true) => DecidedType::of(interop).with_pointer(true).by_ref(),
        (_, _, true, false) => DecidedType::handle().with_pointer(true),
        (_, _, false, _) => DecidedType::of(interop),
    }
}

fn string_kind(spec: &TypeSpec) -> StringKind {
    match spec.name.as_deref() {
        Some("filename") => StringKind::Platform,
        _ => StringKind::Utf8,
    }
}
