//! Type aliases and the native alias table.

use std::collections::HashMap;

use crate::core::ctype::NativeTypeToken;
use crate::core::naming::SymbolName;
use crate::core::type_ref::TypeReference;

/// A declared alternate name for an existing type (`typedef gint GPid`).
#[derive(Debug, Clone)]
pub struct Alias {
    pub name: SymbolName,
    pub ctype: NativeTypeToken,
    pub target: TypeReference,
}

/// Maps alias spellings to the native spelling of their targets.
///
/// Lookups follow a single hop. Chasing alias chains happens on symbol
/// links in the repository graph, which detects cycles.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<NativeTypeToken, NativeTypeToken>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from declared aliases. Aliases whose target has no
    /// native spelling are skipped.
    pub fn from_aliases<'a>(aliases: impl IntoIterator<Item = &'a Alias>) -> Self {
        let mut table = AliasTable::new();
        for alias in aliases {
            if let Some(target) = alias.target.ctype() {
                table.insert(alias.ctype.clone(), target.clone());
            }
        }
        table
    }

    pub fn insert(&mut self, from: NativeTypeToken, to: NativeTypeToken) {
        self.entries.insert(from, to);
    }

    /// Substitute one alias hop.
    ///
    /// Pointer markers on the looked-up spelling carry over to the target:
    /// `GPid*` resolves to `gint*` when `GPid` aliases `gint`.
    pub fn try_resolve(&self, token: &NativeTypeToken) -> Option<NativeTypeToken> {
        if let Some(target) = self.entries.get(token) {
            return Some(target.clone());
        }

        let depth = token.pointer_depth();
        if depth == 0 {
            return None;
        }

        let base = NativeTypeToken::new(token.base());
        self.entries
            .get(&base)
            .map(|target| NativeTypeToken::new(format!("{}{}", target, "*".repeat(depth))))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
