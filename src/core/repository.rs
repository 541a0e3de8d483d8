//! Repositories: a namespace plus its includes.

use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;

use crate::core::alias::AliasTable;
use crate::core::namespace::{Namespace, NamespaceKey};
use crate::resolver::errors::GenError;

/// Index of a repository inside a [`RepositoryGraph`](crate::resolver::RepositoryGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RepoId(pub usize);

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A dependency on another repository by name and version.
///
/// The binding is write-once: it starts empty, is set during linking, and
/// reading it before that is an error.
#[derive(Debug)]
pub struct Include {
    pub key: NamespaceKey,
    /// Canonical name of the repository declaring this include.
    owner: String,
    resolved: OnceLock<RepoId>,
}

impl Include {
    pub fn new(key: NamespaceKey, owner: impl Into<String>) -> Self {
        Include {
            key,
            owner: owner.into(),
            resolved: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    /// Bind the include. Binding again to the same repository is a no-op.
    pub fn resolve(&self, repository: RepoId) -> Result<(), GenError> {
        let bound = *self.resolved.get_or_init(|| repository);
        if bound == repository {
            Ok(())
        } else {
            Err(GenError::IncludeRebound {
                include: self.key.canonical_name(),
            })
        }
    }

    /// The bound repository.
    pub fn resolved_repository(&self) -> Result<RepoId, GenError> {
        self.resolved
            .get()
            .copied()
            .ok_or_else(|| GenError::UnresolvedDependency {
                include: self.key.canonical_name(),
                required_by: self.owner.clone(),
            })
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    pub fn canonical_name(&self) -> String {
        self.key.canonical_name()
    }
}

/// One namespace together with the repositories it depends on.
#[derive(Debug)]
pub struct Repository {
    pub namespace: Namespace,
    pub includes: Vec<Include>,
    aliases: AliasTable,
}

impl Repository {
    pub fn new(namespace: Namespace, includes: Vec<NamespaceKey>) -> Self {
        let owner = namespace.key.canonical_name();
        let includes = includes
            .into_iter()
            .map(|key| Include::new(key, owner.clone()))
            .collect();
        let aliases = AliasTable::from_aliases(&namespace.aliases);

        Repository {
            namespace,
            includes,
            aliases,
        }
    }

    pub fn key(&self) -> &NamespaceKey {
        &self.namespace.key
    }

    /// Native alias table of this namespace only.
    pub fn alias_table(&self) -> &AliasTable {
        &self.aliases
    }

    /// Check if every include is bound.
    pub fn is_linked(&self) -> bool {
        self.includes.iter().all(Include::is_resolved)
    }
}
