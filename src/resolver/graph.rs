//! The repository graph.
//!
//! Repositories are registered once, then linked: every include is bound to
//! the repository declaring its namespace, in dependency order. After
//! linking the graph is read-only and can be shared across threads.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction as EdgeDirection;

use crate::core::naming::split_qualified;
use crate::core::{
    classify, Category, NamespaceKey, NativeTypeToken, PrimitiveKind, RecordKind, RepoId,
    Repository, SymbolKind, SymbolRef, TypeSpec,
};
use crate::description::RepositoryDescription;
use crate::resolver::errors::GenError;
use crate::resolver::factory::{self, include_key, namespace_key};

/// Where a type name leads after following symbol-level aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolTarget {
    /// A declared, non-alias symbol.
    Symbol(SymbolRef),
    /// An alias chain ending in a native spelling.
    Native(TypeSpec),
}

/// All repositories of one run and the include edges between them.
#[derive(Debug, Default)]
pub struct RepositoryGraph {
    repositories: Vec<Repository>,
    by_key: HashMap<NamespaceKey, RepoId>,
    /// Edge `a -> b`: `b` includes `a`.
    graph: DiGraph<RepoId, ()>,
    nodes: Vec<NodeIndex>,
    order: Vec<RepoId>,
}

impl RepositoryGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and link every description, dependencies first.
    ///
    /// Fails on the first structural error: a missing attribute, an include
    /// no description provides, or an include cycle.
    pub fn build(descriptions: &[RepositoryDescription]) -> Result<Self, GenError> {
        let mut entries = Vec::with_capacity(descriptions.len());
        for desc in descriptions {
            let key = namespace_key(&desc.namespace)?;
            let includes = desc
                .includes
                .iter()
                .map(|include| include_key(include, &key))
                .collect::<Result<Vec<_>, _>>()?;
            entries.push((key, includes));
        }

        let order = dependency_order(&entries)?;

        let mut graph = RepositoryGraph::new();
        for index in order {
            let repository = factory::build_repository(&descriptions[index])?;
            tracing::debug!("Registered {}", repository.key());
            graph.register(repository)?;
        }
        graph.link()?;

        Ok(graph)
    }

    /// Add a repository. Its includes stay unbound until [`link`](Self::link).
    pub fn register(&mut self, repository: Repository) -> Result<RepoId, GenError> {
        let key = repository.key().clone();
        if self.by_key.contains_key(&key) {
            return Err(GenError::DuplicateNamespace {
                namespace: key.canonical_name(),
            });
        }

        let id = RepoId(self.repositories.len());
        self.nodes.push(self.graph.add_node(id));
        self.by_key.insert(key, id);
        self.repositories.push(repository);

        Ok(id)
    }

    /// Bind every include of every registered repository.
    ///
    /// Binding is write-once, so linking again only checks that nothing
    /// changed.
    pub fn link(&mut self) -> Result<(), GenError> {
        let entries: Vec<_> = self
            .repositories
            .iter()
            .map(|r| {
                let includes = r.includes.iter().map(|i| i.key.clone()).collect();
                (r.key().clone(), includes)
            })
            .collect();

        let order = dependency_order(&entries)?;

        for &index in &order {
            for include in &self.repositories[index].includes {
                let target = self.by_key.get(&include.key).copied().ok_or_else(|| {
                    GenError::UnresolvedDependency {
                        include: include.canonical_name(),
                        required_by: self.repositories[index].key().canonical_name(),
                    }
                })?;
                include.resolve(target)?;
                self.graph
                    .update_edge(self.nodes[target.0], self.nodes[index], ());
            }
        }

        self.order = order.into_iter().map(RepoId).collect();
        tracing::debug!("Linked {} repositories", self.order.len());

        Ok(())
    }

    pub fn repository(&self, id: RepoId) -> &Repository {
        &self.repositories[id.0]
    }

    pub fn repositories(&self) -> impl Iterator<Item = (RepoId, &Repository)> {
        self.repositories
            .iter()
            .enumerate()
            .map(|(i, r)| (RepoId(i), r))
    }

    pub fn find(&self, key: &NamespaceKey) -> Option<RepoId> {
        self.by_key.get(key).copied()
    }

    /// Repositories in dependency order, empty before linking.
    pub fn build_order(&self) -> &[RepoId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    /// Direct includes of `id`.
    pub fn dependencies(&self, id: RepoId) -> Vec<RepoId> {
        self.neighbors(id, EdgeDirection::Incoming)
    }

    /// Repositories including `id` directly.
    pub fn dependents(&self, id: RepoId) -> Vec<RepoId> {
        self.neighbors(id, EdgeDirection::Outgoing)
    }

    fn neighbors(&self, id: RepoId, direction: EdgeDirection) -> Vec<RepoId> {
        let mut ids: Vec<RepoId> = self
            .graph
            .neighbors_directed(self.nodes[id.0], direction)
            .map(|n| self.graph[n])
            .collect();
        ids.sort();
        ids
    }

    /// Find a type symbol by name, as seen from `from`.
    ///
    /// Unqualified names are searched in `from` first, then in its includes,
    /// breadth first. Qualified names (`Gio.File`) are searched in the named
    /// namespace only. Reaching an unbound include that could hold the name
    /// is an error.
    pub fn lookup_symbol(&self, from: RepoId, name: &str) -> Result<SymbolRef, GenError> {
        let repository = self.repository(from);
        let (qualifier, local) = split_qualified(name);
        let unresolved = || GenError::UnresolvedSymbol {
            name: name.to_string(),
            namespace: repository.key().canonical_name(),
        };

        if qualifier.is_none() || qualifier == Some(repository.namespace.name()) {
            if let Some(found) = self.find_in(from, local) {
                return Ok(found);
            }
            if qualifier.is_some() {
                return Err(unresolved());
            }
        }

        let mut queue = VecDeque::from([from]);
        let mut visited = HashSet::from([from]);

        while let Some(current) = queue.pop_front() {
            for include in &self.repository(current).includes {
                let candidate = qualifier.map_or(true, |q| q == include.name());
                let id = match include.resolved_repository() {
                    Ok(id) => id,
                    Err(e) if candidate => return Err(e),
                    Err(_) => continue,
                };
                if !visited.insert(id) {
                    continue;
                }
                if candidate {
                    if let Some(found) = self.find_in(id, local) {
                        return Ok(found);
                    }
                }
                queue.push_back(id);
            }
        }

        Err(unresolved())
    }

    fn find_in(&self, repo: RepoId, name: &str) -> Option<SymbolRef> {
        self.repository(repo)
            .namespace
            .lookup(name)
            .map(|(kind, index)| SymbolRef { repo, kind, index })
    }

    /// Look up `name` and follow aliases until a non-alias symbol or a
    /// native spelling is reached.
    pub fn resolve_type_name(&self, from: RepoId, name: &str) -> Result<SymbolTarget, GenError> {
        let mut current = self.lookup_symbol(from, name)?;
        let mut chain = vec![self.qualified_name(current)];
        let mut seen = HashSet::from([current]);

        while current.kind == SymbolKind::Alias {
            let alias = &self.repository(current.repo).namespace.aliases[current.index];
            let target = &alias.target.spec;

            let native = target
                .native_token()
                .is_some_and(|token| classify(&token).category != Category::NotFound);
            let next_name = match (&target.name, native) {
                (Some(next), false) => next,
                _ => return Ok(SymbolTarget::Native(target.clone())),
            };

            let next = self.lookup_symbol(current.repo, next_name)?;
            chain.push(self.qualified_name(next));
            if !seen.insert(next) {
                return Err(GenError::AliasCycle { chain });
            }
            current = next;
        }

        Ok(SymbolTarget::Symbol(current))
    }

    /// One-hop native alias lookup in `from` and its includes.
    pub fn alias_hop(&self, from: RepoId, token: &NativeTypeToken) -> Option<NativeTypeToken> {
        let mut queue = VecDeque::from([from]);
        let mut visited = HashSet::from([from]);

        while let Some(current) = queue.pop_front() {
            let repository = self.repository(current);
            if let Some(resolved) = repository.alias_table().try_resolve(token) {
                return Some(resolved);
            }
            for include in &repository.includes {
                if let Ok(id) = include.resolved_repository() {
                    if visited.insert(id) {
                        queue.push_back(id);
                    }
                }
            }
        }

        None
    }

    /// `Namespace.Name` of a symbol.
    pub fn qualified_name(&self, sref: SymbolRef) -> String {
        let namespace = &self.repository(sref.repo).namespace;
        match namespace.symbol_name(sref.kind, sref.index) {
            Some(name) => format!("{}.{}", namespace.name(), name.native),
            None => format!("{}.<{} #{}>", namespace.name(), sref.kind, sref.index),
        }
    }

    /// Managed type name, qualified when the symbol lives in another
    /// namespace than `current`.
    pub fn managed_type_name(&self, sref: SymbolRef, current: RepoId) -> String {
        let namespace = &self.repository(sref.repo).namespace;
        let name = namespace
            .symbol_name(sref.kind, sref.index)
            .map(|n| n.managed.as_str())
            .unwrap_or("IntPtr");

        if !sref.is_external(current) {
            name.to_string()
        } else {
            format!("{}.{}", namespace.name(), name)
        }
    }

    /// Whether the symbol has reference semantics.
    pub fn is_reference_type(&self, sref: SymbolRef) -> bool {
        self.repository(sref.repo)
            .namespace
            .is_reference_type(sref.kind, sref.index)
    }

    /// Category of a declared symbol.
    pub fn category_of(&self, sref: SymbolRef) -> Category {
        let namespace = &self.repository(sref.repo).namespace;
        match sref.kind {
            SymbolKind::Class | SymbolKind::Interface => Category::ReferenceCountedHandle,
            SymbolKind::Record => match namespace.records.get(sref.index).map(|r| r.kind) {
                Some(RecordKind::Ref) => Category::ReferenceCountedHandle,
                Some(_) => Category::StructuredValue,
                None => Category::NotFound,
            },
            SymbolKind::Union | SymbolKind::ClassStruct => Category::StructuredValue,
            SymbolKind::Enumeration => Category::Primitive(PrimitiveKind::I32),
            SymbolKind::Bitfield => Category::Primitive(PrimitiveKind::U32),
            SymbolKind::Callback => Category::Callback,
            SymbolKind::Alias => Category::NotFound,
        }
    }
}

/// Order `entries` so that every include comes before its includer.
fn dependency_order(entries: &[(NamespaceKey, Vec<NamespaceKey>)]) -> Result<Vec<usize>, GenError> {
    let mut graph = DiGraph::<usize, ()>::new();
    let nodes: Vec<NodeIndex> = (0..entries.len()).map(|i| graph.add_node(i)).collect();

    let mut index_of = HashMap::new();
    for (i, (key, _)) in entries.iter().enumerate() {
        if index_of.insert(key, i).is_some() {
            return Err(GenError::DuplicateNamespace {
                namespace: key.canonical_name(),
            });
        }
    }

    for (i, (key, includes)) in entries.iter().enumerate() {
        for include in includes {
            let dependency = index_of.get(include).copied().ok_or_else(|| {
                GenError::UnresolvedDependency {
                    include: include.canonical_name(),
                    required_by: key.canonical_name(),
                }
            })?;
            graph.update_edge(nodes[dependency], nodes[i], ());
        }
    }

    match toposort(&graph, None) {
        Ok(order) => Ok(order.into_iter().map(|n| graph[n]).collect()),
        Err(cycle) => {
            let start = cycle.node_id();
            let members = tarjan_scc(&graph)
                .into_iter()
                .find(|scc| scc.contains(&start))
                .unwrap_or_else(|| vec![start]);
            let mut namespaces: Vec<String> = members
                .iter()
                .map(|n| entries[graph[*n]].0.canonical_name())
                .collect();
            namespaces.sort();
            Err(GenError::DependencyCycle { namespaces })
        }
    }
}
