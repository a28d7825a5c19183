//! Ordered emission of package payloads.
//!
//! The emitter borrows a graph and a registry for one traversal, resolves
//! the name sequence for the requested scope, and eagerly produces the
//! payload sequence into a plain `Vec` that any caller can drain. Graphs
//! are small (tens to low hundreds of packages), so determinism is worth
//! more than lazy production.

use crate::error::GraphError;
use crate::graph::DepGraph;
use crate::registry::PackageRegistry;

/// What part of the graph to emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmissionScope {
    /// Every node in the graph, in topological order.
    Full,
    /// The transitive dependencies of the target in dependency order,
    /// followed by the target itself. The target is always last.
    Closure(String),
}

/// Walks the graph and yields payloads from the registry in dependency
/// order. Holds no state of its own.
pub struct OrderedEmitter<'a, P> {
    graph: &'a DepGraph,
    registry: &'a PackageRegistry<P>,
}

impl<'a, P> OrderedEmitter<'a, P> {
    /// Borrow a graph and registry for one traversal.
    #[must_use]
    pub fn new(graph: &'a DepGraph, registry: &'a PackageRegistry<P>) -> Self {
        Self { graph, registry }
    }

    /// Resolve the name sequence for a scope. Includes names with no
    /// registered payload; `emit` filters those out.
    ///
    /// # Errors
    /// Propagates [`GraphError`] from the underlying traversal.
    pub fn emission_order(&self, scope: &EmissionScope) -> Result<Vec<String>, GraphError> {
        match scope {
            EmissionScope::Full => self.graph.overall_order(),
            EmissionScope::Closure(target) => {
                let mut names = self.graph.dependencies_of(target)?;
                // Appended manually so the focal package is always last.
                names.push(target.clone());
                Ok(names)
            }
        }
    }

    /// Emit `(name, payload)` pairs in dependency order. Names with no
    /// payload in the registry are external dependencies and are skipped
    /// without error.
    ///
    /// # Errors
    /// Propagates [`GraphError`] from the underlying traversal.
    pub fn emit(&self, scope: &EmissionScope) -> Result<Vec<(String, &'a P)>, GraphError> {
        let names = self.emission_order(scope)?;
        Ok(names
            .into_iter()
            .filter_map(|name| self.registry.get(&name).map(|p| (name, p)))
            .collect())
    }

    /// Emit with a caller-supplied transform applied to each payload.
    ///
    /// # Errors
    /// Propagates [`GraphError`] from the underlying traversal.
    pub fn emit_map<T>(
        &self,
        scope: &EmissionScope,
        mut f: impl FnMut(&str, &P) -> T,
    ) -> Result<Vec<T>, GraphError> {
        let pairs = self.emit(scope)?;
        Ok(pairs.into_iter().map(|(name, p)| f(&name, p)).collect())
    }
}
