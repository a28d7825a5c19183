//! Workspace dependency graph and topological ordering.
//!
//! Nodes are package names held in an arena addressed by insertion index,
//! so the graph never forms language-level reference cycles even when the
//! package relation itself is cyclic. Edges point from a dependant to its
//! dependency. Ordering uses Kahn's algorithm with insertion-order
//! tie-breaking: an unchanged graph always produces the same order.

use std::collections::HashMap;

use crate::error::GraphError;

/// Directed graph of package names.
///
/// A node may exist without any associated payload in the registry (an
/// external, non-workspace dependency); the emitter skips those at
/// emission time. Cycles are legal at insertion time and only surface as
/// [`GraphError::Cycle`] when an order is requested.
#[derive(Debug, Clone, Default)]
pub struct DepGraph {
    /// Node names in insertion order.
    names: Vec<String>,
    /// Name -> arena index.
    index: HashMap<String, usize>,
    /// `deps[i]` = indices of the nodes `i` depends on, in insertion order.
    deps: Vec<Vec<usize>>,
}

impl DepGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    /// Whether a name has been registered as a node.
    #[must_use]
    pub fn has_node(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate node names in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Register a node. Idempotent: re-adding an existing name changes
    /// nothing and preserves its edges.
    pub fn add_node(&mut self, name: &str) {
        self.intern(name);
    }

    /// Record that `dependant` must be processed strictly after
    /// `dependency`. Both endpoints are registered if absent. Idempotent.
    ///
    /// No self-loop check happens here; a self-edge surfaces as a cycle
    /// at traversal time.
    pub fn add_dependency(&mut self, dependant: &str, dependency: &str) {
        let da = self.intern(dependant);
        let db = self.intern(dependency);
        if !self.deps[da].contains(&db) {
            self.deps[da].push(db);
        }
    }

    fn intern(&mut self, name: &str) -> usize {
        if let Some(&i) = self.index.get(name) {
            return i;
        }
        let i = self.names.len();
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), i);
        self.deps.push(Vec::new());
        i
    }

    /// Topological order of the entire graph: every node exactly once,
    /// each after all of its dependencies.
    ///
    /// # Errors
    /// [`GraphError::Cycle`] if the graph contains a directed cycle.
    pub fn overall_order(&self) -> Result<Vec<String>, GraphError> {
        let all: Vec<usize> = (0..self.names.len()).collect();
        let order = self.order_subset(&all)?;
        Ok(order.into_iter().map(|i| self.names[i].clone()).collect())
    }

    /// Topological order of the transitive dependency closure of `name`,
    /// excluding `name` itself.
    ///
    /// # Errors
    /// [`GraphError::UnknownNode`] if `name` was never registered;
    /// [`GraphError::Cycle`] if the closure contains a cycle, including a
    /// cycle passing through `name`.
    pub fn dependencies_of(&self, name: &str) -> Result<Vec<String>, GraphError> {
        let start = *self
            .index
            .get(name)
            .ok_or_else(|| GraphError::UnknownNode {
                name: name.to_string(),
            })?;

        // The start node stays in the set so a cycle through it is caught.
        let subset = self.reachable_from(start);
        let order = self.order_subset(&subset)?;

        Ok(order
            .into_iter()
            .filter(|&i| i != start)
            .map(|i| self.names[i].clone())
            .collect())
    }

    /// Indices reachable from `start` via dependency edges, `start`
    /// included, returned in ascending insertion order.
    fn reachable_from(&self, start: usize) -> Vec<usize> {
        let mut seen = vec![false; self.names.len()];
        let mut stack = vec![start];
        seen[start] = true;
        while let Some(i) = stack.pop() {
            for &d in &self.deps[i] {
                if !seen[d] {
                    seen[d] = true;
                    stack.push(d);
                }
            }
        }
        (0..self.names.len()).filter(|&i| seen[i]).collect()
    }

    /// Kahn's algorithm over the subgraph induced by `subset` (ascending
    /// insertion indices). Ties between simultaneously eligible nodes are
    /// broken by insertion order.
    fn order_subset(&self, subset: &[usize]) -> Result<Vec<usize>, GraphError> {
        let mut in_subset = vec![false; self.names.len()];
        for &i in subset {
            in_subset[i] = true;
        }

        let mut in_degree: HashMap<usize, usize> = HashMap::new();
        let mut dependants: HashMap<usize, Vec<usize>> = HashMap::new();
        for &i in subset {
            in_degree.entry(i).or_insert(0);
            for &d in &self.deps[i] {
                if in_subset[d] {
                    *in_degree.entry(i).or_insert(0) += 1;
                    dependants.entry(d).or_default().push(i);
                }
            }
        }

        // Ready list kept sorted ascending; lowest insertion index first.
        let mut ready: Vec<usize> = subset
            .iter()
            .copied()
            .filter(|i| in_degree[i] == 0)
            .collect();

        let mut order = Vec::with_capacity(subset.len());
        while !ready.is_empty() {
            let i = ready.remove(0);
            order.push(i);
            if let Some(deps) = dependants.get(&i) {
                for &j in deps {
                    if let Some(deg) = in_degree.get_mut(&j) {
                        *deg -= 1;
                        if *deg == 0 {
                            // Insert in sorted position to keep insertion-order ties
                            let pos = ready.binary_search(&j).unwrap_or_else(|e| e);
                            ready.insert(pos, j);
                        }
                    }
                }
            }
        }

        if order.len() < subset.len() {
            let remaining: Vec<usize> = subset
                .iter()
                .copied()
                .filter(|i| in_degree[i] > 0)
                .collect();
            return Err(GraphError::Cycle {
                path: self.find_cycle(&remaining),
            });
        }

        Ok(order)
    }

    /// Extract one concrete cycle from the unresolved node set left over
    /// by Kahn's algorithm. Every node in `remaining` has at least one
    /// unresolved dependency inside `remaining`, so walking those edges
    /// must revisit a node on the path.
    fn find_cycle(&self, remaining: &[usize]) -> Vec<String> {
        let mut in_remaining = vec![false; self.names.len()];
        for &i in remaining {
            in_remaining[i] = true;
        }

        let mut path: Vec<usize> = Vec::new();
        let mut on_path = vec![false; self.names.len()];
        let mut current = remaining[0];

        loop {
            if on_path[current] {
                let start = path.iter().position(|&i| i == current).unwrap_or(0);
                return path[start..]
                    .iter()
                    .map(|&i| self.names[i].clone())
                    .collect();
            }
            on_path[current] = true;
            path.push(current);
            current = self.deps[current]
                .iter()
                .copied()
                .find(|&d| in_remaining[d])
                .unwrap_or(current);
        }
    }
}
