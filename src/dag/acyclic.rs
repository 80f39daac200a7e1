// src/dag/acyclic.rs

use std::ops::{Deref, DerefMut};

use tracing::debug;

use crate::dag::graph::{Graph, Vertex};
use crate::dag::scc::strongly_connected;
use crate::errors::{GraphError, ValidateError};

/// A [`Graph`] expected to be acyclic with a single entry point.
///
/// The invariant is not enforced on every mutation; it is checked by
/// [`validate`](Self::validate), which callers run once after building the
/// graph and before [`walk`](Self::walk). `walk` itself does not
/// re-validate.
///
/// Derefs to [`Graph`], so the graph is built directly on the wrapper:
///
/// ```
/// use graphwalk::AcyclicGraph;
///
/// let mut g: AcyclicGraph<&str> = AcyclicGraph::new();
/// g.add_edge("provision", "configure");
/// g.add_edge("configure", "deploy");
/// assert_eq!(g.root().unwrap(), &"provision");
/// assert!(g.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct AcyclicGraph<V: Vertex> {
    graph: Graph<V>,
}

impl<V: Vertex> Default for AcyclicGraph<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Vertex> AcyclicGraph<V> {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
        }
    }

    /// Consume the wrapper and return the underlying graph.
    pub fn into_graph(self) -> Graph<V> {
        self.graph
    }

    /// The root of the DAG: the unique vertex with no up-edges, i.e. no
    /// dependencies. It is the only vertex eligible to run first.
    ///
    /// Fails with [`GraphError::NoRoot`] when no such vertex exists and
    /// with [`GraphError::MultipleRoots`] when the entry point is
    /// ambiguous. O(V) over the adjacency index; read-only.
    pub fn root(&self) -> Result<&V, GraphError> {
        let mut roots: Vec<&V> = self
            .graph
            .vertices()
            .filter(|v| self.graph.up_edges(v).is_empty())
            .collect();

        match roots.len() {
            1 => Ok(roots.remove(0)),
            0 => Err(GraphError::NoRoot),
            _ => {
                let mut candidates: Vec<String> =
                    roots.iter().map(|v| v.to_string()).collect();
                candidates.sort();
                Err(GraphError::MultipleRoots { candidates })
            }
        }
    }

    /// Check the acyclicity invariant: a single root, no multi-vertex
    /// strongly connected component, and no self-loop.
    ///
    /// Does not stop at the first problem; every root problem, cycle, and
    /// self-reference found is accumulated into the returned
    /// [`ValidateError`]. Read-only and idempotent.
    pub fn validate(&self) -> Result<(), ValidateError> {
        let mut errors = Vec::new();

        if let Err(err) = self.root() {
            errors.push(err);
        }

        for group in strongly_connected(&self.graph) {
            if group.len() > 1 {
                let mut vertices: Vec<String> =
                    group.iter().map(|v| v.to_string()).collect();
                vertices.sort();
                errors.push(GraphError::CycleDetected { vertices });
            }
        }

        // Tarjan reports a self-loop as a singleton component, so those are
        // found by scanning the edge set instead.
        for edge in self.graph.edges() {
            if edge.source() == edge.target() {
                errors.push(GraphError::SelfReference {
                    vertex: edge.source().to_string(),
                });
            }
        }

        if errors.is_empty() {
            debug!(
                vertices = self.graph.len(),
                edges = self.graph.edges().len(),
                "graph validated: single root, no cycles"
            );
            Ok(())
        } else {
            Err(ValidateError { errors })
        }
    }
}

impl<V: Vertex> From<Graph<V>> for AcyclicGraph<V> {
    fn from(graph: Graph<V>) -> Self {
        Self { graph }
    }
}

impl<V: Vertex> Deref for AcyclicGraph<V> {
    type Target = Graph<V>;

    fn deref(&self) -> &Graph<V> {
        &self.graph
    }
}

impl<V: Vertex> DerefMut for AcyclicGraph<V> {
    fn deref_mut(&mut self) -> &mut Graph<V> {
        &mut self.graph
    }
}
