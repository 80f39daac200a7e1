// src/dag/graph.rs

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};

/// Anything usable as a graph vertex.
///
/// The engine never constructs vertices; it only clones, compares, and
/// displays them. `Display` supplies the human-readable name used in every
/// error message and log line. `Send + Sync + 'static` is required so
/// vertices can move into the spawned walk units.
///
/// Blanket-implemented, so `String`, `&'static str`, small ID structs etc.
/// all qualify without any explicit impl.
pub trait Vertex: Clone + Eq + Hash + fmt::Display + Send + Sync + 'static {}

impl<T> Vertex for T where T: Clone + Eq + Hash + fmt::Display + Send + Sync + 'static {}

/// A directed edge between two vertices.
///
/// Direction convention (used consistently by `root`, `validate` and
/// `walk`): the edge points from a dependency to its dependent, i.e.
/// **`target` depends on `source`** and `source` must finish before
/// `target` may start.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge<V> {
    source: V,
    target: V,
}

impl<V> Edge<V> {
    pub fn new(source: V, target: V) -> Self {
        Self { source, target }
    }

    /// The dependency end of the edge.
    pub fn source(&self) -> &V {
        &self.source
    }

    /// The dependent end of the edge.
    pub fn target(&self) -> &V {
        &self.target
    }
}

impl<V: fmt::Display> fmt::Display for Edge<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// Mutable directed-graph container: a set of vertices, a set of edges,
/// and adjacency queries over them.
///
/// Backed by a [`StableDiGraph`] plus an identity index, so vertex removal
/// does not invalidate the indices of the remaining vertices. Vertices are
/// unique by identity and parallel edges collapse: adding the same vertex
/// or the same (source, target) pair twice is a no-op.
///
/// The container itself imposes no acyclicity; wrap it in
/// [`AcyclicGraph`](crate::dag::AcyclicGraph) for that.
#[derive(Debug, Clone)]
pub struct Graph<V: Vertex> {
    inner: StableDiGraph<V, ()>,
    index: HashMap<V, NodeIndex>,
}

impl<V: Vertex> Default for Graph<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Vertex> Graph<V> {
    pub fn new() -> Self {
        Self {
            inner: StableDiGraph::new(),
            index: HashMap::new(),
        }
    }

    /// Add a vertex. Adding an already-present vertex is a no-op.
    pub fn add_vertex(&mut self, v: V) {
        self.ensure_vertex(v);
    }

    /// Add the edge `source -> target`, meaning `target` depends on
    /// `source`.
    ///
    /// Endpoints not yet in the graph are inserted, so edge endpoints are
    /// always vertices of the graph. Duplicate edges collapse.
    pub fn add_edge(&mut self, source: V, target: V) {
        let s = self.ensure_vertex(source);
        let t = self.ensure_vertex(target);
        if self.inner.find_edge(s, t).is_none() {
            self.inner.add_edge(s, t, ());
        }
    }

    /// Remove a vertex and every edge incident to it. Removing an unknown
    /// vertex is a no-op.
    pub fn remove_vertex(&mut self, v: &V) {
        if let Some(ix) = self.index.remove(v) {
            self.inner.remove_node(ix);
        }
    }

    pub fn contains(&self, v: &V) -> bool {
        self.index.contains_key(v)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// All vertices, in no particular order.
    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.index.keys()
    }

    /// All edges, in no particular order.
    pub fn edges(&self) -> Vec<Edge<V>> {
        self.inner
            .edge_references()
            .map(|e| Edge::new(self.inner[e.source()].clone(), self.inner[e.target()].clone()))
            .collect()
    }

    /// Edges whose target is `v`: the edges arriving from `v`'s
    /// dependencies.
    pub fn up_edges(&self, v: &V) -> Vec<Edge<V>> {
        self.edges_directed(v, Direction::Incoming)
    }

    /// Edges whose source is `v`: the edges leading to `v`'s dependents.
    pub fn down_edges(&self, v: &V) -> Vec<Edge<V>> {
        self.edges_directed(v, Direction::Outgoing)
    }

    /// Immediate dependencies of `v` (sources of its up-edges).
    pub fn dependencies_of(&self, v: &V) -> Vec<V> {
        self.neighbors_directed(v, Direction::Incoming)
    }

    /// Immediate dependents of `v` (targets of its down-edges).
    pub fn dependents_of(&self, v: &V) -> Vec<V> {
        self.neighbors_directed(v, Direction::Outgoing)
    }

    fn ensure_vertex(&mut self, v: V) -> NodeIndex {
        match self.index.get(&v) {
            Some(ix) => *ix,
            None => {
                let ix = self.inner.add_node(v.clone());
                self.index.insert(v, ix);
                ix
            }
        }
    }

    fn edges_directed(&self, v: &V, dir: Direction) -> Vec<Edge<V>> {
        let Some(&ix) = self.index.get(v) else {
            return Vec::new();
        };
        self.inner
            .edges_directed(ix, dir)
            .map(|e| Edge::new(self.inner[e.source()].clone(), self.inner[e.target()].clone()))
            .collect()
    }

    fn neighbors_directed(&self, v: &V, dir: Direction) -> Vec<V> {
        let Some(&ix) = self.index.get(v) else {
            return Vec::new();
        };
        self.inner
            .neighbors_directed(ix, dir)
            .map(|n| self.inner[n].clone())
            .collect()
    }

    pub(crate) fn petgraph(&self) -> &StableDiGraph<V, ()> {
        &self.inner
    }
}
