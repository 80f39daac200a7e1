// src/dag/scc.rs

//! Strongly-connected-components analysis.
//!
//! A pure query over a [`Graph`]: partition every vertex into maximal
//! groups that are mutually reachable via directed paths. A group of size
//! two or more is a cycle. Singleton groups are cycle-free unless the
//! vertex carries a self-loop, which Tarjan reports as a singleton and is
//! therefore detected separately (by edge scan, in
//! [`AcyclicGraph::validate`](crate::dag::AcyclicGraph::validate)).

use petgraph::algo::tarjan_scc;

use crate::dag::graph::{Graph, Vertex};

/// Partition the graph's vertices into strongly connected components.
///
/// Every vertex appears in exactly one group; group-internal and
/// group-level ordering are unspecified. Runs in O(V + E).
pub fn strongly_connected<V: Vertex>(graph: &Graph<V>) -> Vec<Vec<V>> {
    let inner = graph.petgraph();
    tarjan_scc(inner)
        .into_iter()
        .map(|group| group.into_iter().map(|ix| inner[ix].clone()).collect())
        .collect()
}
