// src/dag/mod.rs

//! Dependency-graph model and execution.
//!
//! - [`graph`] holds the generic directed-graph container and its
//!   vertex/edge primitives.
//! - [`scc`] partitions a graph into strongly connected components.
//! - [`acyclic`] wraps a graph with the single-root / cycle-free
//!   invariant (`root`, `validate`).
//! - [`walk`] runs the concurrent dependency-ordered traversal.

pub mod acyclic;
pub mod graph;
pub mod scc;
pub mod walk;

pub use acyclic::AcyclicGraph;
pub use graph::{Edge, Graph, Vertex};
pub use scc::strongly_connected;
