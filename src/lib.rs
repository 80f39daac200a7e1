// src/lib.rs

//! Concurrent, dependency-ordered execution over directed acyclic graphs.
//!
//! The crate is an in-memory ordering/concurrency primitive: callers build
//! a [`Graph`] (or an [`AcyclicGraph`] directly) out of their own vertex
//! values, call [`AcyclicGraph::validate`] once, then drive every vertex
//! through a caller-supplied async visitor with [`AcyclicGraph::walk`].
//! The engine knows nothing about what a vertex *does* (provisioning a
//! resource, evaluating an expression), only its identity and its edges.
//!
//! Edge convention, used consistently everywhere: `add_edge(a, b)` means
//! **b depends on a**. The root is the unique vertex with no dependencies
//! and is the first vertex eligible to run; independent branches run
//! concurrently; a vertex whose dependency failed is skipped, never
//! visited.
//!
//! ```
//! use graphwalk::AcyclicGraph;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut g: AcyclicGraph<&str> = AcyclicGraph::new();
//! g.add_edge("network", "subnet");
//! g.add_edge("subnet", "instance");
//!
//! g.validate().expect("single root, no cycles");
//! g.walk(|v| async move {
//!     println!("provisioning {v}");
//!     Ok(())
//! })
//! .await
//! .expect("no visitor failed");
//! # }
//! ```

pub mod dag;
pub mod errors;

pub use dag::{AcyclicGraph, Edge, Graph, Vertex, strongly_connected};
pub use errors::{GraphError, ValidateError, VisitorFailure, WalkError};
