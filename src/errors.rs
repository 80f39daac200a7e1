// src/errors.rs

//! Error types for graph validation and walking.
//!
//! Structural problems (`GraphError`) are typed and carry vertex names;
//! visitor failures are opaque `anyhow::Error`s: the walk never inspects
//! *why* a visitor failed, only *that* it failed. Both `validate` and
//! `walk` aggregate every problem they find instead of stopping at the
//! first.

use std::fmt;

use thiserror::Error;

/// A single structural problem found in a graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// No vertex is free of dependencies, so the graph has no entry point.
    #[error("no root: every vertex has at least one dependency")]
    NoRoot,

    /// More than one vertex has no dependencies; the entry point is
    /// ambiguous. Candidate names are sorted for deterministic output.
    #[error("multiple roots: {}", .candidates.join(", "))]
    MultipleRoots { candidates: Vec<String> },

    /// A set of two or more vertices mutually reachable from one another.
    #[error("Cycle: {}", .vertices.join(", "))]
    CycleDetected { vertices: Vec<String> },

    /// A vertex with an edge to itself.
    #[error("Self reference: {vertex}")]
    SelfReference { vertex: String },
}

/// Aggregate of every structural problem `validate` found.
///
/// Renders one line per problem, e.g.:
///
/// ```text
/// Cycle: b, c, d
/// Self reference: a
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateError {
    pub errors: Vec<GraphError>,
}

impl fmt::Display for ValidateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidateError {}

/// One vertex whose visitor returned an error during a walk.
#[derive(Debug)]
pub struct VisitorFailure {
    /// Display name of the failing vertex.
    pub vertex: String,
    /// The error the visitor returned, unchanged.
    pub error: anyhow::Error,
}

impl fmt::Display for VisitorFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:#}", self.vertex, self.error)
    }
}

/// Aggregate result of a failed walk: exactly one entry per vertex whose
/// visitor returned an error. Vertices skipped because a dependency failed
/// contribute no entry of their own.
#[derive(Debug)]
pub struct WalkError {
    pub failures: Vec<VisitorFailure>,
}

impl WalkError {
    /// Display names of the directly failing vertices.
    pub fn failed_vertices(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.vertex.as_str()).collect()
    }
}

impl fmt::Display for WalkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vertex visit(s) failed:", self.failures.len())?;
        for failure in &self.failures {
            write!(f, "\n  {failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for WalkError {}
