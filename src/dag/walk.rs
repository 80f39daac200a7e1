// src/dag/walk.rs

//! Concurrent, dependency-ordered traversal of an [`AcyclicGraph`].
//!
//! One tokio task ("unit") per vertex, all spawned eagerly. Each unit:
//!
//! 1. awaits the completion signal of every dependency (sources of the
//!    vertex's up-edges),
//! 2. checks the shared failure table; if any dependency failed, the unit
//!    is skipped (the visitor is not invoked) but the vertex still counts
//!    as finished so its own dependents can proceed,
//! 3. otherwise runs the visitor and records its outcome,
//! 4. fires its own completion signal, exactly once, after the outcome is
//!    visible in the table.
//!
//! The walk resolves once every unit has finished and returns one
//! [`VisitorFailure`] per directly failing vertex.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::dag::acyclic::AcyclicGraph;
use crate::dag::graph::Vertex;
use crate::errors::{VisitorFailure, WalkError};

/// Shared per-walk bookkeeping. One instance per `walk` call, so
/// concurrent walks over different graphs never interfere.
struct WalkState<V> {
    /// Vertices that failed or were skipped; their dependents must not be
    /// visited. Skips propagate transitively through this set, while
    /// `failures` only records the vertices whose visitor actually failed.
    blocked: HashSet<V>,
    failures: Vec<VisitorFailure>,
}

impl<V: Vertex> AcyclicGraph<V> {
    /// Visit every vertex exactly once, honoring dependency order and
    /// running independent branches concurrently.
    ///
    /// The visitor is an opaque black box: it may block on I/O or
    /// computation, and the walk never inspects why it failed, only that
    /// it did. There is no internal retry, timeout, cancellation, or
    /// concurrency cap: a hung visitor hangs the walk, and a caller
    /// needing a cap owns its own semaphore inside the visitor.
    ///
    /// Call [`validate`](Self::validate) first; `walk` assumes the graph
    /// is cycle-free and does not re-check.
    ///
    /// Returns `Ok(())` when every visitor succeeded, otherwise a
    /// [`WalkError`] with one entry per vertex whose visitor returned an
    /// error. Skipped vertices contribute no entry.
    pub async fn walk<F, Fut>(&self, visitor: F) -> Result<(), WalkError>
    where
        F: Fn(V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let vertices: Vec<V> = self.vertices().cloned().collect();
        debug!(vertices = vertices.len(), "starting graph walk");

        // Completion signal per vertex. The sender moves into the vertex's
        // unit and fires exactly once; dependents hold receiver clones.
        let mut done_rx: HashMap<V, watch::Receiver<bool>> =
            HashMap::with_capacity(vertices.len());
        let mut done_tx: Vec<watch::Sender<bool>> = Vec::with_capacity(vertices.len());
        for v in &vertices {
            let (tx, rx) = watch::channel(false);
            done_rx.insert(v.clone(), rx);
            done_tx.push(tx);
        }

        let state = Arc::new(Mutex::new(WalkState::<V> {
            blocked: HashSet::new(),
            failures: Vec::new(),
        }));
        let visitor = Arc::new(visitor);

        let mut units = JoinSet::new();
        for (v, our_tx) in vertices.into_iter().zip(done_tx) {
            let deps = self.dependencies_of(&v);
            let dep_signals: Vec<watch::Receiver<bool>> = deps
                .iter()
                .filter_map(|d| done_rx.get(d).cloned())
                .collect();
            let state = Arc::clone(&state);
            let visitor = Arc::clone(&visitor);

            units.spawn(async move {
                // Wait for every dependency to finish (success, failure, or
                // skip). A closed signal means the dependency's unit died
                // without recording an outcome; treat it like a failure.
                let mut lost_dependency = false;
                for mut signal in dep_signals {
                    if signal.wait_for(|done| *done).await.is_err() {
                        lost_dependency = true;
                    }
                }

                let blocked_dep = {
                    let state = state.lock().await;
                    deps.into_iter().find(|d| state.blocked.contains(d))
                };

                // `None` outcome means the unit was skipped: the visitor
                // was never invoked for this vertex.
                let outcome = match &blocked_dep {
                    Some(dep) => {
                        debug!(
                            vertex = %v,
                            blocked_by = %dep,
                            "skipping vertex: dependency failed or was skipped"
                        );
                        None
                    }
                    None if lost_dependency => {
                        warn!(vertex = %v, "skipping vertex: dependency never finished");
                        None
                    }
                    None => {
                        debug!(vertex = %v, "visiting vertex");
                        Some((*visitor)(v.clone()).await)
                    }
                };

                {
                    let mut state = state.lock().await;
                    match outcome {
                        Some(Ok(())) => {}
                        Some(Err(error)) => {
                            warn!(vertex = %v, error = %error, "visitor failed");
                            state.blocked.insert(v.clone());
                            state.failures.push(VisitorFailure {
                                vertex: v.to_string(),
                                error,
                            });
                        }
                        None => {
                            state.blocked.insert(v.clone());
                        }
                    }
                }

                // Fire our completion signal only after the outcome is in
                // the table, so dependents never observe a half-finished
                // vertex. Receivers may all be gone (no dependents); that
                // is fine.
                let _ = our_tx.send(true);
            });
        }

        while let Some(unit) = units.join_next().await {
            if let Err(err) = unit {
                // Only reachable when a visitor panicked; the unit's signal
                // closed unsent, so dependents skip rather than hang.
                warn!(error = %err, "walk unit aborted");
            }
        }

        let mut state = state.lock().await;
        let failures = std::mem::take(&mut state.failures);
        if failures.is_empty() {
            debug!("graph walk finished with no failures");
            Ok(())
        } else {
            debug!(failed = failures.len(), "graph walk finished with failures");
            Err(WalkError { failures })
        }
    }
}
