use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use graphwalk::AcyclicGraph;
use tokio::sync::{Barrier, Mutex};

mod common;

type TestResult = Result<(), Box<dyn Error>>;

/// Walk the graph recording the order in which vertices are visited.
async fn record_walk(g: &AcyclicGraph<&'static str>) -> Vec<&'static str> {
    let order = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&order);
    g.walk(move |v| {
        let order = Arc::clone(&recorder);
        async move {
            order.lock().await.push(v);
            Ok(())
        }
    })
    .await
    .expect("walk should succeed");

    let order = order.lock().await;
    order.clone()
}

#[tokio::test]
async fn chain_is_visited_in_dependency_order() {
    common::init_tracing();
    let mut g: AcyclicGraph<&str> = AcyclicGraph::new();
    g.add_edge("a", "b");
    g.add_edge("b", "c");
    g.validate().expect("valid chain");

    // Interleaving is nondeterministic in general, so walk repeatedly; a
    // chain has only one legal order.
    for _ in 0..25 {
        assert_eq!(record_walk(&g).await, vec!["a", "b", "c"]);
    }
}

#[tokio::test]
async fn single_vertex_graph_visits_the_root() {
    common::init_tracing();
    let mut g: AcyclicGraph<&str> = AcyclicGraph::new();
    g.add_vertex("only");
    g.validate().expect("single vertex is a valid dag");

    assert_eq!(record_walk(&g).await, vec!["only"]);
}

#[tokio::test]
async fn diamond_failure_skips_dependents_and_reports_once() -> TestResult {
    common::init_tracing();
    let mut g: AcyclicGraph<&str> = AcyclicGraph::new();
    g.add_edge("r", "b");
    g.add_edge("r", "c");
    g.add_edge("b", "d");
    g.add_edge("c", "d");
    g.validate()?;

    let visited = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&visited);
    let err = g
        .walk(move |v| {
            let visited = Arc::clone(&sink);
            async move {
                visited.lock().await.push(v);
                if v == "b" {
                    return Err(anyhow!("provisioning b blew up"));
                }
                Ok(())
            }
        })
        .await
        .expect_err("walk must report b's failure");

    // Exactly one entry: the vertex that failed, not the one it blocked.
    assert_eq!(err.failed_vertices(), vec!["b"]);
    assert_eq!(err.failures[0].error.to_string(), "provisioning b blew up");

    let visited = visited.lock().await;
    assert!(visited.contains(&"r"));
    assert!(visited.contains(&"b"));
    assert!(visited.contains(&"c"));
    assert!(!visited.contains(&"d"), "d must be skipped, saw {visited:?}");
    Ok(())
}

#[tokio::test]
async fn failure_skips_transitive_dependents() -> TestResult {
    common::init_tracing();
    let mut g: AcyclicGraph<&str> = AcyclicGraph::new();
    g.add_edge("a", "b");
    g.add_edge("b", "c");
    g.validate()?;

    let visited = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&visited);
    let err = g
        .walk(move |v| {
            let visited = Arc::clone(&sink);
            async move {
                visited.lock().await.push(v);
                Err(anyhow!("{v} failed"))
            }
        })
        .await
        .expect_err("root failure must surface");

    assert_eq!(err.failed_vertices(), vec!["a"]);
    assert_eq!(*visited.lock().await, vec!["a"]);
    Ok(())
}

#[tokio::test]
async fn independent_failures_are_all_reported() -> TestResult {
    common::init_tracing();
    let mut g: AcyclicGraph<&str> = AcyclicGraph::new();
    g.add_edge("r", "x");
    g.add_edge("r", "y");
    g.add_edge("r", "z");
    g.validate()?;

    let err = g
        .walk(|v| async move {
            match v {
                "x" | "y" => Err(anyhow!("{v} failed")),
                _ => Ok(()),
            }
        })
        .await
        .expect_err("two leaves fail");

    let mut failed = err.failed_vertices();
    failed.sort();
    assert_eq!(failed, vec!["x", "y"]);
    Ok(())
}

#[tokio::test]
async fn fanout_children_run_concurrently() -> TestResult {
    common::init_tracing();
    const CHILDREN: usize = 8;

    let mut g: AcyclicGraph<String> = AcyclicGraph::new();
    for i in 0..CHILDREN {
        g.add_edge("r".to_string(), format!("c{i}"));
    }
    g.validate()?;

    // Every child blocks on a shared barrier sized to the fan-out. If the
    // engine serialized unrelated vertices, no child could pass the
    // barrier and the walk would hang; the timeout turns that into a
    // failure instead.
    let barrier = Arc::new(Barrier::new(CHILDREN));
    let walk = g.walk(move |v| {
        let barrier = Arc::clone(&barrier);
        async move {
            if v != "r" {
                barrier.wait().await;
            }
            Ok(())
        }
    });

    tokio::time::timeout(Duration::from_secs(10), walk)
        .await
        .expect("fan-out was serialized: children never met at the barrier")?;
    Ok(())
}

#[tokio::test]
async fn every_vertex_is_visited_exactly_once() -> TestResult {
    common::init_tracing();
    let mut g: AcyclicGraph<&str> = AcyclicGraph::new();
    g.add_edge("r", "a");
    g.add_edge("r", "b");
    g.add_edge("a", "c");
    g.add_edge("b", "c");
    g.add_edge("b", "d");
    g.add_edge("c", "e");
    g.add_edge("d", "e");
    g.validate()?;

    let counts = Arc::new(Mutex::new(HashMap::new()));
    let sink = Arc::clone(&counts);
    g.walk(move |v| {
        let counts = Arc::clone(&sink);
        async move {
            *counts.lock().await.entry(v).or_insert(0u32) += 1;
            Ok(())
        }
    })
    .await?;

    let counts = counts.lock().await;
    assert_eq!(counts.len(), 6);
    assert!(counts.values().all(|&n| n == 1), "duplicate visits: {counts:?}");
    Ok(())
}

#[tokio::test]
async fn walk_can_be_repeated_on_the_same_graph() -> TestResult {
    common::init_tracing();
    let mut g: AcyclicGraph<&str> = AcyclicGraph::new();
    g.add_edge("a", "b");
    g.validate()?;

    g.walk(|_| async { Ok(()) }).await?;
    g.walk(|_| async { Ok(()) }).await?;
    Ok(())
}

#[tokio::test]
async fn walk_error_rendering_names_vertex_and_cause() -> TestResult {
    common::init_tracing();
    let mut g: AcyclicGraph<&str> = AcyclicGraph::new();
    g.add_vertex("only");
    g.validate()?;

    let err = g
        .walk(|_| async { Err(anyhow!("disk on fire")) })
        .await
        .expect_err("visitor fails");

    let rendered = err.to_string();
    assert!(rendered.contains("only"), "missing vertex name: {rendered}");
    assert!(rendered.contains("disk on fire"), "missing cause: {rendered}");
    Ok(())
}
