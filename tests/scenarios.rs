// Copyright (C) 2026  The graph-minhash developers
// See the AUTHORS file at the top-level directory of this distribution
// License: GNU General Public License version 3, or any later version
// See top-level LICENSE file for more information

//! End-to-end scenarios with hand-checkable hop tables

use anyhow::Result;

use graph_minhash::{estimate, EstimatorConfig, Measure, Scheduling, SeedSet, VecGraph};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Runs the same estimate under every scheduling and checks they agree
/// before returning the sequential result.
fn estimate_all_schedulings(
    graph: &VecGraph,
    config: &EstimatorConfig,
    seeds: &SeedSet,
) -> Result<Measure> {
    let sequential = estimate(
        graph,
        &config.clone().with_scheduling(Scheduling::Sequential),
        seeds,
    )?;
    for scheduling in [Scheduling::SeedParallel, Scheduling::NodeParallel] {
        let parallel = estimate(
            graph,
            &config.clone().with_scheduling(scheduling).with_num_threads(4),
            seeds,
        )?;
        assert_eq!(
            parallel.hop_table, sequential.hop_table,
            "{:?} hop table differs from sequential",
            scheduling
        );
        assert_eq!(
            parallel.lower_bound_diameter, sequential.lower_bound_diameter,
            "{:?} lower-bound diameter differs from sequential",
            scheduling
        );
        assert_eq!(
            parallel.last_hops, sequential.last_hops,
            "{:?} last hops differ from sequential",
            scheduling
        );
    }
    Ok(sequential)
}

/// A path along which bits spread from node 0: successors(k) = {k - 1}.
fn reversed_path(num_nodes: usize) -> VecGraph {
    VecGraph::from_arcs((1..num_nodes).map(|k| (k, k - 1)))
}

/// All ordered pairs of distinct nodes, i.e. an undirected complete graph.
fn complete_graph(num_nodes: usize) -> VecGraph {
    let mut graph = VecGraph::new(num_nodes);
    for src in 0..num_nodes {
        for dst in 0..num_nodes {
            if src != dst {
                graph.add_arc(src, dst);
            }
        }
    }
    graph
}

#[test]
fn test_single_isolated_node() -> Result<()> {
    init_logger();
    let graph = VecGraph::new(1);
    let config = EstimatorConfig::new(1, 0.9)?;
    let seeds = SeedSet::from_nodes(vec![0], 1)?;
    let measure = estimate_all_schedulings(&graph, &config, &seeds)?;

    assert_eq!(measure.lower_bound_diameter, 0);
    assert_eq!(measure.hop_table, vec![1.0]); // num_nodes / num_seeds
    assert_eq!(measure.avg_distance, 0.0);
    assert_eq!(measure.effective_diameter, 0.0);
    assert_eq!(measure.total_couples, 1.0);
    Ok(())
}

#[test]
fn test_directed_path() -> Result<()> {
    init_logger();
    // Node k picks up the plane at hop k, so each hop adds one collision.
    let graph = reversed_path(32);
    let config = EstimatorConfig::new(1, 0.9)?;
    let seeds = SeedSet::from_nodes(vec![0], 1)?;
    let measure = estimate_all_schedulings(&graph, &config, &seeds)?;

    assert_eq!(measure.lower_bound_diameter, 31);
    let expected: Vec<f64> = (0..32).map(|h| ((h + 1) * 32) as f64).collect();
    assert_eq!(measure.hop_table, expected);
    assert_eq!(measure.last_hops, vec![31]);
    Ok(())
}

#[test]
fn test_complete_graph() -> Result<()> {
    init_logger();
    // Everything is one hop away from everything.
    let graph = complete_graph(32);
    let config = EstimatorConfig::new(1, 0.9)?;
    let seeds = SeedSet::from_nodes(vec![13], 1)?;
    let measure = estimate_all_schedulings(&graph, &config, &seeds)?;

    assert_eq!(measure.lower_bound_diameter, 1);
    assert_eq!(measure.hop_table, vec![32.0, 1024.0]); // collisions [1, 32]
    Ok(())
}

#[test]
fn test_multi_seed_ragged_convergence() -> Result<()> {
    init_logger();
    // Plane seeded at 0 spreads over the whole path (converges at hop 7);
    // plane seeded at 7 only ever holds the sink's own bit (hop 0).
    let graph = reversed_path(8);
    let config = EstimatorConfig::new(2, 0.9)?;
    let seeds = SeedSet::from_nodes(vec![0, 7], 2)?;
    let measure = estimate_all_schedulings(&graph, &config, &seeds)?;

    assert_eq!(measure.lower_bound_diameter, 7);
    assert_eq!(measure.last_hops, vec![7, 0]);
    // Seed 0 contributes h + 1 collisions, seed 7 carries its single
    // collision forward: hop_table[h] = (h + 1 + 1) * 8 / 2.
    let expected: Vec<f64> = (0..8).map(|h| ((h + 2) * 4) as f64).collect();
    assert_eq!(measure.hop_table, expected);
    Ok(())
}

#[test]
fn test_hop_table_is_non_decreasing_and_ends_at_total() -> Result<()> {
    let graph = VecGraph::from_arcs([(0, 1), (1, 2), (2, 0), (3, 1), (4, 3), (5, 0)]);
    let config = EstimatorConfig::new(3, 0.9)?;
    let seeds = SeedSet::from_nodes(vec![0, 3, 5], 3)?;
    let measure = estimate_all_schedulings(&graph, &config, &seeds)?;

    for h in 1..measure.hop_table.len() {
        assert!(
            measure.hop_table[h] >= measure.hop_table[h - 1],
            "hop table decreases at hop {}",
            h
        );
    }
    assert_eq!(
        measure.total_couples,
        *measure.hop_table.last().unwrap()
    );
    assert_eq!(measure.hop_table.len(), measure.lower_bound_diameter + 1);
    Ok(())
}

#[test]
fn test_effective_diameter_at_full_threshold_is_lower_bound() -> Result<()> {
    let graph = reversed_path(16);
    let config = EstimatorConfig::new(1, 1.0)?;
    let seeds = SeedSet::from_nodes(vec![0], 1)?;
    let measure = estimate_all_schedulings(&graph, &config, &seeds)?;

    assert_eq!(
        measure.effective_diameter,
        measure.lower_bound_diameter as f64
    );
    Ok(())
}

#[test]
fn test_average_distance_on_path() -> Result<()> {
    // On the 4-node path the reachable pairs are at distances
    // 0 x4, 1 x3, 2 x2, 3 x1: average 10/10 = 1.
    let graph = reversed_path(4);
    let config = EstimatorConfig::new(4, 0.9)?;
    let seeds = SeedSet::from_nodes(vec![0, 1, 2, 3], 4)?;
    let measure = estimate_all_schedulings(&graph, &config, &seeds)?;

    assert_eq!(measure.avg_distance, 1.0);
    Ok(())
}
