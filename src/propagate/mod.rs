// Copyright (C) 2026  The graph-minhash developers
// See the AUTHORS file at the top-level directory of this distribution
// License: GNU General Public License version 3, or any later version
// See top-level LICENSE file for more information

//! Hop-synchronous OR-propagation of signature planes
//!
//! Every scheduling runs the same fixpoint: at hop 0 a plane holds only its
//! seed node's bit; at hop `h > 0` a node's bit becomes 1 if it already was,
//! or if any of its successors had it set in the previous-hop snapshot. A
//! plane stops when a full hop changes nothing; the run stops when every
//! plane has stopped. After each changed hop the plane's popcount is
//! recorded as that seed's collision count.

use std::time::Instant;

use dsi_progress_logger::prelude::*;
use log::info;

use crate::collisions::CollisionsMatrix;
use crate::config::{EstimatorConfig, Scheduling};
use crate::error::{Error, Result};
use crate::graph::{ForwardGraph, NodeId};
use crate::measure::Measure;
use crate::seeds::SeedSet;
use crate::signature::SeedSignature;

mod node_parallel;
mod seed_parallel;

/// Collision counts and bookkeeping handed over by a scheduling, before
/// normalization.
pub(crate) struct RawCollisions {
    pub matrix: CollisionsMatrix,
    pub seed_times: Vec<std::time::Duration>,
    pub excluded_seeds: Vec<usize>,
}

/// Estimates the neighbourhood function of `graph`.
///
/// Runs the scheduling selected by `config` over the planes seeded at
/// `seeds`, then derives the hop table and its distance statistics.
///
/// # Examples
///
/// ```
/// use graph_minhash::{estimate, EstimatorConfig, SeedSet, VecGraph};
///
/// // A directed 4-cycle: every node reaches every node.
/// let graph = VecGraph::from_arcs([(0, 1), (1, 2), (2, 3), (3, 0)]);
/// let config = EstimatorConfig::new(4, 0.9)?;
/// let seeds = SeedSet::from_nodes(vec![0, 1, 2, 3], 4)?;
/// let measure = estimate(&graph, &config, &seeds)?;
///
/// assert_eq!(measure.lower_bound_diameter, 3);
/// assert_eq!(measure.total_couples, 16.0);
/// # Ok::<(), graph_minhash::Error>(())
/// ```
pub fn estimate<G: ForwardGraph>(
    graph: &G,
    config: &EstimatorConfig,
    seeds: &SeedSet,
) -> Result<Measure> {
    if seeds.len() != config.num_seeds {
        return Err(Error::SeedCountMismatch {
            expected: config.num_seeds,
            actual: seeds.len(),
        });
    }
    let num_nodes = graph.num_nodes();
    seeds.check_in_range(num_nodes)?;

    info!(
        "estimating neighbourhood function of {} nodes / {} arcs with {} seeds, {:?} scheduling",
        num_nodes,
        graph.num_arcs(),
        seeds.len(),
        config.scheduling
    );
    let start = Instant::now();
    let raw = match config.scheduling {
        Scheduling::Sequential => sequential(graph, config, seeds.nodes()),
        Scheduling::SeedParallel => seed_parallel::run(graph, config, seeds.nodes()),
        Scheduling::NodeParallel => node_parallel::run(graph, config, seeds.nodes()),
    }?;
    let total_time = start.elapsed();
    info!("estimation completed in {:.3}s", total_time.as_secs_f64());

    Measure::build(
        config,
        num_nodes,
        graph.num_arcs(),
        seeds.nodes().to_vec(),
        raw,
        total_time,
    )
}

/// Runs one plane to its fixpoint and returns its per-hop collision counts.
///
/// Hop 0 always counts exactly one collision, the seed's own bit. A hop that
/// changes nothing is not recorded, so the row ends at the plane's
/// last-changed hop.
pub(crate) fn propagate_plane<G: ForwardGraph>(
    graph: &G,
    seed_node: NodeId,
    max_hops: Option<usize>,
) -> Result<Vec<u64>> {
    let num_nodes = graph.num_nodes();
    let mut sig = SeedSignature::new(num_nodes, seed_node);
    let mut row = vec![1u64];
    let mut hop = 0;
    loop {
        sig.freeze();
        let mut changed = false;
        for node in 0..num_nodes {
            // A set bit can only be re-set; skip the successor scan.
            if sig.snapshot_bit(node) {
                continue;
            }
            if graph
                .successors(node)
                .into_iter()
                .any(|succ| sig.snapshot_bit(succ))
            {
                sig.set(node);
                changed = true;
            }
        }
        if !changed {
            break;
        }
        hop += 1;
        if let Some(max) = max_hops {
            if hop > max {
                return Err(Error::HopBoundExceeded(max));
            }
        }
        row.push(sig.collisions());
    }
    Ok(row)
}

/// Single-threaded scheduling: one plane after the other. The correctness
/// oracle for the parallel schedulings, and the cheapest option for small
/// inputs.
fn sequential<G: ForwardGraph>(
    graph: &G,
    config: &EstimatorConfig,
    seed_nodes: &[NodeId],
) -> Result<RawCollisions> {
    let mut pl = progress_logger![item_name = "seed", expected_updates = Some(seed_nodes.len())];
    pl.start("Propagating signature planes sequentially...");

    let mut rows = Vec::with_capacity(seed_nodes.len());
    let mut seed_times = Vec::with_capacity(seed_nodes.len());
    for &seed_node in seed_nodes {
        let seed_start = Instant::now();
        rows.push(propagate_plane(graph, seed_node, config.max_hops)?);
        seed_times.push(seed_start.elapsed());
        pl.update();
    }
    pl.done();

    Ok(RawCollisions {
        matrix: CollisionsMatrix::from_rows(rows),
        seed_times,
        excluded_seeds: Vec::new(),
    })
}

/// Renders the payload of a worker panic caught at a join point.
fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}
