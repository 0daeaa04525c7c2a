// Copyright (C) 2026  The graph-minhash developers
// See the AUTHORS file at the top-level directory of this distribution
// License: GNU General Public License version 3, or any later version
// See top-level LICENSE file for more information

//! The immutable result of a run

use std::time::Duration;

use crate::collisions::CollisionsMatrix;
use crate::config::EstimatorConfig;
use crate::error::Result;
use crate::graph::NodeId;
use crate::propagate::RawCollisions;
use crate::stats;

/// Everything a run estimated, as a self-contained snapshot.
///
/// The signature store and the collisions matrix are discarded once the
/// measure is built; this is the only value that outlives a run. With the
/// `serde` feature it serializes to JSON for an external reporting layer.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Measure {
    /// Estimated reachable pairs within `h` hops, for
    /// `h` in `0..=lower_bound_diameter`.
    pub hop_table: Vec<f64>,
    /// Last hop at which any seed's signature changed.
    pub lower_bound_diameter: usize,
    /// Average distance between reachable pairs.
    pub avg_distance: f64,
    /// Interpolated hop count connecting the `threshold`-th fraction of all
    /// reachable pairs.
    pub effective_diameter: f64,
    /// Estimated total number of ordered reachable pairs.
    pub total_couples: f64,
    /// `total_couples * threshold`.
    pub total_couples_percentage: f64,
    /// Threshold the effective diameter was computed at.
    pub threshold: f64,
    pub num_nodes: usize,
    pub num_arcs: u64,
    /// Number of seeds configured (excluded seeds included).
    pub num_seeds: usize,
    /// The seed node of every plane, in plane order.
    pub seed_nodes: Vec<NodeId>,
    /// Last hop at which each surviving seed's own signature changed.
    pub last_hops: Vec<usize>,
    /// Per-seed wall-clock times. Empty for the node-parallel scheduling,
    /// which has no per-seed work to time.
    pub seed_times: Vec<Duration>,
    /// Indices of seeds dropped by [`FailurePolicy::ExcludeSeeds`]. Empty on
    /// a fully successful run.
    ///
    /// [`FailurePolicy::ExcludeSeeds`]: crate::config::FailurePolicy::ExcludeSeeds
    pub excluded_seeds: Vec<usize>,
    /// Total wall-clock time of the run.
    pub total_time: Duration,
}

impl Measure {
    /// Normalizes the raw collision counts and derives every statistic.
    pub(crate) fn build(
        config: &EstimatorConfig,
        num_nodes: usize,
        num_arcs: u64,
        seed_nodes: Vec<NodeId>,
        raw: RawCollisions,
        total_time: Duration,
    ) -> Result<Measure> {
        let RawCollisions {
            mut matrix,
            seed_times,
            excluded_seeds,
        } = raw;
        matrix.normalize();
        let lower_bound_diameter = matrix.lower_bound_diameter();
        let last_hops = matrix.last_hops();
        let hop_table = matrix.hop_table(num_nodes)?;
        Ok(Measure {
            avg_distance: stats::average_distance(&hop_table),
            effective_diameter: stats::effective_diameter(&hop_table, config.threshold),
            total_couples: stats::total_couples_reachable(&hop_table),
            total_couples_percentage: stats::total_couples_percentage(
                &hop_table,
                config.threshold,
            ),
            hop_table,
            lower_bound_diameter,
            threshold: config.threshold,
            num_nodes,
            num_arcs,
            num_seeds: config.num_seeds,
            seed_nodes,
            last_hops,
            seed_times,
            excluded_seeds,
            total_time,
        })
    }
}
