// Copyright (C) 2026  The graph-minhash developers
// See the AUTHORS file at the top-level directory of this distribution
// License: GNU General Public License version 3, or any later version
// See top-level LICENSE file for more information

//! Seed-parallel scheduling
//!
//! Seeds are partitioned across a bounded rayon pool; each worker owns an
//! independent signature plane and runs it to its own fixpoint, so no
//! synchronization happens until the per-seed rows are merged. Worker
//! panics are caught at the join point and handled per the configured
//! failure policy.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use dsi_progress_logger::prelude::*;
use log::{debug, warn};
use rayon::prelude::*;

use super::{panic_message, propagate_plane, RawCollisions};
use crate::collisions::CollisionsMatrix;
use crate::config::{EstimatorConfig, FailurePolicy};
use crate::error::{Error, Result};
use crate::graph::{ForwardGraph, NodeId};

pub(crate) fn run<G: ForwardGraph>(
    graph: &G,
    config: &EstimatorConfig,
    seed_nodes: &[NodeId],
) -> Result<RawCollisions> {
    let num_threads = config.resolved_num_threads();
    debug!("seed-parallel scheduling over {} worker threads", num_threads);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()?;

    let mut pl = progress_logger![item_name = "seed", expected_updates = Some(seed_nodes.len())];
    pl.start("Propagating signature planes in parallel...");
    let pl = Mutex::new(pl);

    let results: Vec<Result<(Vec<u64>, Duration)>> = pool.install(|| {
        seed_nodes
            .par_iter()
            .enumerate()
            .map(|(s, &seed_node)| {
                let seed_start = Instant::now();
                let row =
                    catch_unwind(AssertUnwindSafe(|| {
                        propagate_plane(graph, seed_node, config.max_hops)
                    }))
                    .unwrap_or_else(|panic| {
                        Err(Error::SeedWorker {
                            seed: s,
                            message: panic_message(panic),
                        })
                    })?;
                pl.lock().unwrap().update();
                Ok((row, seed_start.elapsed()))
            })
            .collect()
    });

    pl.into_inner().unwrap().done();

    let mut rows = Vec::with_capacity(seed_nodes.len());
    let mut seed_times = Vec::with_capacity(seed_nodes.len());
    let mut excluded_seeds = Vec::new();
    for (s, result) in results.into_iter().enumerate() {
        match result {
            Ok((row, seed_time)) => {
                rows.push(row);
                seed_times.push(seed_time);
            }
            Err(error) => match config.on_worker_failure {
                FailurePolicy::FailRun => return Err(error),
                FailurePolicy::ExcludeSeeds => {
                    warn!("excluding seed {} from the estimate: {}", s, error);
                    excluded_seeds.push(s);
                }
            },
        }
    }
    if rows.is_empty() {
        return Err(Error::AllSeedsExcluded(seed_nodes.len()));
    }

    Ok(RawCollisions {
        matrix: CollisionsMatrix::from_rows(rows),
        seed_times,
        excluded_seeds,
    })
}
