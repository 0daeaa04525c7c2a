// Copyright (C) 2026  The graph-minhash developers
// See the AUTHORS file at the top-level directory of this distribution
// License: GNU General Public License version 3, or any later version
// See top-level LICENSE file for more information

//! Node-parallel scheduling with a per-hop barrier
//!
//! The node-id space is partitioned across workers that all share one
//! signature matrix; every worker advances all planes for its node slice,
//! once per hop, in lock-step. After each hop the workers meet at a
//! barrier; the barrier's leader runs the hop's single linearization point
//! (tracker and snapshot swap, per-plane collision count) while the others
//! are parked at a second rendezvous, then everyone re-reads the shared
//! continue flag. This scheduling keeps one signature matrix total instead
//! of one plane per in-flight seed.
//!
//! Within a hop, workers write only the rows of their own node slice and
//! read only the frozen snapshot, so relaxed atomics suffice; the barrier
//! provides the cross-hop ordering.

use std::ops::Range;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Barrier, Mutex};

use log::debug;

use super::RawCollisions;
use crate::collisions::CollisionsMatrix;
use crate::config::EstimatorConfig;
use crate::error::{Error, Result};
use crate::graph::{ForwardGraph, NodeId};
use crate::signature::{DirtyTracker, SignatureMatrix};

/// Barrier-owned state, touched only by the leader between the two
/// rendezvous of a hop (and by workers recording a caught panic).
struct AggState {
    /// `[seed][hop]` collision counts; rectangular by construction, since
    /// every hop records every plane.
    rows: Vec<Vec<u64>>,
    hop: usize,
    error: Option<Error>,
}

struct Shared<'run, G> {
    graph: &'run G,
    matrix: SignatureMatrix,
    tracker: DirtyTracker,
    agg: Mutex<AggState>,
    /// One slot per worker: did the worker's slice change this hop?
    /// Combined under the lock before the rendezvous.
    changed: Mutex<Vec<bool>>,
    keep_going: AtomicBool,
    barrier: Barrier,
    max_hops: Option<usize>,
}

pub(crate) fn run<G: ForwardGraph>(
    graph: &G,
    config: &EstimatorConfig,
    seed_nodes: &[NodeId],
) -> Result<RawCollisions> {
    let num_nodes = graph.num_nodes();
    let num_seeds = seed_nodes.len();
    let num_threads = config.resolved_num_threads().min(num_nodes.max(1));
    let slice_len = num_nodes.div_ceil(num_threads);
    debug!(
        "node-parallel scheduling: {} workers, {} nodes per slice",
        num_threads, slice_len
    );

    let matrix = SignatureMatrix::new(num_nodes, num_seeds);
    let tracker = DirtyTracker::new(num_nodes);
    for (s, &seed_node) in seed_nodes.iter().enumerate() {
        matrix.init_seed(seed_node, s);
        tracker.mark_snapshot(seed_node);
    }

    let shared = Shared {
        graph,
        matrix,
        tracker,
        // Hop 0: each plane holds exactly its seed node's bit.
        agg: Mutex::new(AggState {
            rows: vec![vec![1u64]; num_seeds],
            hop: 0,
            error: None,
        }),
        changed: Mutex::new(vec![false; num_threads]),
        keep_going: AtomicBool::new(true),
        barrier: Barrier::new(num_threads),
        max_hops: config.max_hops,
    };

    crossbeam::thread::scope(|scope| {
        for index in 0..num_threads {
            let shared = &shared;
            let range = index * slice_len..((index + 1) * slice_len).min(num_nodes);
            scope.spawn(move |_| worker(shared, index, range));
        }
    })
    .expect("node-parallel worker panicked outside the propagation step");

    let state = shared.agg.into_inner().unwrap();
    if let Some(error) = state.error {
        return Err(error);
    }
    Ok(RawCollisions {
        matrix: CollisionsMatrix::from_rows(state.rows),
        seed_times: Vec::new(),
        excluded_seeds: Vec::new(),
    })
}

fn worker<G: ForwardGraph>(shared: &Shared<'_, G>, index: usize, range: Range<NodeId>) {
    loop {
        let slice_changed =
            match catch_unwind(AssertUnwindSafe(|| propagate_slice(shared, range.clone()))) {
                Ok(slice_changed) => slice_changed,
                Err(panic) => {
                    // Record the failure but keep honoring the rendezvous
                    // protocol so the other workers are not left at the
                    // barrier; the leader will stop the run.
                    let mut state = shared.agg.lock().unwrap();
                    if state.error.is_none() {
                        state.error = Some(Error::PartitionWorker {
                            start: range.start,
                            end: range.end,
                            message: super::panic_message(panic),
                        });
                    }
                    false
                }
            };
        shared.changed.lock().unwrap()[index] = slice_changed;

        if shared.barrier.wait().is_leader() {
            aggregate(shared);
        }
        // Parks everyone until the leader's aggregation is done.
        shared.barrier.wait();
        if !shared.keep_going.load(Ordering::Relaxed) {
            break;
        }
    }
}

/// One hop of propagation over `range`, all planes at once.
///
/// Only arcs whose target changed last hop are rescanned: a bit that became
/// visible at hop `h` sits in the tracker snapshot for hop `h + 1`, so the
/// prune drops no propagation the full scan would perform.
fn propagate_slice<G: ForwardGraph>(shared: &Shared<'_, G>, range: Range<NodeId>) -> bool {
    let words_per_node = shared.matrix.words_per_node();
    let mut slice_changed = false;
    for node in range {
        for succ in shared.graph.successors(node) {
            if !shared.tracker.changed_last_hop(succ) {
                continue;
            }
            for word in 0..words_per_node {
                let succ_word = shared.matrix.snapshot_word(succ, word);
                if succ_word == 0 {
                    continue;
                }
                // Bits the successor has and this node still misses.
                let missing = succ_word & !shared.matrix.current_word(node, word);
                if missing != 0 {
                    shared.matrix.or_current(node, word, missing);
                    shared.tracker.mark(node);
                    slice_changed = true;
                }
            }
        }
    }
    slice_changed
}

/// The per-hop linearization point, run exactly once per hop by the
/// barrier's leader: swap the tracker and signature snapshots, popcount
/// every plane, extend the collision rows, decide whether to continue.
fn aggregate<G: ForwardGraph>(shared: &Shared<'_, G>) {
    let any_changed = shared.changed.lock().unwrap().iter().any(|&changed| changed);
    let mut state = shared.agg.lock().unwrap();
    if state.error.is_some() || !any_changed {
        shared.keep_going.store(false, Ordering::Relaxed);
        return;
    }

    state.hop += 1;
    if let Some(max) = shared.max_hops {
        if state.hop > max {
            state.error = Some(Error::HopBoundExceeded(max));
            shared.keep_going.store(false, Ordering::Relaxed);
            return;
        }
    }

    shared.tracker.advance();
    let mut counts = vec![0u64; state.rows.len()];
    shared.matrix.freeze_and_count(&mut counts);
    debug!(
        "hop {}: {} collisions",
        state.hop,
        counts.iter().sum::<u64>()
    );
    for (row, count) in state.rows.iter_mut().zip(counts) {
        row.push(count);
    }
    shared.keep_going.store(true, Ordering::Relaxed);
}
