// Copyright (C) 2026  The graph-minhash developers
// See the AUTHORS file at the top-level directory of this distribution
// License: GNU General Public License version 3, or any later version
// See top-level LICENSE file for more information

//! Errors returned by the estimator

use thiserror::Error;

use crate::graph::NodeId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The configured number of seeds is zero.
    #[error("number of seeds must be strictly positive")]
    InvalidNumSeeds,

    /// The configured effective-diameter threshold is outside `(0, 1]`.
    #[error("threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f64),

    /// A supplied seed-node list does not have the configured length.
    #[error("expected {expected} seed nodes, got {actual}")]
    SeedCountMismatch { expected: usize, actual: usize },

    /// The same node was supplied twice as a seed.
    #[error("duplicate seed node {0}")]
    DuplicateSeedNode(NodeId),

    /// A seed node id is not a node of the graph being measured.
    #[error("seed node {node} out of range for graph with {num_nodes} nodes")]
    SeedNodeOutOfRange { node: NodeId, num_nodes: usize },

    /// More distinct seed nodes were requested than the graph has nodes.
    #[error("cannot pick {num_seeds} distinct seed nodes from a graph with {num_nodes} nodes")]
    NotEnoughNodes { num_seeds: usize, num_nodes: usize },

    /// The safety bound on the number of hops was reached before the
    /// fixpoint. Monotonicity guarantees termination on a correct run, so
    /// hitting this bound means either the bound was set below the actual
    /// diameter or there is a bug clearing signature bits.
    #[error("propagation exceeded the maximum of {0} hops without converging")]
    HopBoundExceeded(usize),

    /// A seed worker panicked.
    #[error("worker for seed {seed} failed: {message}")]
    SeedWorker { seed: usize, message: String },

    /// A node-partition worker panicked.
    #[error("worker for nodes {start}..{end} failed: {message}")]
    PartitionWorker {
        start: NodeId,
        end: NodeId,
        message: String,
    },

    /// Every seed was excluded by the best-effort failure policy, so there
    /// is nothing left to aggregate.
    #[error("all {0} seeds were excluded after worker failures")]
    AllSeedsExcluded(usize),

    #[error("could not build worker thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
