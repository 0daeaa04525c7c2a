// Copyright (C) 2026  The graph-minhash developers
// See the AUTHORS file at the top-level directory of this distribution
// License: GNU General Public License version 3, or any later version
// See top-level LICENSE file for more information

//! Run configuration for the estimator

use crate::error::{Error, Result};

/// How propagation work is scheduled across threads.
///
/// All three schedulings compute the same estimate, bit for bit; they differ
/// in memory footprint and in how they scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scheduling {
    /// Single-threaded fixpoint loop, one seed after the other. The
    /// reference the parallel schedulings are checked against.
    Sequential,
    /// One independent signature plane per worker; no synchronization until
    /// the final merge. Memory grows with the number of in-flight seeds.
    #[default]
    SeedParallel,
    /// The node-id space is partitioned across workers sharing a single
    /// signature matrix, with a once-per-hop barrier rendezvous. One matrix
    /// total, regardless of the number of seeds.
    NodeParallel,
}

/// What to do when a worker fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FailurePolicy {
    /// Fail the whole run on the first worker failure.
    #[default]
    FailRun,
    /// Drop the affected seed and estimate from the surviving planes. The
    /// excluded seeds are listed on the result; the hop table is scaled by
    /// the number of planes actually merged. Only meaningful for
    /// [`Scheduling::SeedParallel`]: a failed node partition poisons every
    /// plane, so node-parallel runs always fail whole.
    ExcludeSeeds,
}

/// Configuration surface of a run.
///
/// # Examples
///
/// ```
/// use graph_minhash::config::{EstimatorConfig, Scheduling};
///
/// let config = EstimatorConfig::new(256, 0.9)?
///     .with_scheduling(Scheduling::NodeParallel)
///     .with_num_threads(8);
/// assert_eq!(config.num_seeds, 256);
/// # Ok::<(), graph_minhash::Error>(())
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EstimatorConfig {
    /// Number of independent signature planes. More seeds lower the variance
    /// of the estimate and cost proportionally more work.
    pub num_seeds: usize,
    /// Percentile defining the effective diameter, in `(0, 1]`.
    pub threshold: f64,
    /// Worker pool size; `0` means one worker per available CPU.
    pub num_threads: usize,
    pub scheduling: Scheduling,
    pub on_worker_failure: FailurePolicy,
    /// Safety bound on the number of hops. `None` trusts monotonicity for
    /// termination.
    pub max_hops: Option<usize>,
}

impl EstimatorConfig {
    /// Creates a configuration, validating `num_seeds` and `threshold`.
    pub fn new(num_seeds: usize, threshold: f64) -> Result<EstimatorConfig> {
        if num_seeds == 0 {
            return Err(Error::InvalidNumSeeds);
        }
        if !(threshold > 0. && threshold <= 1.) {
            return Err(Error::InvalidThreshold(threshold));
        }
        Ok(EstimatorConfig {
            num_seeds,
            threshold,
            num_threads: 0,
            scheduling: Scheduling::default(),
            on_worker_failure: FailurePolicy::default(),
            max_hops: None,
        })
    }

    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    pub fn with_scheduling(mut self, scheduling: Scheduling) -> Self {
        self.scheduling = scheduling;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_worker_failure = policy;
        self
    }

    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = Some(max_hops);
        self
    }

    /// Pool size actually used by a run.
    pub(crate) fn resolved_num_threads(&self) -> usize {
        if self.num_threads > 0 {
            self.num_threads
        } else {
            num_cpus::get()
        }
    }
}
