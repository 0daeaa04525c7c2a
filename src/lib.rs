// Copyright (C) 2026  The graph-minhash developers
// See the AUTHORS file at the top-level directory of this distribution
// License: GNU General Public License version 3, or any later version
// See top-level LICENSE file for more information

#![doc = include_str!("../README.md")]

pub mod collisions;
pub mod config;
mod error;
pub mod graph;
pub mod measure;
mod propagate;
pub mod seeds;
pub mod signature;
pub mod stats;

pub use config::{EstimatorConfig, FailurePolicy, Scheduling};
pub use error::{Error, Result};
pub use graph::{ForwardGraph, NodeId, VecGraph};
pub use measure::Measure;
pub use propagate::estimate;
pub use seeds::SeedSet;
