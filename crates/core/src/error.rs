//! Error types for the bags-list maintenance engine
//!
//! This module defines all error kinds surfaced by the engine. Every error is
//! terminal for the current run: the engine performs no local recovery, and
//! the embedding orchestration layer decides whether to abort, alert, or
//! re-run from a fresh snapshot.
//!
//! We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.

use crate::types::Weight;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds surfaced by the engine
#[derive(Debug, Error)]
pub enum Error {
    /// A bag's forward chain is inconsistent: a `next` reference that does
    /// not resolve, a revisited entry, or a chain that does not end at the
    /// recorded tail. The snapshot cannot be trusted; abort the run.
    #[error("broken chain in bag {ceiling}: {detail}")]
    BrokenChain {
        /// Ceiling of the bag whose chain is inconsistent
        ceiling: Weight,
        /// What the walker observed
        detail: String,
    },

    /// A bag ceiling observed in the snapshot is not present in the
    /// configured threshold list. Signals a stale run configuration.
    #[error("bag ceiling {ceiling} is not a recognized threshold")]
    UnrecognizedThreshold {
        /// The unrecognized ceiling
        ceiling: Weight,
    },

    /// The requested global rank is larger than the total entry count.
    #[error("rank {rank} exceeds population of {population} entries")]
    RankExceedsPopulation {
        /// The requested 1-based rank
        rank: u64,
        /// Total entries across all bags in the snapshot
        population: u64,
    },

    /// No configured threshold is strictly greater than the given weight,
    /// so the weight cannot be classified into any bag.
    #[error("no configured threshold above weight {weight}")]
    NoCeilingAbove {
        /// The unclassifiable weight
        weight: Weight,
    },

    /// A planner post-condition check failed. Indicates either a weight read
    /// race or a planner bug; must be surfaced, never silently retried.
    #[error("planner invariant violation: {0}")]
    PlannerInvariantViolation(String),

    /// The pivot index does not address an entry of the working view.
    #[error("pivot index {index} out of bounds for view of {len} entries")]
    InvalidPivot {
        /// The offending 0-based index
        index: usize,
        /// Length of the working view
        len: usize,
    },

    /// The threshold configuration itself is malformed (empty, or not
    /// strictly ascending).
    #[error("invalid threshold configuration: {0}")]
    InvalidThresholds(String),

    /// A collaborator call failed (snapshot read or instruction submission).
    #[error("provider error: {0}")]
    Provider(String),
}
