//! Bagtender - bags-list maintenance engine
//!
//! Bagtender keeps a range-partitioned, doubly linked catalogue of weighted
//! entries tidy: it locates the entry at a target global rank, flags entries
//! whose true weight has drifted out of their bag's range, and plans the
//! minimal sequence of "place A immediately ahead of B" operations that
//! establishes the required order around that rank.
//!
//! # Quick Start
//!
//! ```ignore
//! use bagtender::{run_once, RunConfig};
//!
//! // `chain` implements ListProvider + InstructionSink against the ledger.
//! let report = run_once(&chain, &chain, &RunConfig::new(22_500)).await?;
//!
//! if report.residual_misplaced > 0 || report.residual_moves > 0 {
//!     // Residual work after a pass is an anomaly: alert, then decide
//!     // whether to re-run from a fresh snapshot.
//! }
//! ```
//!
//! # Architecture
//!
//! All state reads and instruction submissions go through the
//! [`ListProvider`] and [`InstructionSink`] traits; the engine itself is
//! pure computation over one snapshot and is re-entered from a fresh
//! snapshot after every applied batch.

// Re-export the public API from the member crates
pub use bagtender_core::{
    BagSnapshot, BagView, BatchOutcome, EntryId, Error, InstructionSink, ListNode, ListProvider,
    MoveAhead, Rebag, ReconciledEntry, Result, Thresholds, Weight,
};
pub use bagtender_engine::{
    apply_moves, detect_misplaced, locate, plan_full_sort, plan_semi_sort, rebag_instructions,
    run_once, verify_descending, verify_pivot_partition, walk, BagDirectory, BagWalker, Misplaced,
    RankLocation, ReorderStrategy, RunConfig, RunReport, SemiSortPlan, SortPlan,
};
