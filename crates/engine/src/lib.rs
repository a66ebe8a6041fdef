//! The bags-list maintenance engine
//!
//! Pure computation over a one-shot snapshot of a range-partitioned,
//! doubly linked catalogue of weighted entries:
//!
//! - [`BagDirectory`]: the validated, descending-ordered bag set
//! - [`BagWalker`] / [`walk`]: lazy traversal reconciling stale weights
//! - [`locate`]: resolve a 1-based global rank to a bag and local index
//! - [`detect_misplaced`]: flag entries whose true weight left their bag
//! - [`plan_full_sort`] / [`plan_semi_sort`]: minimal move sequences
//! - [`run_once`]: one locate–rebag–reorder–verify maintenance pass
//!
//! The engine is single-threaded and synchronous over its in-memory views;
//! it suspends only on the collaborator traits defined in
//! [`bagtender_core`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod directory;
pub mod locator;
pub mod migration;
pub mod planner;
pub mod run;
pub mod walker;


pub use directory::BagDirectory;
pub use locator::{locate, RankLocation};
pub use migration::{detect_misplaced, rebag_instructions, Misplaced};
pub use planner::{
    apply_moves, plan_full_sort, plan_semi_sort, verify_descending, verify_pivot_partition,
    SemiSortPlan, SortPlan,
};
pub use run::{run_once, ReorderStrategy, RunConfig, RunReport};
pub use walker::{walk, BagWalker};
