//! Core types and traits for the bags-list maintenance engine
//!
//! This crate defines the foundational pieces shared by the engine and by
//! collaborator implementations:
//! - `Weight` / `EntryId`: exact weights and entry identity
//! - `Thresholds`: validated bag-ceiling configuration and classification
//! - `BagSnapshot` / `ListNode`: raw snapshot shapes
//! - `ReconciledEntry` / `BagView`: the materialized working view
//! - `MoveAhead` / `Rebag` / `BatchOutcome`: instructions and their outcomes
//! - `Error`: the error kind hierarchy
//! - Traits: `ListProvider` (read path), `InstructionSink` (write path)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use traits::{InstructionSink, ListProvider};
pub use types::{
    BagSnapshot, BagView, BatchOutcome, EntryId, ListNode, MoveAhead, Rebag, ReconciledEntry,
    Thresholds, Weight,
};
