//! Core types for the bags-list maintenance engine
//!
//! This module defines the foundational types:
//! - `Weight`: exact base-unit weight of an entry
//! - `EntryId`: identifier of a list entry (an account on the ledger)
//! - `Thresholds`: the validated, ascending list of bag ceilings
//! - `BagSnapshot` / `ListNode`: the raw snapshot shapes read from a provider
//! - `ReconciledEntry` / `BagView`: the materialized working view
//! - `MoveAhead` / `Rebag` / `BatchOutcome`: instructions for the executor
//!
//! Entries form a doubly linked list per bag, but `prev`/`next` are
//! id-valued back-references resolved through an arena keyed by [`EntryId`];
//! nothing here owns anything else, so there are no ownership cycles.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Exact base-unit weight of an entry.
///
/// Comparisons and bag classification are exact integer operations; a
/// floating approximation is never acceptable here.
pub type Weight = u128;

/// Identifier of a list entry (an account address on the ledger)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(String);

impl EntryId {
    /// Create an EntryId from anything string-like
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The underlying address string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The fixed, ascending list of bag ceilings for one run
///
/// Thresholds partition the weight domain into contiguous half-open ranges:
/// a weight belongs to the bag whose ceiling is the smallest threshold
/// *strictly greater* than it. A weight exactly equal to a threshold never
/// matches that threshold's own bag.
///
/// The list is immutable for the duration of a run; a snapshot carrying a
/// bag ceiling outside this list indicates stale configuration and fails
/// fast (see [`Error::UnrecognizedThreshold`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds(Vec<Weight>);

impl Thresholds {
    /// Validate and construct a threshold list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidThresholds`] if the list is empty or not
    /// strictly ascending.
    pub fn new(ceilings: Vec<Weight>) -> Result<Self> {
        if ceilings.is_empty() {
            return Err(Error::InvalidThresholds("empty threshold list".to_string()));
        }
        if !ceilings.windows(2).all(|w| w[0] < w[1]) {
            return Err(Error::InvalidThresholds(
                "thresholds must be strictly ascending".to_string(),
            ));
        }
        Ok(Self(ceilings))
    }

    /// The canonical ceiling for a weight: the smallest threshold strictly
    /// greater than it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoCeilingAbove`] when the weight is at or above the
    /// highest configured threshold. Classification never fails silently.
    pub fn canonical_ceiling(&self, weight: Weight) -> Result<Weight> {
        self.0
            .iter()
            .copied()
            .find(|t| *t > weight)
            .ok_or(Error::NoCeilingAbove { weight })
    }

    /// Whether a ceiling is part of the configured list
    pub fn recognizes(&self, ceiling: Weight) -> bool {
        self.0.binary_search(&ceiling).is_ok()
    }

    /// The ceilings, ascending
    pub fn as_slice(&self) -> &[Weight] {
        &self.0
    }
}

/// Snapshot of one bag: its ceiling and the ends of its linked list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagSnapshot {
    /// Exclusive upper bound of the bag's weight range
    pub ceiling: Weight,
    /// First entry of the bag's forward chain
    pub head: Option<EntryId>,
    /// Last entry of the bag's forward chain
    pub tail: Option<EntryId>,
}

impl BagSnapshot {
    /// A bag with no head or no tail holds no entries and is skipped
    pub fn is_empty(&self) -> bool {
        self.head.is_none() || self.tail.is_none()
    }
}

/// One entry as recorded in the snapshot's linked structure
///
/// `cached_weight` is the weight as last written into the structure, which
/// can be stale relative to the entry's true current weight: rewards and
/// penalties applied on the ledger do not update it automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListNode {
    /// The entry's identifier
    pub id: EntryId,
    /// Previous entry in the bag, if any (back-reference, lookup only)
    pub prev: Option<EntryId>,
    /// Next entry in the bag, if any
    pub next: Option<EntryId>,
    /// Ceiling of the bag this entry currently sits in
    pub bag_ceiling: Weight,
    /// Weight as recorded in the structure, possibly stale
    pub cached_weight: Weight,
}

/// A walked entry with its authoritative weight attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledEntry {
    /// The entry's identifier
    pub id: EntryId,
    /// Weight as recorded in the structure at walk time
    pub cached_weight: Weight,
    /// Authoritative weight from the weight oracle
    pub true_weight: Weight,
    /// Ceiling of the bag this entry currently sits in
    pub bag_ceiling: Weight,
}

/// Materialized, index-addressable view of one bag in walk order
///
/// Constructed fresh per run from a snapshot, mutated only as scratch copies
/// inside the planners, and discarded once instructions are emitted. A
/// collaborator that already provides a pre-walked sequence can build a
/// `BagView` directly instead of going through the walker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagView {
    /// Ceiling of the walked bag
    pub ceiling: Weight,
    /// Entries in walk (head-to-tail) order
    pub entries: Vec<ReconciledEntry>,
}

impl BagView {
    /// Number of entries in the view
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the view holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of an entry in walk order
    pub fn position_of(&self, id: &EntryId) -> Option<usize> {
        self.entries.iter().position(|e| &e.id == id)
    }
}

/// Reordering instruction: place `heavier` immediately ahead of `lighter`
/// within the same bag's list
///
/// Instruction lists are order-sensitive: later instructions may depend on
/// earlier ones having been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveAhead {
    /// The entry to move
    pub heavier: EntryId,
    /// The entry it is placed immediately ahead of
    pub lighter: EntryId,
}

/// Migration instruction: move an entry to the bag matching its true weight
///
/// Rebag instructions are independent of each other; no ordering constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rebag {
    /// The entry to move to its canonical bag
    pub entry: EntryId,
}

/// Result of an externally applied instruction batch
///
/// The executor applies a batch ideally as a single all-or-nothing
/// operation; when it cannot, this reports which calls failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchOutcome {
    /// Every instruction applied
    Completed,
    /// The batch ran to the end but some instructions failed
    CompletedWithErrors {
        /// 0-based indices of the failed instructions
        failed: Vec<usize>,
    },
    /// The batch stopped early
    Interrupted {
        /// 0-based index of the instruction it stopped at
        at: usize,
    },
}

impl BatchOutcome {
    /// Whether every instruction in the batch applied
    pub fn is_clean(&self) -> bool {
        matches!(self, BatchOutcome::Completed)
    }
}
