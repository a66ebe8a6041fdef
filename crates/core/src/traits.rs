//! Collaborator traits at the boundary of the engine
//!
//! The engine is pure computation over a one-shot snapshot; everything that
//! touches the outside world sits behind these two traits so that
//! implementations (an RPC client, an in-memory fixture) can be swapped
//! without breaking the engine.
//!
//! All methods are asynchronous and awaited sequentially by the engine; it
//! never issues overlapping calls on its own. A read failure mid-walk fails
//! the whole run rather than yielding partial results.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{BagSnapshot, BatchOutcome, EntryId, ListNode, MoveAhead, Rebag, Weight};

/// Read path: snapshot of the bag structure and the weight oracle
///
/// Implementations map their transport failures into
/// [`Error::Provider`](crate::error::Error::Provider).
#[async_trait]
pub trait ListProvider: Send + Sync {
    /// All non-empty bags in the snapshot, in no particular order
    async fn bags(&self) -> Result<Vec<BagSnapshot>>;

    /// The fixed threshold configuration, ascending
    async fn thresholds(&self) -> Result<Vec<Weight>>;

    /// Resolve one entry of the linked structure, `None` if unknown
    async fn node(&self, id: &EntryId) -> Result<Option<ListNode>>;

    /// The authoritative current weight of an entry, in exact base units
    ///
    /// Decoupled from whatever weight is cached in the structure; this is
    /// the value all ordering and classification decisions are made on.
    async fn current_weight(&self, id: &EntryId) -> Result<Weight>;
}

/// Write path: hands instruction batches to the external executor
///
/// The engine treats a submission as a single atomic application followed by
/// a mandatory re-snapshot, never as incrementally observable partial state.
#[async_trait]
pub trait InstructionSink: Send + Sync {
    /// Apply a batch of migration instructions (mutually independent)
    async fn submit_rebags(&self, batch: &[Rebag]) -> Result<BatchOutcome>;

    /// Apply a batch of reordering instructions, strictly in sequence
    async fn submit_moves(&self, batch: &[MoveAhead]) -> Result<BatchOutcome>;
}
