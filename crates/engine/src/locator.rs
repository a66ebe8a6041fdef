//! Rank locator: find the entry at a target global rank
//!
//! The global rank of an entry is the 1-based position it would hold if all
//! entries across all bags were sorted descending by true weight. Bags are
//! scanned in the directory's descending-ceiling order, each bag in walk
//! order, accumulating a running count; the accumulation is inherently
//! sequential across bags and must not be reordered.

use bagtender_core::{BagSnapshot, Error, ListProvider, ReconciledEntry, Result};
use tracing::debug;

use crate::directory::BagDirectory;
use crate::walker::BagWalker;

/// Where a global rank lands: the owning bag, the position inside it, and
/// the entry itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankLocation {
    /// Snapshot of the bag holding the rank
    pub bag: BagSnapshot,
    /// 0-based index of the entry within the bag's walk order
    pub local_index: usize,
    /// The entry at the rank
    pub entry: ReconciledEntry,
}

/// Locate the entry at 1-based global rank `rank`
///
/// Deterministic for a fixed snapshot: the same rank always resolves to the
/// same entry and local index.
///
/// # Errors
///
/// [`Error::RankExceedsPopulation`] when fewer than `rank` entries exist
/// across all bags (a rank of zero never matches and fails the same way).
pub async fn locate<P: ListProvider + ?Sized>(
    provider: &P,
    directory: &BagDirectory,
    rank: u64,
) -> Result<RankLocation> {
    let mut total: u64 = 0;

    for bag in directory.bags() {
        let mut walker = BagWalker::new(provider, bag);
        let mut in_bag: usize = 0;
        while let Some(entry) = walker.advance().await? {
            in_bag += 1;
            total += 1;
            if total == rank {
                debug!(
                    target: "bagtender::rank",
                    rank,
                    ceiling = %bag.ceiling,
                    local_index = in_bag - 1,
                    entry = %entry.id,
                    "target rank located"
                );
                return Ok(RankLocation {
                    bag: bag.clone(),
                    local_index: in_bag - 1,
                    entry,
                });
            }
        }
    }

    Err(Error::RankExceedsPopulation {
        rank,
        population: total,
    })
}
