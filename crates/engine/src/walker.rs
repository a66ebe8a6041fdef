//! List walker: lazy traversal of one bag's forward chain
//!
//! The walker follows `next` links from a bag's head until an entry with no
//! successor is reached, reconciling each node's cached weight against the
//! weight oracle along the way. The stored weight is known to be potentially
//! stale (rewards and penalties do not update it), so every ordering
//! decision downstream is made on the reconciled `true_weight`.
//!
//! The walker is read-only: it never mutates bag linkage. It is restartable
//! by constructing a new walker over the same snapshot, which yields the
//! identical sequence.

use bagtender_core::{
    BagSnapshot, BagView, EntryId, Error, ListProvider, ReconciledEntry, Result, Weight,
};
use rustc_hash::FxHashSet;
use tracing::debug;

/// Lazy pull cursor over one bag's forward chain
///
/// `advance` yields entries one at a time; `Ok(None)` marks the end of the
/// chain. Any inconsistency in the snapshot's linkage (a dangling `next`, a
/// revisited entry, a chain that does not end at the recorded tail)
/// surfaces as [`Error::BrokenChain`] and aborts the run.
pub struct BagWalker<'a, P: ?Sized> {
    provider: &'a P,
    ceiling: Weight,
    tail: Option<EntryId>,
    next: Option<EntryId>,
    visited: FxHashSet<EntryId>,
}

impl<'a, P: ListProvider + ?Sized> BagWalker<'a, P> {
    /// Start a walk at the bag's head
    pub fn new(provider: &'a P, bag: &BagSnapshot) -> Self {
        Self {
            provider,
            ceiling: bag.ceiling,
            tail: bag.tail.clone(),
            next: bag.head.clone(),
            visited: FxHashSet::default(),
        }
    }

    /// Yield the next reconciled entry, or `Ok(None)` at the end of the chain
    ///
    /// # Errors
    ///
    /// [`Error::BrokenChain`] on any linkage inconsistency; provider errors
    /// pass through and fail the run.
    pub async fn advance(&mut self) -> Result<Option<ReconciledEntry>> {
        let Some(id) = self.next.take() else {
            return Ok(None);
        };

        if !self.visited.insert(id.clone()) {
            return Err(Error::BrokenChain {
                ceiling: self.ceiling,
                detail: format!("entry {id} visited twice, chain has a cycle"),
            });
        }

        let node = self.provider.node(&id).await?.ok_or_else(|| Error::BrokenChain {
            ceiling: self.ceiling,
            detail: format!("next reference {id} does not resolve to a known entry"),
        })?;
        let true_weight = self.provider.current_weight(&id).await?;

        match node.next {
            Some(next) => {
                if self.tail.as_ref() == Some(&id) {
                    return Err(Error::BrokenChain {
                        ceiling: self.ceiling,
                        detail: format!("tail {id} has a successor {next}"),
                    });
                }
                self.next = Some(next);
            }
            None => {
                if self.tail.as_ref() != Some(&id) {
                    return Err(Error::BrokenChain {
                        ceiling: self.ceiling,
                        detail: format!("chain ended at {id} instead of the recorded tail"),
                    });
                }
            }
        }

        Ok(Some(ReconciledEntry {
            id: node.id,
            cached_weight: node.cached_weight,
            true_weight,
            bag_ceiling: node.bag_ceiling,
        }))
    }
}

/// Walk a bag to the end and materialize its view
pub async fn walk<P: ListProvider + ?Sized>(provider: &P, bag: &BagSnapshot) -> Result<BagView> {
    let mut walker = BagWalker::new(provider, bag);
    let mut entries = Vec::new();
    while let Some(entry) = walker.advance().await? {
        entries.push(entry);
    }
    debug!(
        target: "bagtender::walk",
        ceiling = %bag.ceiling,
        entries = entries.len(),
        "bag walked"
    );
    Ok(BagView {
        ceiling: bag.ceiling,
        entries,
    })
}
