//! Migration detection: entries whose true weight left their bag's range
//!
//! An entry belongs to the bag whose ceiling is the smallest threshold
//! strictly greater than its true weight. When rewards or penalties push a
//! weight outside the current bag's range, the entry is flagged for
//! migration and removed from the working view: an entry about to leave a
//! bag cannot be meaningfully ordered within it.
//!
//! Actual migration is an external operation; after it is applied the run
//! must restart from a fresh snapshot, since migration can change which bag
//! (and which local index) is canonical for a given global rank.

use bagtender_core::{BagView, Rebag, ReconciledEntry, Result, Thresholds, Weight};
use tracing::info;

/// An entry flagged for migration, with its canonical destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Misplaced {
    /// The flagged entry
    pub entry: ReconciledEntry,
    /// Ceiling of the bag the entry belongs in
    pub canonical_ceiling: Weight,
}

/// Split a view into the entries that stay and the entries to migrate
///
/// Returns the retained view (misplaced entries removed, walk order kept)
/// and the flagged set. Detection has no side effects beyond this split.
///
/// # Errors
///
/// [`Error::NoCeilingAbove`](bagtender_core::Error::NoCeilingAbove) when a
/// true weight is at or above the highest configured threshold.
pub fn detect_misplaced(
    view: BagView,
    thresholds: &Thresholds,
) -> Result<(BagView, Vec<Misplaced>)> {
    let ceiling = view.ceiling;
    let mut retained = Vec::with_capacity(view.entries.len());
    let mut misplaced = Vec::new();

    for entry in view.entries {
        let canonical_ceiling = thresholds.canonical_ceiling(entry.true_weight)?;
        if canonical_ceiling == entry.bag_ceiling {
            retained.push(entry);
        } else {
            misplaced.push(Misplaced {
                entry,
                canonical_ceiling,
            });
        }
    }

    if !misplaced.is_empty() {
        info!(
            target: "bagtender::rebag",
            ceiling = %ceiling,
            flagged = misplaced.len(),
            "entries outside their bag range"
        );
    }

    Ok((
        BagView {
            ceiling,
            entries: retained,
        },
        misplaced,
    ))
}

/// Build the migration batch for a flagged set
///
/// One instruction per flagged entry; the instructions are mutually
/// independent, so the batch carries no ordering constraint.
pub fn rebag_instructions(misplaced: &[Misplaced]) -> Vec<Rebag> {
    misplaced
        .iter()
        .map(|m| Rebag {
            entry: m.entry.id.clone(),
        })
        .collect()
}
