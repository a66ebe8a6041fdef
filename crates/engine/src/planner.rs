//! Reordering planner: minimal move sequences over one bag
//!
//! Two planners, both consuming a reconciled, migrant-free view:
//!
//! - [`plan_full_sort`] produces the instructions that sort the whole bag
//!   descending by true weight.
//! - [`plan_semi_sort`] establishes only a partial order around a pivot
//!   rank: everything ahead of the pivot index outweighs the pivot,
//!   everything behind weighs no more. Entries on either side stay mutually
//!   unordered, which needs far fewer instructions than a full sort when
//!   every instruction is an expensive external operation.
//!
//! Both planners diff explicit target/working sequences and splice scratch
//! copies; the sequence being iterated is never mutated. Each planner
//! replays its own instructions through [`apply_moves`] and checks its
//! post-condition before returning; a failed check is a
//! [`Error::PlannerInvariantViolation`] and is surfaced, never retried.

use bagtender_core::{BagView, Error, MoveAhead, ReconciledEntry, Result};
use tracing::{debug, warn};

/// Instructions that fully sort a bag descending by true weight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortPlan {
    /// Moves to apply strictly in sequence
    pub instructions: Vec<MoveAhead>,
}

/// Instructions that seat the pivot and clear heavier stragglers below it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemiSortPlan {
    /// Moves to apply strictly in sequence
    pub instructions: Vec<MoveAhead>,
    /// The entry that belongs at the pivot index once the plan is applied
    pub pivot: ReconciledEntry,
}

/// Simulate a move sequence against an order, returning the resulting order
///
/// Each instruction removes `heavier` from wherever it sits and re-inserts
/// it immediately ahead of `lighter`, exactly as the external executor
/// applies it to the linked list.
///
/// # Errors
///
/// [`Error::PlannerInvariantViolation`] if an instruction references an
/// entry that is not part of the order; that can only mean a planner bug.
pub fn apply_moves(order: &[ReconciledEntry], moves: &[MoveAhead]) -> Result<Vec<ReconciledEntry>> {
    let mut working: Vec<ReconciledEntry> = order.to_vec();
    for mv in moves {
        let from = working
            .iter()
            .position(|e| e.id == mv.heavier)
            .ok_or_else(|| {
                Error::PlannerInvariantViolation(format!(
                    "move references unknown entry {}",
                    mv.heavier
                ))
            })?;
        let entry = working.remove(from);
        let to = working
            .iter()
            .position(|e| e.id == mv.lighter)
            .ok_or_else(|| {
                Error::PlannerInvariantViolation(format!(
                    "move references unknown entry {}",
                    mv.lighter
                ))
            })?;
        working.insert(to, entry);
    }
    Ok(working)
}

/// Plan the minimal move sequence that sorts the bag descending
///
/// The stable descending sort of the view is the target order. Walking the
/// target and a scratch working copy in lockstep by position, every place
/// where the target entry outweighs the current occupant yields one
/// instruction moving the target entry there; each instruction strictly
/// reduces the number of out-of-place entries.
///
/// # Errors
///
/// [`Error::PlannerInvariantViolation`] if replaying the plan does not
/// produce a non-increasing order.
pub fn plan_full_sort(view: &BagView) -> Result<SortPlan> {
    let mut target = view.entries.clone();
    target.sort_by(|a, b| b.true_weight.cmp(&a.true_weight));

    let mut working = view.entries.clone();
    let mut instructions = Vec::new();

    for i in 0..target.len() {
        if target[i].true_weight > working[i].true_weight {
            instructions.push(MoveAhead {
                heavier: target[i].id.clone(),
                lighter: working[i].id.clone(),
            });
            let from = working
                .iter()
                .position(|e| e.id == target[i].id)
                .ok_or_else(|| {
                    Error::PlannerInvariantViolation(format!(
                        "target entry {} missing from working copy",
                        target[i].id
                    ))
                })?;
            let entry = working.remove(from);
            working.insert(i, entry);
        }
    }

    let replayed = apply_moves(&view.entries, &instructions)?;
    verify_descending(&replayed)?;

    debug!(
        target: "bagtender::reorder",
        ceiling = %view.ceiling,
        moves = instructions.len(),
        "full sort planned"
    );
    Ok(SortPlan { instructions })
}

/// Plan the minimal move sequence that seats the pivot rank
///
/// The pivot entry is the occupant of `pivot_index` in the stable-sorted
/// target order: the entry that belongs at that rank. Two phases:
///
/// 1. Seat the pivot: scan the working order from the front up to the
///    pivot's current position; at the first strictly lighter entry, emit
///    one move placing the pivot ahead of it. If none exists, the pivot is
///    already optimally seated.
/// 2. Clear heavier stragglers: scan forward from the seat; every strictly
///    heavier entry yields a move placing it ahead of the pivot. Each such
///    move shifts the pivot one position back when applied; the guarantee
///    is established by the final instruction set, not by re-splicing
///    during the scan.
///
/// # Errors
///
/// [`Error::InvalidPivot`] if the index does not address the view;
/// [`Error::PlannerInvariantViolation`] if replaying the plan leaves an
/// entry before the pivot index lighter than the pivot, or one after it
/// heavier.
pub fn plan_semi_sort(view: &BagView, pivot_index: usize) -> Result<SemiSortPlan> {
    let len = view.entries.len();
    if pivot_index >= len {
        return Err(Error::InvalidPivot {
            index: pivot_index,
            len,
        });
    }

    let mut target = view.entries.clone();
    target.sort_by(|a, b| b.true_weight.cmp(&a.true_weight));
    let pivot = target[pivot_index].clone();

    let mut working = view.entries.clone();
    let mut instructions = Vec::new();

    let current = working
        .iter()
        .position(|e| e.id == pivot.id)
        .ok_or_else(|| {
            Error::PlannerInvariantViolation(format!(
                "pivot entry {} missing from working copy",
                pivot.id
            ))
        })?;

    // Phase 1: seat the pivot ahead of the first lighter entry before it.
    let mut seated_at = current;
    for scan in 0..current {
        if working[scan].true_weight < pivot.true_weight {
            instructions.push(MoveAhead {
                heavier: pivot.id.clone(),
                lighter: working[scan].id.clone(),
            });
            let entry = working.remove(current);
            working.insert(scan, entry);
            seated_at = scan;
            break;
        }
    }

    // Phase 2: anything heavier past the seat goes ahead of the pivot.
    for entry in working.iter().skip(seated_at + 1) {
        if entry.true_weight > pivot.true_weight {
            instructions.push(MoveAhead {
                heavier: entry.id.clone(),
                lighter: pivot.id.clone(),
            });
        }
    }

    let replayed = apply_moves(&view.entries, &instructions)?;
    verify_pivot_partition(&replayed, pivot_index)?;

    debug!(
        target: "bagtender::reorder",
        ceiling = %view.ceiling,
        pivot = %pivot.id,
        pivot_index,
        moves = instructions.len(),
        "semi-sort planned"
    );
    Ok(SemiSortPlan {
        instructions,
        pivot,
    })
}

/// Check that an order is non-increasing by true weight
pub fn verify_descending(order: &[ReconciledEntry]) -> Result<()> {
    for pair in order.windows(2) {
        if pair[0].true_weight < pair[1].true_weight {
            warn!(
                target: "bagtender::reorder",
                lighter = %pair[0].id,
                heavier = %pair[1].id,
                "entry ordered ahead of a heavier one"
            );
            return Err(Error::PlannerInvariantViolation(format!(
                "{} (weight {}) ordered ahead of heavier {} (weight {})",
                pair[0].id, pair[0].true_weight, pair[1].id, pair[1].true_weight
            )));
        }
    }
    Ok(())
}

/// Check the partial order around a pivot index: nothing before it is
/// lighter than the occupant, nothing after it is heavier
pub fn verify_pivot_partition(order: &[ReconciledEntry], pivot_index: usize) -> Result<()> {
    let Some(pivot) = order.get(pivot_index) else {
        return Err(Error::InvalidPivot {
            index: pivot_index,
            len: order.len(),
        });
    };
    for (i, entry) in order.iter().enumerate() {
        if i < pivot_index && entry.true_weight < pivot.true_weight {
            warn!(
                target: "bagtender::reorder",
                entry = %entry.id,
                pivot = %pivot.id,
                "lighter entry ahead of the pivot"
            );
            return Err(Error::PlannerInvariantViolation(format!(
                "{} (weight {}) ahead of pivot {} (weight {})",
                entry.id, entry.true_weight, pivot.id, pivot.true_weight
            )));
        }
        if i > pivot_index && entry.true_weight > pivot.true_weight {
            warn!(
                target: "bagtender::reorder",
                entry = %entry.id,
                pivot = %pivot.id,
                "heavier entry behind the pivot"
            );
            return Err(Error::PlannerInvariantViolation(format!(
                "{} (weight {}) behind pivot {} (weight {})",
                entry.id, entry.true_weight, pivot.id, pivot.true_weight
            )));
        }
    }
    Ok(())
}
