//! One maintenance pass: locate, rebag, reorder, re-verify
//!
//! `run_once` performs a single read–act–reread cycle against the
//! collaborators:
//!
//! 1. Load the bag directory and locate the target global rank.
//! 2. Walk the owning bag, flag entries outside their bag's range, submit
//!    the rebag batch, and re-snapshot — migration can change which bag,
//!    and which local index, is canonical for the rank.
//! 3. Plan the reordering (pivot-relative semi-sort by default, full sort
//!    on request), submit the move batch, then re-walk the pivot's
//!    canonical bag and re-plan.
//!
//! Residual work found by either re-check is a reportable anomaly, not a
//! reason to loop: the engine never retries internally. Deciding whether to
//! run again from a fresh snapshot belongs to the caller.

use bagtender_core::{
    BatchOutcome, EntryId, InstructionSink, ListProvider, ReconciledEntry, Result, Weight,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::directory::BagDirectory;
use crate::locator::locate;
use crate::migration::{detect_misplaced, rebag_instructions};
use crate::planner::{plan_full_sort, plan_semi_sort};
use crate::walker::walk;

/// Which reordering planner a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReorderStrategy {
    /// Partial order around the target rank only (fewer instructions)
    SemiSort,
    /// Whole bag descending by true weight
    FullSort,
}

/// Configuration of one maintenance pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// 1-based global rank the pass pivots on (e.g. a population cutoff)
    pub target_rank: u64,
    /// Reordering planner to use
    pub strategy: ReorderStrategy,
}

impl RunConfig {
    /// Semi-sort pass around the given rank
    pub fn new(target_rank: u64) -> Self {
        Self {
            target_rank,
            strategy: ReorderStrategy::SemiSort,
        }
    }

    /// Override the reordering strategy
    pub fn with_strategy(mut self, strategy: ReorderStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// What one maintenance pass did
///
/// `residual_*` fields count work the post-submission re-check still found;
/// any nonzero value is an anomaly worth alerting on, since a pass is
/// expected (but not guaranteed) to converge in one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Strategy the pass ran with
    pub strategy: ReorderStrategy,
    /// The entry designated as the rank cutoff
    pub pivot: EntryId,
    /// The pivot's true weight
    pub pivot_weight: Weight,
    /// Migration instructions submitted
    pub rebags_submitted: usize,
    /// Executor outcome of the rebag batch, if one was submitted
    pub rebag_outcome: Option<BatchOutcome>,
    /// Entries still outside their bag range after the correction pass
    pub residual_misplaced: usize,
    /// Reordering instructions submitted
    pub moves_submitted: usize,
    /// Executor outcome of the move batch, if one was submitted
    pub move_outcome: Option<BatchOutcome>,
    /// Reordering instructions the re-check would still emit
    pub residual_moves: usize,
}

/// Run one maintenance pass against a snapshot provider and an executor
///
/// # Errors
///
/// Any engine error is terminal for the pass; see
/// [`Error`](bagtender_core::Error) for the kinds.
pub async fn run_once<P, S>(provider: &P, sink: &S, config: &RunConfig) -> Result<RunReport>
where
    P: ListProvider + ?Sized,
    S: InstructionSink + ?Sized,
{
    let mut directory = BagDirectory::load(provider).await?;
    let mut location = locate(provider, &directory, config.target_rank).await?;
    info!(
        target: "bagtender::run",
        rank = config.target_rank,
        ceiling = %location.bag.ceiling,
        local_index = location.local_index,
        entry = %location.entry.id,
        "maintenance pass started"
    );

    let view = walk(provider, &location.bag).await?;
    let (mut view, misplaced) = detect_misplaced(view, directory.thresholds())?;

    let rebags_submitted = misplaced.len();
    let mut rebag_outcome = None;
    let mut residual_misplaced = 0;

    if misplaced.is_empty() {
        info!(target: "bagtender::rebag", "no entries need rebagging");
    } else {
        let batch = rebag_instructions(&misplaced);
        info!(target: "bagtender::rebag", count = batch.len(), "submitting rebag batch");
        let outcome = sink.submit_rebags(&batch).await?;
        log_batch_outcome("rebag", &outcome);
        rebag_outcome = Some(outcome);

        // Migration may have moved the rank into another bag; start over
        // from a fresh snapshot.
        directory = BagDirectory::load(provider).await?;
        location = locate(provider, &directory, config.target_rank).await?;
        let fresh = walk(provider, &location.bag).await?;
        let (fresh, still_misplaced) = detect_misplaced(fresh, directory.thresholds())?;
        residual_misplaced = still_misplaced.len();
        if residual_misplaced > 0 {
            warn!(
                target: "bagtender::rebag",
                count = residual_misplaced,
                "entries still outside their bag range after one correction pass"
            );
        }
        view = fresh;
    }

    let (instructions, pivot) = match config.strategy {
        ReorderStrategy::SemiSort => {
            let plan = plan_semi_sort(&view, location.local_index)?;
            (plan.instructions, plan.pivot)
        }
        ReorderStrategy::FullSort => {
            let plan = plan_full_sort(&view)?;
            (plan.instructions, location.entry.clone())
        }
    };

    let moves_submitted = instructions.len();
    let mut move_outcome = None;
    let mut residual_moves = 0;

    if instructions.is_empty() {
        info!(target: "bagtender::reorder", "no entries need repositioning");
    } else {
        info!(
            target: "bagtender::reorder",
            count = instructions.len(),
            pivot = %pivot.id,
            "submitting move batch"
        );
        let outcome = sink.submit_moves(&instructions).await?;
        log_batch_outcome("reorder", &outcome);
        move_outcome = Some(outcome);

        residual_moves = recheck_reordering(provider, config, &pivot, location.local_index).await?;
        if residual_moves > 0 {
            warn!(
                target: "bagtender::reorder",
                count = residual_moves,
                "entries still need repositioning after one correction pass"
            );
        }
    }

    info!(
        target: "bagtender::run",
        rebags = rebags_submitted,
        moves = moves_submitted,
        "maintenance pass finished"
    );
    Ok(RunReport {
        strategy: config.strategy,
        pivot: pivot.id,
        pivot_weight: pivot.true_weight,
        rebags_submitted,
        rebag_outcome,
        residual_misplaced,
        moves_submitted,
        move_outcome,
        residual_moves,
    })
}

/// Re-walk the pivot's canonical bag after the executor applied the moves
/// and count the instructions a fresh plan would still emit
///
/// Reordering can change the bag's head, so the bag is re-resolved from the
/// pivot's true weight instead of reusing the stale snapshot.
async fn recheck_reordering<P: ListProvider + ?Sized>(
    provider: &P,
    config: &RunConfig,
    pivot: &ReconciledEntry,
    local_index: usize,
) -> Result<usize> {
    let directory = BagDirectory::load(provider).await?;
    let Some(bag) = directory.bag_for_weight(pivot.true_weight)? else {
        warn!(
            target: "bagtender::reorder",
            pivot = %pivot.id,
            "pivot's canonical bag is empty after repositioning, skipping re-check"
        );
        return Ok(0);
    };

    let adjusted = walk(provider, bag).await?;
    let residual = match config.strategy {
        ReorderStrategy::SemiSort => plan_semi_sort(&adjusted, local_index)?.instructions.len(),
        ReorderStrategy::FullSort => plan_full_sort(&adjusted)?.instructions.len(),
    };
    Ok(residual)
}

fn log_batch_outcome(stage: &str, outcome: &BatchOutcome) {
    match outcome {
        BatchOutcome::Completed => {
            info!(target: "bagtender::run", stage, "batch completed");
        }
        BatchOutcome::CompletedWithErrors { failed } => {
            warn!(
                target: "bagtender::run",
                stage,
                failed = ?failed,
                "batch completed with failed calls"
            );
        }
        BatchOutcome::Interrupted { at } => {
            warn!(target: "bagtender::run", stage, at, "batch interrupted");
        }
    }
}
