//! End-to-end maintenance passes: rebag, reorder, verify, converge

use crate::common::MockChain;
use bagtender::{run_once, BatchOutcome, Error, ReorderStrategy, RunConfig};

/// Three bags, two drifted weights: "v2" grew out of its bag, "v4" shrank
/// out of it. Global rank 5 lands in the middle bag.
fn drifted_chain() -> MockChain {
    let chain = MockChain::new(vec![1_000, 10_000, 100_000]);
    chain
        .push_entry(100_000, "w1", 50_000, 50_000)
        .push_entry(100_000, "w2", 20_000, 20_000)
        .push_entry(10_000, "v1", 9_000, 9_000)
        .push_entry(10_000, "v2", 5_000, 12_000)
        .push_entry(10_000, "v3", 4_000, 4_000)
        .push_entry(10_000, "v4", 3_000, 800)
        .push_entry(10_000, "v5", 6_000, 6_500)
        .push_entry(1_000, "x1", 500, 500);
    chain
}

#[tokio::test]
async fn test_full_pass_rebags_then_repositions() {
    let chain = drifted_chain();
    let config = RunConfig::new(5);

    let report = run_once(&chain, &chain, &config).await.unwrap();

    // Both drifted entries were migrated...
    assert_eq!(report.rebags_submitted, 2);
    assert_eq!(report.rebag_outcome, Some(BatchOutcome::Completed));
    assert_eq!(report.residual_misplaced, 0);
    assert_eq!(chain.ceiling_of("v2"), 100_000);
    assert_eq!(chain.ceiling_of("v4"), 1_000);

    // ...after which rank 5 falls on "v5" (weight 6 500), which needs one
    // move to seat ahead of the lighter "v3".
    assert_eq!(report.pivot.as_str(), "v5");
    assert_eq!(report.pivot_weight, 6_500);
    assert_eq!(report.moves_submitted, 1);
    assert_eq!(report.move_outcome, Some(BatchOutcome::Completed));
    assert_eq!(report.residual_moves, 0);
    assert_eq!(chain.order_of(10_000), vec!["v1", "v5", "v3"]);
}

#[tokio::test]
async fn test_second_pass_finds_nothing_to_do() {
    let chain = drifted_chain();
    let config = RunConfig::new(5);

    run_once(&chain, &chain, &config).await.unwrap();
    let report = run_once(&chain, &chain, &config).await.unwrap();

    assert_eq!(report.rebags_submitted, 0);
    assert_eq!(report.rebag_outcome, None);
    assert_eq!(report.moves_submitted, 0);
    assert_eq!(report.move_outcome, None);
    assert_eq!(report.residual_misplaced, 0);
    assert_eq!(report.residual_moves, 0);
}

#[tokio::test]
async fn test_full_sort_strategy_sorts_the_whole_bag() {
    let chain = MockChain::new(vec![1_000, 10_000, 100_000]);
    chain
        .push_entry(10_000, "a", 3_000, 3_000)
        .push_entry(10_000, "b", 9_000, 9_000)
        .push_entry(10_000, "c", 5_000, 5_000);
    let config = RunConfig::new(2).with_strategy(ReorderStrategy::FullSort);

    let report = run_once(&chain, &chain, &config).await.unwrap();

    assert_eq!(report.moves_submitted, 2);
    assert_eq!(report.residual_moves, 0);
    assert_eq!(chain.order_of(10_000), vec!["b", "c", "a"]);
}

#[tokio::test]
async fn test_pass_fails_when_rank_exceeds_population() {
    let chain = MockChain::new(vec![1_000]);
    chain.push_entry(1_000, "only", 500, 500);

    let err = run_once(&chain, &chain, &RunConfig::new(22_500))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RankExceedsPopulation { .. }));
}

#[tokio::test]
async fn test_report_serializes_for_the_log_pipeline() {
    let chain = drifted_chain();
    let report = run_once(&chain, &chain, &RunConfig::new(5)).await.unwrap();

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"pivot\":\"v5\""));
    assert!(json.contains("\"rebags_submitted\":2"));
}
