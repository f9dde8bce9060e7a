//! Property-Based Tests for the Detection Engine
//!
//! Properties:
//! - The indexed engine agrees with a naive linear-scan reference classifier
//!   on every (logdata, constraints) pair.
//! - Classification is invariant under permutation of the constraint batch.
//! - A grouped constraint is equivalent to its Cartesian expansion.
//! - Duplicate insertion does not change results.
//! - Output length always equals input length.

use accord_engine::{detect, DetectionEngine};
use accord_test_utils::{
    arb_activity_record, arb_constraint_batch, arb_constraint_record, reference_classify,
    EngineConfig, RawConstraintRecord,
};
use proptest::prelude::*;

/// Deterministic Fisher-Yates driven by a seed, so each case exercises a
/// different permutation.
fn shuffled(records: &[RawConstraintRecord], mut seed: u64) -> Vec<RawConstraintRecord> {
    let mut shuffled: Vec<_> = records.to_vec();
    for i in (1..shuffled.len()).rev() {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let j = (seed >> 33) as usize % (i + 1);
        shuffled.swap(i, j);
    }
    shuffled
}

proptest! {
    #[test]
    fn engine_agrees_with_reference_classifier(
        logdata in proptest::collection::vec(arb_activity_record(), 0..24),
        constraints in arb_constraint_batch(12),
    ) {
        prop_assert_eq!(
            detect(&logdata, &constraints),
            reference_classify(&logdata, &constraints)
        );
    }

    #[test]
    fn classification_is_permutation_invariant(
        logdata in proptest::collection::vec(arb_activity_record(), 0..16),
        constraints in arb_constraint_batch(10),
        seed in any::<u64>(),
    ) {
        prop_assert_eq!(
            detect(&logdata, &constraints),
            detect(&logdata, &shuffled(&constraints, seed))
        );
    }

    #[test]
    fn grouped_constraint_equals_cartesian_expansion(
        logdata in proptest::collection::vec(arb_activity_record(), 0..16),
        grouped in arb_constraint_record(),
    ) {
        let singles: Vec<RawConstraintRecord> = grouped
            .document_ids
            .iter()
            .flat_map(|doc| {
                let grouped = grouped.clone();
                grouped.actor_ids.clone().into_iter().map(move |actor| {
                    let mut single = grouped.clone();
                    single.document_ids = vec![doc.clone()];
                    single.actor_ids = vec![actor.clone()];
                    single
                })
            })
            .collect();

        prop_assert_eq!(
            detect(&logdata, std::slice::from_ref(&grouped)),
            detect(&logdata, &singles)
        );
    }

    #[test]
    fn duplicate_insertion_is_idempotent(
        logdata in proptest::collection::vec(arb_activity_record(), 0..16),
        constraints in arb_constraint_batch(8),
    ) {
        let doubled: Vec<RawConstraintRecord> = constraints
            .iter()
            .chain(constraints.iter())
            .cloned()
            .collect();

        prop_assert_eq!(detect(&logdata, &constraints), detect(&logdata, &doubled));
    }

    #[test]
    fn one_flag_per_record(
        logdata in proptest::collection::vec(arb_activity_record(), 0..24),
        constraints in arb_constraint_batch(8),
    ) {
        prop_assert_eq!(detect(&logdata, &constraints).len(), logdata.len());
    }

    #[test]
    fn build_order_never_affects_the_report_tally(
        constraints in arb_constraint_batch(10),
        seed in any::<u64>(),
    ) {
        let forward = DetectionEngine::build(&constraints, EngineConfig::lenient()).unwrap();
        let permuted =
            DetectionEngine::build(&shuffled(&constraints, seed), EngineConfig::lenient()).unwrap();

        prop_assert_eq!(
            forward.build_report().accepted,
            permuted.build_report().accepted
        );
        prop_assert_eq!(
            forward.build_report().dropped.len(),
            permuted.build_report().dropped.len()
        );
    }
}
