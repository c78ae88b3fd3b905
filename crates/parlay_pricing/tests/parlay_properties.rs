//! Integration tests for parlay probability estimation.
//!
//! Exercises the public engine surface end to end: grouping, seeding,
//! copula sampling and aggregation.

use approx::assert_abs_diff_eq;
use parlay_core::types::{Leg, PricingError, RiskProfile};
use parlay_pricing::{
    calculate_parlay_probability, CancellationToken, EngineConfig, EstimateMethod,
    FallbackReason, Independent, PairwiseCorrelation, ParlayProbabilityAggregator,
};
use proptest::prelude::*;
use serde_json::json;

fn leg(event: &str, market: &str, p: f64) -> Leg {
    Leg::new(event, market, "moneyline", "home", p)
}

/// Provider keyed on the group's event id.
fn per_event(rho_g1: f64, rho_g2: f64) -> impl Fn(&[Leg]) -> Option<Vec<Vec<f64>>> + Sync {
    move |legs: &[Leg]| -> Option<Vec<Vec<f64>>> {
        let rho = match legs.first().map(|l| l.event_id.as_str()) {
            Some("G1") => rho_g1,
            Some("G2") => rho_g2,
            _ => return None,
        };
        let n = legs.len();
        Some(
            (0..n)
                .map(|i| (0..n).map(|j| if i == j { 1.0 } else { rho }).collect())
                .collect(),
        )
    }
}

mod scenario {
    use super::*;

    #[test]
    fn test_uncorrelated_pair() {
        let aggregator = ParlayProbabilityAggregator::new(PairwiseCorrelation::new(0.0));
        let legs = vec![leg("G1", "ml", 0.6), leg("G1", "tot", 0.5)];
        let p = aggregator.calculate(&legs, RiskProfile::Conservative, None);
        assert_abs_diff_eq!(p, 0.30, epsilon = 0.01);
    }

    #[test]
    fn test_correlated_pair_exceeds_independence() {
        let aggregator = ParlayProbabilityAggregator::new(PairwiseCorrelation::new(0.8));
        let legs = vec![leg("G1", "ml", 0.6), leg("G1", "tot", 0.5)];
        let p = aggregator.calculate(&legs, RiskProfile::Conservative, None);
        assert!(p > 0.30);
    }

    #[test]
    fn test_two_independent_groups() {
        let aggregator = ParlayProbabilityAggregator::new(PairwiseCorrelation::new(0.0));
        let legs = vec![
            leg("G1", "ml", 0.6),
            leg("G1", "tot", 0.5),
            leg("G2", "ml", 0.7),
            leg("G2", "tot", 0.9),
        ];
        let p = aggregator.calculate(&legs, RiskProfile::Conservative, None);
        assert_abs_diff_eq!(p, 0.189, epsilon = 0.02);
    }
}

mod invariants {
    use super::*;

    #[test]
    fn test_singleton_is_exact() {
        let aggregator = ParlayProbabilityAggregator::new(PairwiseCorrelation::new(0.5));
        for &p in &[0.0, 0.123, 0.5, 0.999, 1.0] {
            let legs = vec![leg("G1", "ml", p)];
            assert_eq!(aggregator.calculate(&legs, RiskProfile::Balanced, None), p);
        }
    }

    #[test]
    fn test_absent_matrix_is_exact_product() {
        let legs = vec![leg("G1", "a", 0.6), leg("G1", "b", 0.5), leg("G1", "c", 0.8)];
        let p = calculate_parlay_probability(&legs, Independent, RiskProfile::Balanced, None);
        assert_abs_diff_eq!(p, 0.24, epsilon = 1e-15);
    }

    #[test]
    fn test_identity_matrix_approaches_product() {
        let legs = vec![leg("G1", "a", 0.6), leg("G1", "b", 0.5), leg("G1", "c", 0.8)];
        let p = calculate_parlay_probability(
            &legs,
            PairwiseCorrelation::new(0.0),
            RiskProfile::Conservative,
            None,
        );
        assert_abs_diff_eq!(p, 0.24, epsilon = 0.015);
    }

    #[test]
    fn test_zero_marginal_zeroes_everything() {
        let aggregator = ParlayProbabilityAggregator::new(PairwiseCorrelation::new(0.9));
        let legs = vec![
            leg("G1", "a", 0.9),
            leg("G1", "b", 0.0),
            leg("G2", "a", 0.8),
            leg("G2", "b", 0.7),
        ];
        let result = aggregator.evaluate(&legs, RiskProfile::Degen, None);
        assert_eq!(result.probability, 0.0);
        assert_eq!(result.groups[0].estimate.method, EstimateMethod::ZeroMarginal);
    }

    #[test]
    fn test_explicit_seed_is_deterministic() {
        let aggregator = ParlayProbabilityAggregator::new(PairwiseCorrelation::new(0.4));
        let legs = vec![leg("G1", "a", 0.55), leg("G1", "b", 0.45), leg("G1", "c", 0.65)];

        let a = aggregator.calculate(&legs, RiskProfile::Balanced, Some(7));
        let b = aggregator.calculate(&legs, RiskProfile::Balanced, Some(7));
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_grouping_isolation() {
        let legs = vec![
            leg("G1", "a", 0.6),
            leg("G1", "b", 0.5),
            leg("G2", "a", 0.7),
            leg("G2", "b", 0.4),
        ];
        let low = ParlayProbabilityAggregator::new(per_event(0.1, 0.0));
        let high = ParlayProbabilityAggregator::new(per_event(0.1, 0.9));

        let low = low.evaluate(&legs, RiskProfile::Balanced, None);
        let high = high.evaluate(&legs, RiskProfile::Balanced, None);

        assert_eq!(low.groups[0].key, "G1");
        assert_eq!(low.groups[0].estimate, high.groups[0].estimate);
        assert_ne!(low.groups[1].estimate, high.groups[1].estimate);
    }

    #[test]
    fn test_infeasible_matrix_falls_back() {
        let provider = |_: &[Leg]| -> Option<Vec<Vec<f64>>> {
            Some(vec![
                vec![1.0, 0.99, 0.99],
                vec![0.99, 1.0, -0.99],
                vec![0.99, -0.99, 1.0],
            ])
        };
        let aggregator = ParlayProbabilityAggregator::new(provider);
        let legs = vec![leg("G1", "a", 0.5), leg("G1", "b", 0.4), leg("G1", "c", 0.3)];
        let result = aggregator.evaluate(&legs, RiskProfile::Balanced, None);

        assert_abs_diff_eq!(result.probability, 0.06, epsilon = 1e-15);
        assert!(matches!(
            result.groups[0].estimate.method,
            EstimateMethod::Independence(FallbackReason::FactorisationFailed { .. })
        ));
    }

    #[test]
    fn test_custom_sample_budget() {
        let config = EngineConfig::builder()
            .base_samples(RiskProfile::Degen, 600)
            .pair_floor(500)
            .build()
            .unwrap();
        let aggregator =
            ParlayProbabilityAggregator::with_config(PairwiseCorrelation::new(0.2), config);
        let legs = vec![leg("G1", "a", 0.6), leg("G1", "b", 0.5)];

        let result = aggregator.evaluate(&legs, RiskProfile::Degen, None);
        let run = result.groups[0].estimate.run().unwrap();
        assert_eq!(run.samples, 500);
    }
}

mod records {
    use super::*;

    #[test]
    fn test_json_records_price_like_structs() {
        let records = [
            json!({"event_id": "G1", "market_id": "ml", "market_type": "moneyline",
                   "outcome": "home", "adjusted_probability": 0.6, "probability": 0.1}),
            json!({"event_id": "G1", "market_identifier": "tot", "market_type": "total",
                   "outcome": "over", "prob": "0.5"}),
            json!({"event_id": "G2", "market_type": "moneyline", "outcome": "away",
                   "probability": "garbage"}),
        ];
        let legs: Vec<Leg> = records.iter().map(Leg::from_record).collect();

        assert_eq!(legs[0].probability, 0.6);
        assert_eq!(legs[1].probability, 0.5);
        assert_eq!(legs[2].probability, 0.0);

        // The unparseable leg is scored as unwinnable, not skipped
        let p = calculate_parlay_probability(&legs, Independent, RiskProfile::Balanced, None);
        assert_eq!(p, 0.0);
    }

    #[test]
    fn test_strict_records_reject_non_objects() {
        let payload = json!([
            {"event_id": "G1", "market_id": "ml", "probability": 0.6},
            "not a leg",
        ]);
        let parsed: Result<Vec<Leg>, PricingError> = payload
            .as_array()
            .into_iter()
            .flatten()
            .map(Leg::try_from_record)
            .collect();
        assert!(matches!(parsed, Err(PricingError::InvalidInput(_))));
    }
}

mod batch {
    use super::*;

    #[test]
    fn test_batch_matches_sequential() {
        let aggregator = ParlayProbabilityAggregator::new(PairwiseCorrelation::new(0.3));
        let parlays: Vec<Vec<Leg>> = (0..8)
            .map(|i| {
                let p = 0.3 + 0.05 * i as f64;
                vec![leg("G1", "a", p), leg("G1", "b", 0.5), leg("G2", "a", 0.7)]
            })
            .collect();

        let batch = aggregator.calculate_batch(&parlays, RiskProfile::Degen, None);
        let sequential: Vec<f64> = parlays
            .iter()
            .map(|legs| aggregator.calculate(legs, RiskProfile::Degen, None))
            .collect();

        assert_eq!(batch, sequential);
    }

    #[test]
    fn test_batch_of_nothing() {
        let aggregator = ParlayProbabilityAggregator::new(Independent);
        assert!(aggregator
            .calculate_batch(&[], RiskProfile::Balanced, None)
            .is_empty());
        assert_eq!(
            aggregator.calculate_batch(&[Vec::new()], RiskProfile::Balanced, None),
            vec![0.0]
        );
    }

    #[test]
    fn test_cancellation_reports_progress() {
        let aggregator = ParlayProbabilityAggregator::new(PairwiseCorrelation::new(0.3));
        let legs = vec![leg("G1", "a", 0.6), leg("G1", "b", 0.5), leg("G2", "a", 0.5)];
        let token = CancellationToken::new();
        token.cancel();

        let result = aggregator.calculate_with_cancel(&legs, RiskProfile::Balanced, None, &token);
        assert!(matches!(
            result,
            Err(PricingError::Cancelled { completed_groups: 0, total_groups: 2 })
        ));
    }
}

fn arb_leg() -> impl Strategy<Value = Leg> {
    (
        prop::sample::select(vec!["G1", "G2", "G3", "", " "]),
        prop::sample::select(vec!["ml", "spread", "total", "props"]),
        prop::sample::select(vec!["home", "away", "over", "under"]),
        prop_oneof![Just(0.0), Just(1.0), 0.0..=1.0_f64, Just(f64::NAN)],
    )
        .prop_map(|(event, market, outcome, p)| Leg::new(event, market, market, outcome, p))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_probability_in_unit_interval(legs in prop::collection::vec(arb_leg(), 0..6)) {
        let aggregator = ParlayProbabilityAggregator::new(PairwiseCorrelation::new(0.6));
        let p = aggregator.calculate(&legs, RiskProfile::Degen, None);
        prop_assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn prop_order_invariant(
        legs in prop::collection::vec(arb_leg(), 1..6),
        rotation in 0usize..6,
    ) {
        let aggregator = ParlayProbabilityAggregator::new(PairwiseCorrelation::new(0.5));
        let mut permuted = legs.clone();
        permuted.rotate_left(rotation % legs.len());
        permuted.reverse();

        let a = aggregator.calculate(&legs, RiskProfile::Degen, None);
        let b = aggregator.calculate(&permuted, RiskProfile::Degen, None);
        prop_assert_eq!(a.to_bits(), b.to_bits());
    }
}
