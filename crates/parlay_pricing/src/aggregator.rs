//! Parlay probability aggregation.
//!
//! A parlay hits only if every leg hits. Legs are grouped by event, each
//! group's joint probability is estimated independently, and the parlay
//! probability is the product over groups.
//!
//! # Architecture
//!
//! ```text
//! ParlayProbabilityAggregator<P: CorrelationProvider>
//! ├── group_legs()              (event partition, canonical order)
//! ├── derive_seed()             (per group, unless overridden)
//! ├── SamplingPolicy            (samples per group size and profile)
//! ├── GaussianCopulaSampler     (joint probability per group)
//! └── combine()                 (sorted product, clamped)
//! ```

use parlay_core::types::{clamp_probability, Leg, PricingError, RiskProfile};
use rayon::prelude::*;
use tracing::debug;

use crate::cancel::CancellationToken;
use crate::config::EngineConfig;
use crate::copula::{EstimateMethod, GaussianCopulaSampler, GroupEstimate};
use crate::grouping::{group_legs, EventGroup};
use crate::provider::{CorrelationProvider, Independent};
use crate::seed::derive_seed;

/// Estimate for one event group within a parlay.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupBreakdown {
    /// Group key.
    pub key: String,
    /// Number of legs in the group.
    pub legs: usize,
    /// Probability estimate and method.
    pub estimate: GroupEstimate,
}

/// Result of evaluating a parlay.
#[derive(Clone, Debug, PartialEq)]
pub struct ParlayProbabilityResult {
    /// Probability that every leg hits, in `[0, 1]`.
    pub probability: f64,
    /// Per-group estimates in group key order.
    pub groups: Vec<GroupBreakdown>,
}

impl ParlayProbabilityResult {
    fn empty() -> Self {
        Self {
            probability: 0.0,
            groups: Vec::new(),
        }
    }

    /// Number of groups estimated by simulation.
    pub fn simulated_groups(&self) -> usize {
        self.groups
            .iter()
            .filter(|g| matches!(g.estimate.method, EstimateMethod::Simulated(_)))
            .count()
    }
}

/// Estimates the probability that every leg of a parlay hits.
///
/// # Examples
///
/// ```rust
/// use parlay_core::types::{Leg, RiskProfile};
/// use parlay_pricing::aggregator::ParlayProbabilityAggregator;
/// use parlay_pricing::provider::PairwiseCorrelation;
///
/// let legs = vec![
///     Leg::new("G1", "ml", "moneyline", "home", 0.6),
///     Leg::new("G1", "tot", "total", "over", 0.5),
///     Leg::new("G2", "ml", "moneyline", "away", 0.7),
/// ];
///
/// let aggregator = ParlayProbabilityAggregator::new(PairwiseCorrelation::new(0.8));
/// let p = aggregator.calculate(&legs, RiskProfile::Balanced, None);
///
/// // Positive correlation within G1 lifts the joint probability
/// assert!(p > 0.6 * 0.5 * 0.7);
/// assert!(p <= 1.0);
/// ```
#[derive(Clone, Debug)]
pub struct ParlayProbabilityAggregator<P = Independent> {
    provider: P,
    config: EngineConfig,
    sampler: GaussianCopulaSampler,
}

impl Default for ParlayProbabilityAggregator<Independent> {
    fn default() -> Self {
        Self::new(Independent)
    }
}

impl<P: CorrelationProvider> ParlayProbabilityAggregator<P> {
    /// Creates an aggregator with the default configuration.
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, EngineConfig::default())
    }

    /// Creates an aggregator with an explicit configuration.
    pub fn with_config(provider: P, config: EngineConfig) -> Self {
        let sampler = GaussianCopulaSampler::new(&config);
        Self {
            provider,
            config,
            sampler,
        }
    }

    /// Returns the engine configuration.
    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the correlation provider.
    #[inline]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Probability that every leg hits.
    ///
    /// # Arguments
    ///
    /// * `legs` - Parlay legs in any order
    /// * `profile` - Risk profile selecting the sample budget
    /// * `seed` - Explicit seed applied to every group, `None` to derive
    ///   one per group
    ///
    /// # Returns
    ///
    /// A value in `[0, 1]`; `0.0` for an empty parlay.
    pub fn calculate(&self, legs: &[Leg], profile: RiskProfile, seed: Option<u32>) -> f64 {
        self.evaluate(legs, profile, seed).probability
    }

    /// Like [`calculate`](Self::calculate), also returning per-group estimates.
    pub fn evaluate(
        &self,
        legs: &[Leg],
        profile: RiskProfile,
        seed: Option<u32>,
    ) -> ParlayProbabilityResult {
        if legs.is_empty() {
            return ParlayProbabilityResult::empty();
        }

        let groups: Vec<GroupBreakdown> = group_legs(legs)
            .iter()
            .map(|group| self.breakdown(group, profile, seed))
            .collect();

        ParlayProbabilityResult {
            probability: combine(&groups),
            groups,
        }
    }

    /// Like [`calculate`](Self::calculate), checking `token` before each group.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::Cancelled` if the token is set before all
    /// groups have been estimated.
    pub fn calculate_with_cancel(
        &self,
        legs: &[Leg],
        profile: RiskProfile,
        seed: Option<u32>,
        token: &CancellationToken,
    ) -> Result<f64, PricingError> {
        if legs.is_empty() {
            return Ok(0.0);
        }

        let groups = group_legs(legs);
        let total_groups = groups.len();
        let mut estimates = Vec::with_capacity(total_groups);

        for (completed_groups, group) in groups.iter().enumerate() {
            if token.is_cancelled() {
                return Err(PricingError::Cancelled {
                    completed_groups,
                    total_groups,
                });
            }
            estimates.push(self.breakdown(group, profile, seed));
        }

        Ok(combine(&estimates))
    }

    /// Estimates the joint probability of one event group.
    pub fn estimate_group(
        &self,
        group: &EventGroup,
        profile: RiskProfile,
        seed: Option<u32>,
    ) -> GroupEstimate {
        let marginals = group.marginals();
        if group.len() < 2 {
            return self.sampler.estimate(&marginals, None, 0, 0);
        }

        let seed = seed.unwrap_or_else(|| derive_seed(profile, &group.key, &group.legs));
        let samples = self.config.sampling.samples_for(profile, group.len());
        let matrix = self.provider.correlation_matrix(&group.legs);

        self.sampler.estimate(&marginals, matrix.as_deref(), samples, seed)
    }

    fn breakdown(
        &self,
        group: &EventGroup,
        profile: RiskProfile,
        seed: Option<u32>,
    ) -> GroupBreakdown {
        let estimate = self.estimate_group(group, profile, seed);
        debug!(
            group = %group.key,
            legs = group.len(),
            samples = estimate.run().map(|r| r.samples),
            seed = estimate.run().map(|r| r.seed),
            probability = estimate.probability,
            method = ?estimate.method,
            "group estimated"
        );
        GroupBreakdown {
            key: group.key.clone(),
            legs: group.len(),
            estimate,
        }
    }
}

impl<P: CorrelationProvider + Sync> ParlayProbabilityAggregator<P> {
    /// Prices independent parlays in parallel.
    ///
    /// Results are in input order and identical to calling
    /// [`calculate`](Self::calculate) on each parlay.
    pub fn calculate_batch(
        &self,
        parlays: &[Vec<Leg>],
        profile: RiskProfile,
        seed: Option<u32>,
    ) -> Vec<f64> {
        parlays
            .par_iter()
            .map(|legs| self.calculate(legs, profile, seed))
            .collect()
    }
}

/// Probability that every leg hits, using `provider` and default settings.
///
/// # Examples
///
/// ```rust
/// use parlay_core::types::{Leg, RiskProfile};
/// use parlay_pricing::calculate_parlay_probability;
/// use parlay_pricing::provider::Independent;
///
/// let legs = vec![
///     Leg::new("G1", "ml", "moneyline", "home", 0.5),
///     Leg::new("G2", "ml", "moneyline", "home", 0.4),
/// ];
///
/// let p = calculate_parlay_probability(&legs, Independent, RiskProfile::Balanced, None);
/// assert_eq!(p, 0.2);
/// ```
pub fn calculate_parlay_probability<P: CorrelationProvider>(
    legs: &[Leg],
    provider: P,
    profile: RiskProfile,
    seed: Option<u32>,
) -> f64 {
    ParlayProbabilityAggregator::new(provider).calculate(legs, profile, seed)
}

/// Product of group probabilities taken in ascending order.
fn combine(groups: &[GroupBreakdown]) -> f64 {
    let mut probabilities: Vec<f64> = groups.iter().map(|g| g.estimate.probability).collect();
    probabilities.sort_by(f64::total_cmp);
    clamp_probability(probabilities.into_iter().product())
}
