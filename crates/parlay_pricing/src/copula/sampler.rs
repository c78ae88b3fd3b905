//! Copula sampler for one event group.

use parlay_core::math::correlation::{
    sanitize_rows_with_bound, CholeskyFactor, CorrelationError, JitterSchedule,
};
use parlay_core::math::distributions::inverse_norm_cdf;
use parlay_core::types::clamp_probability;
use tracing::{debug, trace, warn};

use super::{EstimateMethod, FallbackReason, GroupEstimate, SimulationRun};
use crate::config::EngineConfig;
use crate::rng::SimulationRng;

/// Gaussian copula estimator of `P(all legs hit)` for a single group.
///
/// The sampler holds only numeric settings; each call builds its own
/// generator from the supplied seed.
///
/// # Examples
///
/// ```rust
/// use parlay_pricing::config::EngineConfig;
/// use parlay_pricing::copula::{EstimateMethod, GaussianCopulaSampler};
///
/// let sampler = GaussianCopulaSampler::new(&EngineConfig::default());
/// let corr = vec![vec![1.0, 0.8], vec![0.8, 1.0]];
///
/// let estimate = sampler.estimate(&[0.6, 0.5], Some(&corr), 20_000, 7);
/// assert!(estimate.probability > 0.30);
/// assert!(matches!(estimate.method, EstimateMethod::Simulated(_)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaussianCopulaSampler {
    probability_epsilon: f64,
    correlation_bound: f64,
    jitter: JitterSchedule,
}

impl Default for GaussianCopulaSampler {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl GaussianCopulaSampler {
    /// Creates a sampler from the engine configuration.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            probability_epsilon: config.probability_epsilon,
            correlation_bound: config.correlation_bound,
            jitter: config.jitter_schedule(),
        }
    }

    /// Converts marginals into copula thresholds.
    ///
    /// Each probability is clamped to `[eps, 1 - eps]` first so every
    /// threshold is finite.
    pub fn thresholds(&self, marginals: &[f64]) -> Vec<f64> {
        let eps = self.probability_epsilon;
        marginals
            .iter()
            .map(|&p| inverse_norm_cdf(clamp_probability(p).clamp(eps, 1.0 - eps)))
            .collect()
    }

    /// Estimates the joint hit probability of a group.
    ///
    /// # Arguments
    ///
    /// * `marginals` - Leg probabilities in canonical order
    /// * `correlation` - Provider matrix rows, `None` for no data
    /// * `samples` - Number of correlated draws
    /// * `seed` - Generator seed for this group
    ///
    /// # Returns
    ///
    /// A probability in `[0, 1]` and the method that produced it. Missing
    /// or malformed matrices, failed factorisation and zero observed hits
    /// all return the product of marginals.
    pub fn estimate(
        &self,
        marginals: &[f64],
        correlation: Option<&[Vec<f64>]>,
        samples: usize,
        seed: u32,
    ) -> GroupEstimate {
        let marginals: Vec<f64> = marginals.iter().copied().map(clamp_probability).collect();

        if let [single] = marginals.as_slice() {
            return GroupEstimate {
                probability: *single,
                method: EstimateMethod::Marginal,
            };
        }

        let independence = clamp_probability(marginals.iter().product());
        let fallback = |reason| GroupEstimate {
            probability: independence,
            method: EstimateMethod::Independence(reason),
        };

        if marginals.iter().any(|&p| p <= 0.0) {
            return GroupEstimate {
                probability: 0.0,
                method: EstimateMethod::ZeroMarginal,
            };
        }
        if marginals.is_empty() {
            return fallback(FallbackReason::NoCorrelationData);
        }

        let n = marginals.len();
        let thresholds = self.thresholds(&marginals);

        let Some(rows) = correlation else {
            return fallback(FallbackReason::NoCorrelationData);
        };
        let Some(matrix) = sanitize_rows_with_bound(rows, n, self.correlation_bound) else {
            warn!(
                group_size = n,
                rows = rows.len(),
                "correlation matrix shape does not match group, assuming independence"
            );
            return fallback(FallbackReason::MalformedMatrix);
        };

        let (factor, outcome) = match matrix.cholesky_with_jitter(&self.jitter) {
            Ok(result) => result,
            Err(err) => {
                warn!(group_size = n, error = %err, "falling back to independence");
                let attempts = match err {
                    CorrelationError::FactorisationFailed { attempts, .. } => attempts,
                    _ => self.jitter.max_attempts.max(1),
                };
                return fallback(FallbackReason::FactorisationFailed { attempts });
            }
        };
        if outcome.attempts > 1 {
            trace!(
                attempts = outcome.attempts,
                jitter = outcome.total_jitter,
                "correlation matrix needed diagonal jitter"
            );
        }

        let hits = count_joint_hits(&factor, &thresholds, samples, seed);
        let run = SimulationRun {
            seed,
            samples,
            hits,
            factorisation_attempts: outcome.attempts,
        };

        if hits == 0 {
            debug!(seed, samples, "no joint hits observed, using independence product");
            return fallback(FallbackReason::ZeroHits(run));
        }

        GroupEstimate {
            probability: clamp_probability(run.hit_rate()),
            method: EstimateMethod::Simulated(run),
        }
    }
}

/// Counts draws where every correlated coordinate is at or below its threshold.
fn count_joint_hits(
    factor: &CholeskyFactor<f64>,
    thresholds: &[f64],
    samples: usize,
    seed: u32,
) -> usize {
    let n = factor.dim();
    let mut rng = SimulationRng::for_group(seed);
    let mut z = vec![0.0; n];
    let mut w = vec![0.0; n];
    let mut hits = 0;

    for _ in 0..samples {
        rng.correlated_draw(factor, &mut z, &mut w);
        if w.iter().zip(thresholds).all(|(x, t)| x <= t) {
            hits += 1;
        }
    }

    hits
}
