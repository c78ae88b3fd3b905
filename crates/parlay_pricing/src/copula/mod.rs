//! Gaussian copula estimation of joint hit probabilities.
//!
//! For a group of legs on one event, each leg hits when its latent standard
//! normal falls below `Φ⁻¹(p)`. Latent normals are correlated through the
//! Cholesky factor of the group's correlation matrix, and the joint "all
//! hit" probability is the fraction of draws where every leg hits.
//!
//! # Architecture
//!
//! ```text
//! GaussianCopulaSampler
//! ├── thresholds        (Φ⁻¹ of clamped marginals)
//! ├── sanitize_rows()   (untrusted provider matrix → valid correlation)
//! ├── cholesky_with_jitter()
//! ├── SimulationRng     (seeded per group)
//! └── hit counting      (all coordinates ≤ threshold)
//! ```
//!
//! Every failure path degrades to the independence product; the sampler
//! never returns an error.

mod sampler;

pub use sampler::GaussianCopulaSampler;

/// Ephemeral state of one group simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationRun {
    /// Seed the group generator was built from.
    pub seed: u32,
    /// Number of correlated draws.
    pub samples: usize,
    /// Draws in which every leg hit.
    pub hits: usize,
    /// Cholesky attempts needed, including the successful one.
    pub factorisation_attempts: usize,
}

impl SimulationRun {
    /// Empirical joint hit rate.
    pub fn hit_rate(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.hits as f64 / self.samples as f64
        }
    }
}

/// Why a group fell back to the independence product.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallbackReason {
    /// The provider had no matrix for the group.
    NoCorrelationData,
    /// The provider matrix did not match the group size.
    MalformedMatrix,
    /// The matrix stayed non positive definite through every jitter attempt.
    FactorisationFailed {
        /// Attempts made
        attempts: usize,
    },
    /// The simulation observed no joint hits.
    ZeroHits(SimulationRun),
}

/// How a group probability was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EstimateMethod {
    /// Single-leg group: the marginal itself.
    Marginal,
    /// Some marginal was zero, so the group cannot hit.
    ZeroMarginal,
    /// Product of marginals.
    Independence(FallbackReason),
    /// Copula simulation.
    Simulated(SimulationRun),
}

/// Probability estimate for one event group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupEstimate {
    /// Joint hit probability in `[0, 1]`.
    pub probability: f64,
    /// How the probability was obtained.
    pub method: EstimateMethod,
}

impl GroupEstimate {
    /// Returns the simulation run if the estimate came from (or fell back
    /// after) a simulation.
    pub fn run(&self) -> Option<SimulationRun> {
        match self.method {
            EstimateMethod::Simulated(run)
            | EstimateMethod::Independence(FallbackReason::ZeroHits(run)) => Some(run),
            _ => None,
        }
    }

    /// Returns `true` if the estimate is the independence product.
    pub fn is_fallback(&self) -> bool {
        matches!(self.method, EstimateMethod::Independence(_))
    }
}
