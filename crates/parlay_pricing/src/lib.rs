//! # parlay_pricing: Correlated Parlay Probability Engine
//!
//! ## Layer 3 (Engine) Role
//!
//! parlay_pricing estimates the probability that every leg of a multi-leg
//! wager hits. Legs on the same event are simulated jointly with a Gaussian
//! copula; legs on different events are independent.
//!
//! - Event grouping with canonical, permutation-invariant ordering (`grouping`)
//! - Deterministic SHA-256 seed derivation per group (`seed`)
//! - Seeded normal variate generation (`rng`)
//! - Gaussian copula sampling with jitter and independence fallbacks (`copula`)
//! - Parlay aggregation, cancellation and rayon batch pricing (`aggregator`, `cancel`)
//! - Pluggable correlation sources (`provider`)
//! - Engine configuration from TOML and environment (`config`)
//!
//! ## Usage Examples
//!
//! ```rust
//! use parlay_core::types::{Leg, RiskProfile};
//! use parlay_pricing::aggregator::ParlayProbabilityAggregator;
//! use parlay_pricing::provider::PairwiseCorrelation;
//!
//! let legs = vec![
//!     Leg::new("G1", "ml", "moneyline", "home", 0.6),
//!     Leg::new("G1", "tot", "total", "over", 0.5),
//! ];
//!
//! let aggregator = ParlayProbabilityAggregator::new(PairwiseCorrelation::new(0.0));
//! let result = aggregator.evaluate(&legs, RiskProfile::Conservative, None);
//!
//! assert!((result.probability - 0.30).abs() < 0.01);
//! assert_eq!(result.groups.len(), 1);
//! ```
//!
//! ## Logging
//!
//! The engine emits `tracing` events and never installs a subscriber.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod aggregator;
pub mod cancel;
pub mod config;
pub mod copula;
pub mod grouping;
pub mod provider;
pub mod rng;
pub mod seed;

pub use aggregator::{
    calculate_parlay_probability, GroupBreakdown, ParlayProbabilityAggregator,
    ParlayProbabilityResult,
};
pub use cancel::CancellationToken;
pub use config::{ConfigError, EngineConfig, SamplingPolicy};
pub use copula::{
    EstimateMethod, FallbackReason, GaussianCopulaSampler, GroupEstimate, SimulationRun,
};
pub use provider::{CorrelationProvider, Independent, PairwiseCorrelation};
