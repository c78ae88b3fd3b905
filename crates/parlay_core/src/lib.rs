//! # parlay_core: Foundation Layer for Parlay Probability Estimation
//!
//! ## Layer 1 (Foundation) Role
//!
//! parlay_core is the bottom layer of the parlay engine, providing:
//! - The wager leg data model (`types::leg`)
//! - Marginal probability extraction and clamping (`types::probability`)
//! - Risk profile labels (`types::profile`)
//! - Error types: `PricingError`, `ProfileError` (`types::error`)
//! - Standard normal distribution functions (`math::distributions`)
//! - Correlation matrix sanitisation and Cholesky factorisation (`math::correlation`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other parlay_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - serde / serde_json: Leg records arrive as loosely typed JSON
//! - thiserror: Structured error types
//!
//! ## Usage Examples
//!
//! ```rust
//! use parlay_core::math::correlation::sanitize_rows;
//! use parlay_core::types::{Leg, RiskProfile};
//!
//! let leg = Leg::new("G1", "ml-home", "moneyline", "home", 0.6);
//! assert_eq!(leg.probability, 0.6);
//!
//! let profile: RiskProfile = "degen".parse().unwrap();
//! assert_eq!(profile, RiskProfile::Degen);
//!
//! // An asymmetric, out-of-range provider matrix is forced into shape
//! let matrix = sanitize_rows(&[vec![1.0, 1.4], vec![0.8, 1.0]], 2).unwrap();
//! assert_eq!(matrix.get(0, 1), 0.99);
//! assert_eq!(matrix.get(1, 0), 0.99);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;

/// Generic floating-point trait for numeric computations.
///
/// Re-exported so downstream crates can write `T: Float` without a direct
/// num-traits dependency.
pub use num_traits::Float;
