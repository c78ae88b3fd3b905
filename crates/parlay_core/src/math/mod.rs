//! Numeric building blocks for the copula engine.
//!
//! This module provides:
//! - `distributions`: Standard normal CDF and quantile functions
//! - `correlation`: Correlation matrix sanitisation and Cholesky factorisation
//!   with jitter retries

pub mod correlation;
pub mod distributions;

pub use correlation::{
    sanitize_rows, CholeskyFactor, CorrelationError, CorrelationMatrix, JitterOutcome,
    JitterSchedule,
};
pub use distributions::{inverse_norm_cdf, norm_cdf};
