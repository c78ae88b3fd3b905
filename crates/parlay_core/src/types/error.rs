//! Error types for structured error handling.
//!
//! The probability computation itself is total: malformed inputs degrade
//! to conservative estimates rather than errors. The types here cover the
//! edges of the engine only:
//! - `PricingError`: Caller-visible failures (cancellation, rejected input)
//! - `ProfileError`: Unknown risk profile labels

use thiserror::Error;

/// Categorised pricing errors.
///
/// # Variants
/// - `InvalidInput`: Input rejected by a strict entry point
/// - `Cancelled`: The caller cancelled the computation between groups
///
/// # Examples
/// ```
/// use parlay_core::types::PricingError;
///
/// let err = PricingError::InvalidInput("empty parlay".to_string());
/// assert_eq!(format!("{}", err), "Invalid input: empty parlay");
///
/// let err = PricingError::Cancelled { completed_groups: 2, total_groups: 5 };
/// assert!(err.to_string().contains("2 of 5"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Invalid input data or parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Computation was cancelled before every group was estimated.
    #[error("Cancelled after {completed_groups} of {total_groups} groups")]
    Cancelled {
        /// Number of groups estimated before cancellation was observed
        completed_groups: usize,
        /// Total number of groups in the parlay
        total_groups: usize,
    },
}

/// Risk profile parsing errors.
///
/// # Examples
/// ```
/// use parlay_core::types::ProfileError;
///
/// let err = ProfileError::Unknown("yolo".to_string());
/// assert!(err.to_string().contains("yolo"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// Label does not name a known risk profile.
    #[error("Unknown risk profile: {0}. Must be one of: conservative, balanced, degen")]
    Unknown(String),
}
