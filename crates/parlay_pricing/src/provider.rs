//! Correlation matrix providers.
//!
//! How pairwise correlations between markets on one event are estimated is
//! outside this crate. A provider is any capability that, given a group's
//! legs in canonical order, returns an `n x n` matrix or nothing. Returned
//! matrices are untrusted and always pass through the sanitiser.

use parlay_core::types::Leg;

/// Source of correlation matrices for event groups.
///
/// # Examples
///
/// ```rust
/// use parlay_core::types::Leg;
/// use parlay_pricing::provider::CorrelationProvider;
///
/// // Any closure with the right shape is a provider
/// let provider = |legs: &[Leg]| -> Option<Vec<Vec<f64>>> {
///     (legs.len() == 2).then(|| vec![vec![1.0, 0.3], vec![0.3, 1.0]])
/// };
///
/// let legs = vec![Leg::new("G1", "a", "ml", "home", 0.5); 2];
/// assert!(provider.correlation_matrix(&legs).is_some());
/// ```
pub trait CorrelationProvider {
    /// Returns the correlation matrix for `legs`, or `None` to assume
    /// independence for the group.
    fn correlation_matrix(&self, legs: &[Leg]) -> Option<Vec<Vec<f64>>>;
}

impl<F> CorrelationProvider for F
where
    F: Fn(&[Leg]) -> Option<Vec<Vec<f64>>>,
{
    fn correlation_matrix(&self, legs: &[Leg]) -> Option<Vec<Vec<f64>>> {
        self(legs)
    }
}

/// Provider that never has correlation data.
#[derive(Clone, Copy, Debug, Default)]
pub struct Independent;

impl CorrelationProvider for Independent {
    fn correlation_matrix(&self, _legs: &[Leg]) -> Option<Vec<Vec<f64>>> {
        None
    }
}

/// Provider that assigns one correlation coefficient to every pair.
///
/// # Examples
///
/// ```rust
/// use parlay_core::types::Leg;
/// use parlay_pricing::provider::{CorrelationProvider, PairwiseCorrelation};
///
/// let provider = PairwiseCorrelation::new(0.4);
/// let legs = vec![Leg::new("G1", "a", "ml", "home", 0.5); 3];
/// let m = provider.correlation_matrix(&legs).unwrap();
/// assert_eq!(m[0][0], 1.0);
/// assert_eq!(m[1][2], 0.4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PairwiseCorrelation {
    rho: f64,
}

impl PairwiseCorrelation {
    /// Creates a provider with coefficient `rho` for every pair.
    pub fn new(rho: f64) -> Self {
        Self { rho }
    }

    /// Returns the pairwise coefficient.
    pub fn rho(&self) -> f64 {
        self.rho
    }
}

impl CorrelationProvider for PairwiseCorrelation {
    fn correlation_matrix(&self, legs: &[Leg]) -> Option<Vec<Vec<f64>>> {
        let n = legs.len();
        Some(
            (0..n)
                .map(|i| (0..n).map(|j| if i == j { 1.0 } else { self.rho }).collect())
                .collect(),
        )
    }
}
