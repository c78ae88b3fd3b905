//! Correlation matrices, sanitisation and Cholesky factorisation.
//!
//! Correlation matrices for a group of legs come from an external provider
//! and are untrusted: they may be asymmetric, out of range, non-finite or
//! numerically singular. This module forces them into a valid shape and
//! factorises them for correlated normal sampling.
//!
//! ## Mathematical Background
//!
//! Given `n` independent standard normal random variables `Z = [Z1, ..., Zn]`,
//! correlated normals `W = [W1, ..., Wn]` are generated with:
//!
//! ```text
//! W = L * Z
//! ```
//!
//! where `L` is the lower triangular Cholesky factor of the correlation
//! matrix `C = L * L^T`.
//!
//! ## Usage
//!
//! ```
//! use parlay_core::math::correlation::{sanitize_rows, JitterSchedule};
//!
//! let corr = sanitize_rows(&[vec![1.0, 0.5], vec![0.5, 1.0]], 2).unwrap();
//! let (cholesky, outcome) = corr.cholesky_with_jitter(&JitterSchedule::default()).unwrap();
//! assert_eq!(outcome.attempts, 1);
//!
//! let w = cholesky.transform(&[0.5_f64, 0.8]);
//! assert_eq!(w.len(), 2);
//! ```

use num_traits::Float;
use thiserror::Error;

/// Off-diagonal clamp applied by the sanitiser.
pub const DEFAULT_CORRELATION_BOUND: f64 = 0.99;

/// Error types for correlation operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorrelationError {
    /// Matrix is not positive definite.
    #[error("Correlation matrix is not positive definite")]
    NotPositiveDefinite,

    /// Matrix is still not positive definite after every jitter attempt.
    #[error("Correlation matrix is not positive definite after {attempts} attempts (last jitter {jitter})")]
    FactorisationFailed {
        /// Number of factorisation attempts made
        attempts: usize,
        /// Jitter added on the final attempt
        jitter: f64,
    },

    /// Matrix dimensions are invalid.
    #[error("Invalid matrix dimensions: expected {expected} elements, got {got}")]
    InvalidDimensions {
        /// Expected element count
        expected: usize,
        /// Actual element count
        got: usize,
    },
}

/// Diagonal jitter schedule for near-singular matrices.
///
/// The first attempt factorises the matrix as given. Each failed attempt
/// adds `initial * growth^k` to the diagonal (cumulatively) and retries,
/// for at most `max_attempts` attempts in total.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JitterSchedule {
    /// Jitter added after the first failure.
    pub initial: f64,
    /// Multiplier applied to the jitter after every further failure.
    pub growth: f64,
    /// Total number of factorisation attempts.
    pub max_attempts: usize,
}

impl Default for JitterSchedule {
    fn default() -> Self {
        Self {
            initial: 1e-8,
            growth: 10.0,
            max_attempts: 6,
        }
    }
}

/// Outcome of a successful jittered factorisation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JitterOutcome {
    /// Attempts used, including the successful one.
    pub attempts: usize,
    /// Total jitter added to the diagonal.
    pub total_jitter: f64,
}

/// Sanitised correlation matrix with Cholesky decomposition.
///
/// Only [`CorrelationMatrix::sanitized`] and [`CorrelationMatrix::identity`]
/// build one, so every instance is square and symmetric with a unit
/// diagonal and off-diagonals inside the sanitiser bound. Positive
/// definiteness is not guaranteed and is checked at factorisation.
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelationMatrix<T: Float> {
    /// Matrix elements in row-major order
    data: Vec<T>,
    /// Matrix dimension (n x n)
    dim: usize,
}

impl<T: Float> CorrelationMatrix<T> {
    /// Force an arbitrary square matrix into a valid correlation matrix.
    ///
    /// Symmetrises by averaging with the transpose, clamps off-diagonals to
    /// `[-bound, bound]` and sets the diagonal to exactly one. Non-finite
    /// entries are read as zero. For `dim <= 1` the identity is returned.
    pub fn sanitized(data: &[T], dim: usize, bound: T) -> Result<Self, CorrelationError> {
        if dim <= 1 {
            return Ok(Self::identity(dim));
        }
        let expected = dim * dim;
        if data.len() != expected {
            return Err(CorrelationError::InvalidDimensions {
                expected,
                got: data.len(),
            });
        }

        let finite = |x: T| if x.is_finite() { x } else { T::zero() };
        let half = T::from(0.5).unwrap_or_else(T::zero);
        let mut out = vec![T::zero(); expected];

        for i in 0..dim {
            out[i * dim + i] = T::one();
            for j in (i + 1)..dim {
                let avg = (finite(data[i * dim + j]) + finite(data[j * dim + i])) * half;
                let clamped = avg.max(-bound).min(bound);
                out[i * dim + j] = clamped;
                out[j * dim + i] = clamped;
            }
        }

        Ok(Self { data: out, dim })
    }

    /// Create an identity correlation matrix (no correlation).
    pub fn identity(dim: usize) -> Self {
        let mut data = vec![T::zero(); dim * dim];
        for i in 0..dim {
            data[i * dim + i] = T::one();
        }
        Self { data, dim }
    }

    /// Get matrix dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Get element at (i, j).
    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[i * self.dim + j]
    }

    /// Compute Cholesky decomposition (lower triangular L where C = L * L^T).
    ///
    /// # Returns
    ///
    /// `Err(CorrelationError::NotPositiveDefinite)` if the matrix is not
    /// positive definite.
    pub fn cholesky(&self) -> Result<CholeskyFactor<T>, CorrelationError> {
        factorise(&self.data, self.dim, T::zero())
    }

    /// Cholesky decomposition with diagonal jitter retries.
    ///
    /// Every failure variant of a single attempt is treated the same way:
    /// add jitter and retry. Once `schedule.max_attempts` is exhausted the
    /// result is `CorrelationError::FactorisationFailed`.
    pub fn cholesky_with_jitter(
        &self,
        schedule: &JitterSchedule,
    ) -> Result<(CholeskyFactor<T>, JitterOutcome), CorrelationError> {
        let attempts = schedule.max_attempts.max(1);
        let mut jitter = schedule.initial;
        let mut total_jitter = 0.0;

        for attempt in 1..=attempts {
            let shift = T::from(total_jitter).unwrap_or_else(T::zero);
            if let Ok(factor) = factorise(&self.data, self.dim, shift) {
                return Ok((
                    factor,
                    JitterOutcome {
                        attempts: attempt,
                        total_jitter,
                    },
                ));
            }
            if attempt < attempts {
                total_jitter += jitter;
                jitter *= schedule.growth;
            }
        }

        Err(CorrelationError::FactorisationFailed {
            attempts,
            jitter: total_jitter,
        })
    }
}

/// Sanitise a provider matrix given as rows for a group of `n` legs.
///
/// Returns `None` when the shape does not match `n` (treated upstream as
/// "no correlation data"). For `n <= 1` the identity is returned whatever
/// the input.
///
/// # Examples
///
/// ```
/// use parlay_core::math::correlation::sanitize_rows;
///
/// let m = sanitize_rows(&[vec![0.2, 0.3], vec![0.1, 5.0]], 2).unwrap();
/// assert_eq!(m.get(0, 0), 1.0);
/// assert!((m.get(0, 1) - 0.2).abs() < 1e-12);
///
/// assert!(sanitize_rows(&[vec![1.0, 0.5]], 2).is_none());
/// assert_eq!(sanitize_rows(&[], 1).unwrap().dim(), 1);
/// ```
pub fn sanitize_rows(rows: &[Vec<f64>], n: usize) -> Option<CorrelationMatrix<f64>> {
    sanitize_rows_with_bound(rows, n, DEFAULT_CORRELATION_BOUND)
}

/// [`sanitize_rows`] with an explicit off-diagonal bound.
pub fn sanitize_rows_with_bound(
    rows: &[Vec<f64>],
    n: usize,
    bound: f64,
) -> Option<CorrelationMatrix<f64>> {
    if n <= 1 {
        return Some(CorrelationMatrix::identity(n));
    }
    if rows.len() != n || rows.iter().any(|row| row.len() != n) {
        return None;
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    CorrelationMatrix::sanitized(&flat, n, bound).ok()
}

fn factorise<T: Float>(
    data: &[T],
    n: usize,
    diagonal_shift: T,
) -> Result<CholeskyFactor<T>, CorrelationError> {
    let mut lower = vec![T::zero(); n * n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = T::zero();

            if j == i {
                for k in 0..j {
                    let l_jk = lower[j * n + k];
                    sum = sum + l_jk * l_jk;
                }
                let diag = data[j * n + j] + diagonal_shift - sum;
                // Also rejects NaN
                if !(diag > T::zero()) {
                    return Err(CorrelationError::NotPositiveDefinite);
                }
                lower[j * n + j] = diag.sqrt();
            } else {
                for k in 0..j {
                    sum = sum + lower[i * n + k] * lower[j * n + k];
                }
                let l_jj = lower[j * n + j];
                lower[i * n + j] = (data[i * n + j] - sum) / l_jj;
            }
        }
    }

    Ok(CholeskyFactor { data: lower, dim: n })
}

/// Lower triangular Cholesky factor of a correlation matrix.
///
/// Used to transform independent standard normals into correlated normals.
#[derive(Clone, Debug)]
pub struct CholeskyFactor<T: Float> {
    /// Lower triangular matrix elements (row-major)
    data: Vec<T>,
    /// Matrix dimension
    dim: usize,
}

impl<T: Float> CholeskyFactor<T> {
    /// Get matrix dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Get element at (i, j).
    ///
    /// Returns zero for upper triangular elements (j > i).
    pub fn get(&self, i: usize, j: usize) -> T {
        if j > i {
            T::zero()
        } else {
            self.data[i * self.dim + j]
        }
    }

    /// Transform independent standard normals to correlated normals.
    ///
    /// # Panics
    ///
    /// Panics if `z.len() < self.dim()`.
    pub fn transform(&self, z: &[T]) -> Vec<T> {
        let mut w = vec![T::zero(); self.dim];
        self.transform_into(z, &mut w);
        w
    }

    /// Computes `out = L * z` without allocating.
    ///
    /// # Panics
    ///
    /// Panics if `z` or `out` is shorter than `self.dim()`.
    #[inline]
    pub fn transform_into(&self, z: &[T], out: &mut [T]) {
        assert!(
            z.len() >= self.dim && out.len() >= self.dim,
            "Input length {} / output length {} less than matrix dimension {}",
            z.len(),
            out.len(),
            self.dim
        );

        let n = self.dim;
        for i in 0..n {
            let row = &self.data[i * n..i * n + i + 1];
            let mut sum = T::zero();
            for (l_ij, z_j) in row.iter().zip(z) {
                sum = sum + *l_ij * *z_j;
            }
            out[i] = sum;
        }
    }
}
