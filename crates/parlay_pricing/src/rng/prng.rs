//! Per-group normal variate source.
//!
//! [`SimulationRng`] is built from a group's 32-bit seed and produces the
//! correlated latent vectors the copula sampler tests against thresholds.

use parlay_core::math::correlation::CholeskyFactor;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

/// Seeded generator for one group simulation.
///
/// A fresh instance is built for every group and never shared, so pricing
/// groups in any order (or on any thread) replays the same draws.
///
/// # Examples
///
/// ```rust
/// use parlay_core::math::correlation::sanitize_rows;
/// use parlay_pricing::rng::SimulationRng;
///
/// let factor = sanitize_rows(&[vec![1.0, 0.5], vec![0.5, 1.0]], 2)
///     .unwrap()
///     .cholesky()
///     .unwrap();
///
/// let mut rng = SimulationRng::for_group(7);
/// let (mut z, mut w) = (vec![0.0; 2], vec![0.0; 2]);
/// rng.correlated_draw(&factor, &mut z, &mut w);
///
/// // First coordinate passes through the factor unchanged
/// assert_eq!(w[0], z[0]);
/// assert_eq!(rng.draws(), 1);
/// ```
pub struct SimulationRng {
    inner: StdRng,
    seed: u32,
    draws: u64,
}

impl SimulationRng {
    /// Creates the generator for a group seed.
    #[inline]
    pub fn for_group(seed: u32) -> Self {
        Self {
            inner: StdRng::seed_from_u64(u64::from(seed)),
            seed,
            draws: 0,
        }
    }

    /// Group seed this generator was built from.
    #[inline]
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Number of correlated vectors drawn so far.
    #[inline]
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Fills `buffer` with independent standard normals.
    #[inline]
    pub fn fill_normal(&mut self, buffer: &mut [f64]) {
        for value in buffer.iter_mut() {
            *value = StandardNormal.sample(&mut self.inner);
        }
    }

    /// Draws one correlated latent vector.
    ///
    /// `z` receives fresh independent normals and `out` receives `L z`.
    ///
    /// # Panics
    ///
    /// Panics if either buffer is shorter than the factor dimension.
    #[inline]
    pub fn correlated_draw(
        &mut self,
        factor: &CholeskyFactor<f64>,
        z: &mut [f64],
        out: &mut [f64],
    ) {
        let n = factor.dim();
        self.fill_normal(&mut z[..n]);
        factor.transform_into(z, out);
        self.draws += 1;
    }
}
