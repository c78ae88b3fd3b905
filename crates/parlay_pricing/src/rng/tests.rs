//! Unit tests for the RNG module.

use super::*;
use parlay_core::math::correlation::{sanitize_rows, CholeskyFactor};

fn factor(rho: f64) -> CholeskyFactor<f64> {
    sanitize_rows(&[vec![1.0, rho], vec![rho, 1.0]], 2)
        .unwrap()
        .cholesky()
        .unwrap()
}

#[test]
fn test_same_group_seed_replays() {
    let mut buf1 = vec![0.0; 64];
    let mut buf2 = vec![0.0; 64];
    SimulationRng::for_group(7).fill_normal(&mut buf1);
    SimulationRng::for_group(7).fill_normal(&mut buf2);
    assert_eq!(buf1, buf2);
}

#[test]
fn test_different_seeds_differ() {
    let mut a = vec![0.0; 16];
    let mut b = vec![0.0; 16];
    SimulationRng::for_group(1).fill_normal(&mut a);
    SimulationRng::for_group(2).fill_normal(&mut b);
    assert_ne!(a, b);
}

#[test]
fn test_seed_accessor() {
    assert_eq!(SimulationRng::for_group(u32::MAX).seed(), u32::MAX);
}

#[test]
fn test_empty_buffer() {
    let mut rng = SimulationRng::for_group(42);
    rng.fill_normal(&mut []);
    assert_eq!(rng.draws(), 0);
}

#[test]
fn test_correlated_draw_counts_and_replays() {
    let factor = factor(0.6);
    let mut rng1 = SimulationRng::for_group(11);
    let mut rng2 = SimulationRng::for_group(11);
    let (mut z1, mut w1) = (vec![0.0; 2], vec![0.0; 2]);
    let (mut z2, mut w2) = (vec![0.0; 2], vec![0.0; 2]);

    for _ in 0..10 {
        rng1.correlated_draw(&factor, &mut z1, &mut w1);
        rng2.correlated_draw(&factor, &mut z2, &mut w2);
        assert_eq!(w1, w2);
    }
    assert_eq!(rng1.draws(), 10);
}

#[test]
fn test_correlated_draws_have_target_correlation() {
    let factor = factor(0.7);
    let mut rng = SimulationRng::for_group(2024);
    let (mut z, mut w) = (vec![0.0; 2], vec![0.0; 2]);
    let n = 50_000;
    let mut cross = 0.0;

    for _ in 0..n {
        rng.correlated_draw(&factor, &mut z, &mut w);
        cross += w[0] * w[1];
    }

    // Standard error of the sample covariance is ~0.006 here
    assert!((cross / n as f64 - 0.7).abs() < 0.04);
}

use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Normal distribution moments should be approximately correct.
    #[test]
    fn prop_normal_moments(seed in any::<u32>()) {
        let mut rng = SimulationRng::for_group(seed);
        let sample_size = 100_000;
        let mut buffer = vec![0.0; sample_size];
        rng.fill_normal(&mut buffer);

        let mean = buffer.iter().sum::<f64>() / sample_size as f64;
        let variance = buffer.iter().map(|x| (x - mean).powi(2)).sum::<f64>()
            / (sample_size - 1) as f64;

        // Standard error of the mean is ~0.003; 0.02 is > 6 sigma
        prop_assert!(mean.abs() < 0.02, "mean {} (seed={})", mean, seed);
        prop_assert!((variance - 1.0).abs() < 0.03, "variance {} (seed={})", variance, seed);
    }
}
