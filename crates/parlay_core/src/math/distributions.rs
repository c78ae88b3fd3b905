//! Standard normal distribution functions.
//!
//! This module provides:
//! - `norm_cdf`: Cumulative distribution function (CDF)
//! - `inverse_norm_cdf`: Quantile function (probit), used to turn marginal
//!   hit probabilities into copula thresholds
//!
//! All functions are generic over `T: Float`.

use num_traits::Float;

/// Square root of 2.
const SQRT_2: f64 = std::f64::consts::SQRT_2;

// Acklam rational approximation coefficients.
const A: [f64; 6] = [
    -3.969_683_028_665_376e1,
    2.209_460_984_245_205e2,
    -2.759_285_104_469_687e2,
    1.383_577_518_672_69e2,
    -3.066_479_806_614_716e1,
    2.506_628_277_459_239,
];
const B: [f64; 5] = [
    -5.447_609_879_822_406e1,
    1.615_858_368_580_409e2,
    -1.556_989_798_598_866e2,
    6.680_131_188_771_972e1,
    -1.328_068_155_288_572e1,
];
const C: [f64; 6] = [
    -7.784_894_002_430_293e-3,
    -3.223_964_580_411_365e-1,
    -2.400_758_277_161_838,
    -2.549_732_539_343_734,
    4.374_664_141_464_968,
    2.938_163_982_698_783,
];
const D: [f64; 4] = [
    7.784_695_709_041_462e-3,
    3.224_671_290_700_398e-1,
    2.445_134_137_142_996,
    3.754_408_661_907_416,
];

/// Lower breakpoint between the tail and central approximations.
const P_LOW: f64 = 0.02425;

#[inline]
fn c<T: Float>(x: f64) -> T {
    T::from(x).unwrap_or_else(T::zero)
}

/// Complementary error function approximation using Horner's method.
///
/// Abramowitz and Stegun formula 7.1.26, maximum error 1.5e-7.
#[inline]
fn erfc_approx<T: Float>(x: T) -> T {
    let one = T::one();
    let abs_x = x.abs();

    let t = one / (one + c::<T>(0.327_591_1) * abs_x);
    let poly = c::<T>(0.254_829_592)
        + t * (c::<T>(-0.284_496_736)
            + t * (c::<T>(1.421_413_741)
                + t * (c::<T>(-1.453_152_027) + t * c::<T>(1.061_405_429))));

    let erfc_abs = t * poly * (-abs_x * abs_x).exp();

    // erfc(-x) = 2 - erfc(x)
    if x < T::zero() {
        c::<T>(2.0) - erfc_abs
    } else {
        erfc_abs
    }
}

/// Standard normal cumulative distribution function.
///
/// Computes P(X <= x) where X ~ N(0, 1).
///
/// # Accuracy
/// Accurate to at least 1e-7 for all finite x values.
///
/// # Examples
/// ```
/// use parlay_core::math::distributions::norm_cdf;
///
/// assert!((norm_cdf(0.0_f64) - 0.5).abs() < 1e-7);
/// assert!(norm_cdf(-3.0_f64) < 0.01);
/// assert!(norm_cdf(3.0_f64) > 0.99);
/// ```
#[inline]
pub fn norm_cdf<T: Float>(x: T) -> T {
    c::<T>(0.5) * erfc_approx(-x / c::<T>(SQRT_2))
}

/// Standard normal quantile function (inverse CDF).
///
/// Uses Acklam's rational approximation with relative error below
/// 1.15e-9 over the open unit interval. Returns `-inf` for `p <= 0`,
/// `+inf` for `p >= 1` and `NaN` for `NaN` input; callers that need
/// finite thresholds clamp `p` first.
///
/// # Examples
/// ```
/// use parlay_core::math::distributions::inverse_norm_cdf;
///
/// assert_eq!(inverse_norm_cdf(0.5_f64), 0.0);
/// assert!((inverse_norm_cdf(0.975_f64) - 1.959_964).abs() < 1e-5);
/// assert!((inverse_norm_cdf(0.025_f64) + 1.959_964).abs() < 1e-5);
/// ```
pub fn inverse_norm_cdf<T: Float>(p: T) -> T {
    if p.is_nan() {
        return T::nan();
    }
    if p <= T::zero() {
        return T::neg_infinity();
    }
    if p >= T::one() {
        return T::infinity();
    }

    let one = T::one();
    let p_low = c::<T>(P_LOW);
    let p_high = one - p_low;

    if p < p_low {
        let q = (c::<T>(-2.0) * p.ln()).sqrt();
        tail(q)
    } else if p <= p_high {
        let q = p - c::<T>(0.5);
        let r = q * q;
        let num = ((((c::<T>(A[0]) * r + c::<T>(A[1])) * r + c::<T>(A[2])) * r + c::<T>(A[3]))
            * r
            + c::<T>(A[4]))
            * r
            + c::<T>(A[5]);
        let den = ((((c::<T>(B[0]) * r + c::<T>(B[1])) * r + c::<T>(B[2])) * r + c::<T>(B[3]))
            * r
            + c::<T>(B[4]))
            * r
            + one;
        num * q / den
    } else {
        let q = (c::<T>(-2.0) * (one - p).ln()).sqrt();
        -tail(q)
    }
}

#[inline]
fn tail<T: Float>(q: T) -> T {
    let num = ((((c::<T>(C[0]) * q + c::<T>(C[1])) * q + c::<T>(C[2])) * q + c::<T>(C[3])) * q
        + c::<T>(C[4]))
        * q
        + c::<T>(C[5]);
    let den =
        (((c::<T>(D[0]) * q + c::<T>(D[1])) * q + c::<T>(D[2])) * q + c::<T>(D[3])) * q + T::one();
    num / den
}
