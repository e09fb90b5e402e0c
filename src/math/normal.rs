//! Standard normal distribution approximations.
//!
//! Both functions are closed-form polynomial/rational approximations from
//! Abramowitz & Stegun (1964):
//!
//! - `standard_normal_cdf`: formula 26.2.17 (Zelen & Severo), max abs error
//!   `< 7.5e-8`
//! - `standard_normal_quantile`: formula 26.2.23, max abs error `< 4.5e-4`
//!
//! The quantile is only used to draw percentile bands, so the looser bound is
//! fine there.

/// `1/√(2π)`.
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// `p` in `t = 1 / (1 + p·|z|)`.
const P: f64 = 0.231_641_9;

const B1: f64 = 0.319_381_53;
const B2: f64 = -0.356_563_782;
const B3: f64 = 1.781_477_937;
const B4: f64 = -1.821_255_978;
const B5: f64 = 1.330_274_429;

/// Approximate `Φ(z)`, the standard normal CDF.
///
/// Non-finite inputs: `NaN` maps to `NaN`, `+∞` to `1.0` and `-∞` to `0.0`.
pub fn standard_normal_cdf(z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }
    if z == f64::INFINITY {
        return 1.0;
    }
    if z == f64::NEG_INFINITY {
        return 0.0;
    }

    let abs_z = z.abs();
    let t = 1.0 / (1.0 + P * abs_z);
    let poly = ((((B5 * t + B4) * t + B3) * t + B2) * t + B1) * t;
    let phi = FRAC_1_SQRT_2PI * (-0.5 * abs_z * abs_z).exp();
    let cdf = 1.0 - phi * poly;

    if z >= 0.0 { cdf } else { 1.0 - cdf }
}

/// Approximate `Φ⁻¹(p)`.
///
/// Returns `NaN` outside `[0, 1]` and `∓∞` at the endpoints.
pub fn standard_normal_quantile(p: f64) -> f64 {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }

    const C0: f64 = 2.515_517;
    const C1: f64 = 0.802_853;
    const C2: f64 = 0.010_328;
    const D1: f64 = 1.432_788;
    const D2: f64 = 0.189_269;
    const D3: f64 = 0.001_308;

    let (q, sign) = if p > 0.5 { (1.0 - p, 1.0) } else { (p, -1.0) };
    let t = (-2.0 * q.ln()).sqrt();
    let z = t - (C0 + (C1 + C2 * t) * t) / (1.0 + ((D3 * t + D2) * t + D1) * t);

    sign * z
}
