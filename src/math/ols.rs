//! Least squares line fitting.
//!
//! Calibration fits `y = intercept + slope * age` for every (metric, sex) group.
//! We build the `n × 2` design matrix `[1, age]` and solve with SVD, which
//! handles tall systems and degrades gracefully when ages are nearly collinear.

use nalgebra::{DMatrix, DVector};

/// Fitted straight line plus in-sample diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub intercept: f64,
    pub slope: f64,
    pub rmse: f64,
    /// Coefficient of determination. `1.0` when `y` is constant and fit exactly.
    pub r_squared: f64,
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit a line through `(x, y)` pairs.
///
/// Returns `None` for mismatched lengths, fewer than two points, non-finite
/// data or an unsolvable system.
pub fn fit_line(xs: &[f64], ys: &[f64]) -> Option<LineFit> {
    let n = xs.len();
    if n < 2 || ys.len() != n {
        return None;
    }
    if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
        return None;
    }

    let x = DMatrix::from_fn(n, 2, |i, j| if j == 0 { 1.0 } else { xs[i] });
    let y = DVector::from_column_slice(ys);
    let beta = solve_least_squares(&x, &y)?;

    let residuals = &y - &x * &beta;
    let sse = residuals.norm_squared();
    let mean_y = y.mean();
    let sst: f64 = ys.iter().map(|v| (v - mean_y).powi(2)).sum();
    let r_squared = if sst > 0.0 { 1.0 - sse / sst } else { 1.0 };

    Some(LineFit {
        intercept: beta[0],
        slope: beta[1],
        rmse: (sse / n as f64).sqrt(),
        r_squared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn fit_line_recovers_growth_slope() {
        let ages = [0.0, 3.0, 6.0, 9.0, 12.0];
        let means: Vec<f64> = ages.iter().map(|a| 49.0 + 2.6 * a).collect();
        let fit = fit_line(&ages, &means).unwrap();
        assert!((fit.intercept - 49.0).abs() < 1e-9);
        assert!((fit.slope - 2.6).abs() < 1e-9);
        assert!(fit.rmse < 1e-9);
        assert!((fit.r_squared - 1.0).abs() < 1e-9);
    }

    #[test]
    fn fit_line_rejects_degenerate_input() {
        assert!(fit_line(&[1.0], &[2.0]).is_none());
        assert!(fit_line(&[1.0, 2.0], &[2.0]).is_none());
        assert!(fit_line(&[1.0, f64::NAN], &[2.0, 3.0]).is_none());
    }
}
