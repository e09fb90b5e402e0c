//! ASCII percentile-band plot for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - 50th percentile: `-`
//! - 15th / 85th percentiles: `:`
//! - 3rd / 97th percentiles: `.`
//! - measurements: `o`

use crate::domain::{Measurement, Metric, Sex};
use crate::error::AppError;
use crate::percentile::{PercentileEstimator, value_at_percentile};

/// Percentile lines drawn, paired with their glyph. Drawn in this order, so
/// the median wins where lines overlap.
pub const BANDS: [(f64, char); 5] = [(50.0, '-'), (15.0, ':'), (85.0, ':'), (3.0, '.'), (97.0, '.')];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotSpec {
    pub sex: Sex,
    pub metric: Metric,
    pub age_min: f64,
    pub age_max: f64,
    pub width: usize,
    pub height: usize,
}

/// Render percentile bands for `spec` with optional measurement overlay.
///
/// Measurements for a different (sex, metric) pair are ignored.
pub fn render_band_plot(
    estimator: &PercentileEstimator,
    spec: &PlotSpec,
    overlay: &[Measurement],
) -> Result<String, AppError> {
    if !(spec.age_min.is_finite() && spec.age_max.is_finite() && spec.age_max > spec.age_min) {
        return Err(AppError::input(format!(
            "Invalid plot age range [{}, {}] months.",
            spec.age_min, spec.age_max
        )));
    }
    let width = spec.width.max(10);
    let height = spec.height.max(5);

    let mut lines = Vec::with_capacity(BANDS.len());
    for &(p, glyph) in &BANDS {
        lines.push((sample_band(estimator, spec, p, width)?, glyph));
    }

    let points: Vec<(f64, f64)> = overlay
        .iter()
        .filter(|m| m.sex == spec.sex && m.metric == spec.metric)
        .map(|m| (m.age_months, m.value))
        .collect();

    let (y_min, y_max) = y_range(&lines, &points).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    for (curve, glyph) in &lines {
        draw_curve(&mut grid, curve, spec.age_min, spec.age_max, y_min, y_max, *glyph);
    }

    for &(age, value) in &points {
        if age < spec.age_min || age > spec.age_max {
            continue;
        }
        let x = map_x(age, spec.age_min, spec.age_max, width);
        let y = map_y(value, y_min, y_max, height);
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} {} | age=[{:.1}, {:.1}] months | y=[{y_min:.2}, {y_max:.2}]{}\n",
        spec.sex.as_str(),
        spec.metric.as_str(),
        spec.age_min,
        spec.age_max,
        spec.metric.unit(),
    ));

    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }

    Ok(out)
}

fn sample_band(
    estimator: &PercentileEstimator,
    spec: &PlotSpec,
    percentile: f64,
    n: usize,
) -> Result<Vec<(f64, f64)>, AppError> {
    let n = n.max(2);
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let age = spec.age_min + u * (spec.age_max - spec.age_min);
        let curve = estimator.curve(age, spec.sex, spec.metric)?;
        if let Some(v) = value_at_percentile(curve, percentile)? {
            out.push((age, v));
        }
    }
    Ok(out)
}

fn y_range(lines: &[(Vec<(f64, f64)>, char)], points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    let all = lines.iter().flat_map(|(c, _)| c.iter()).chain(points.iter());
    for &(_, y) in all {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(
    grid: &mut [Vec<char>],
    curve: &[(f64, f64)],
    t_min: f64,
    t_max: f64,
    y_min: f64,
    y_max: f64,
    ch: char,
) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(t, y) in curve {
        let x = map_x(t, t_min, t_max, width);
        let yy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, yy, ch);
        } else if grid[yy][x] == ' ' {
            grid[yy][x] = ch;
        }
        prev = Some((x, yy));
    }
}

/// Integer line drawing (Bresenham-ish). Never overwrites a non-blank cell.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LinearCoef;
    use crate::reference::ReferenceTable;

    fn flat_estimator() -> PercentileEstimator {
        // Constant N(10, 1) at every age keeps the golden snapshot readable.
        let mut table = ReferenceTable::default();
        for e in &mut table.entries {
            e.mean = LinearCoef::new(10.0, 0.0);
            e.sd = LinearCoef::new(1.0, 0.0);
        }
        PercentileEstimator::new(table)
    }

    fn spec(width: usize, height: usize) -> PlotSpec {
        PlotSpec {
            sex: Sex::Male,
            metric: Metric::Weight,
            age_min: 0.0,
            age_max: 12.0,
            width,
            height,
        }
    }

    #[test]
    fn plot_golden_snapshot_flat_bands() {
        let overlay = vec![Measurement {
            id: "m".to_string(),
            metric: Metric::Weight,
            sex: Sex::Male,
            age_months: 12.0,
            value: 10.0,
        }];
        let txt = render_band_plot(&flat_estimator(), &spec(10, 9), &overlay).unwrap();
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 10);
        assert!(lines[0].starts_with("Plot: male weight | age=[0.0, 12.0] months"));
        // top and bottom rows hold the 97th / 3rd percentile lines
        assert_eq!(lines[1], "..........");
        assert_eq!(lines[9], "..........");
        // the median row holds the measurement at the right edge
        assert_eq!(lines[5], "---------o");
    }

    #[test]
    fn overlay_for_other_pairs_is_ignored() {
        let overlay = vec![Measurement {
            id: "m".to_string(),
            metric: Metric::Head,
            sex: Sex::Male,
            age_months: 6.0,
            value: 10.0,
        }];
        let txt = render_band_plot(&flat_estimator(), &spec(20, 9), &overlay).unwrap();
        assert!(txt.lines().skip(1).all(|row| !row.contains('o')));
    }

    #[test]
    fn default_table_plot_renders_all_glyphs() {
        let est = PercentileEstimator::default();
        let txt = render_band_plot(&est, &spec(60, 20), &[]).unwrap();
        let body: String = txt.lines().skip(1).collect();
        for glyph in ['-', ':', '.'] {
            assert!(body.contains(glyph), "missing {glyph}");
        }
    }

    #[test]
    fn shrinking_sd_past_zero_is_a_domain_error() {
        // sd(2) = 0 and sd(6) = -2; the bands would cross over.
        let mut table = ReferenceTable::default();
        for e in &mut table.entries {
            e.mean = LinearCoef::new(10.0, 0.0);
            e.sd = LinearCoef::new(1.0, -0.5);
        }
        let est = PercentileEstimator::new(table);
        let mut s = spec(20, 9);
        s.age_max = 6.0;
        let err = render_band_plot(&est, &s, &[]).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn invalid_range_is_rejected() {
        let mut s = spec(10, 5);
        s.age_max = s.age_min;
        assert!(render_band_plot(&PercentileEstimator::default(), &s, &[]).is_err());
    }
}
