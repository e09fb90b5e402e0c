//! Formatted terminal output.

use crate::app::pipeline::BatchOutput;
use crate::data::SimulationReport;
use crate::domain::{Assessment, ReferenceCurve};
use crate::fit::Calibration;
use crate::forecast::SleepForecast;
use crate::io::ingest::RowError;
use crate::reference::ReferenceTable;
use crate::sentiment::SentimentScore;

/// Single-measurement result block.
pub fn format_assessment(a: &Assessment, table: &ReferenceTable) -> String {
    let m = &a.measurement;
    let unit = m.metric.unit();
    let mut out = String::new();
    out.push_str(&format!(
        "{} {} at {:.2} months: {:.2}{unit}\n",
        m.sex.as_str(),
        m.metric.as_str(),
        m.age_months,
        m.value
    ));
    out.push_str(&format!(
        "Reference ({}): mean={:.2}{unit} sd={:.2}{unit}\n",
        table.name, a.curve.mean, a.curve.sd
    ));
    out.push_str(&format!("z={:+.3}\n", a.z));
    out.push_str(&format!("Percentile: {} ({})\n", a.percentile, a.band().label()));
    out.push_str(&format_note(table));
    out
}

pub fn format_curve(curve: &ReferenceCurve, unit: &str) -> String {
    format!("mean={:.4}{unit} sd={:.4}{unit}\n", curve.mean, curve.sd)
}

/// Dataset stats, band histogram, extremes and skipped rows for `batch`.
pub fn format_batch(run: &BatchOutput, table: &ReferenceTable) -> String {
    let mut out = String::new();
    out.push_str("=== growth - batch percentiles ===\n");
    out.push_str(&format!("Reference: {}\n", table.name));
    out.push_str(&format!(
        "Rows: read={} | assessed={} | skipped={}\n",
        run.rows_read,
        run.assessments.len(),
        run.row_errors.len()
    ));

    let labels = ["very low", "low", "typical", "high", "very high"];
    out.push_str("\nBands:\n");
    for (label, count) in labels.iter().zip(run.summary.band_counts.iter()) {
        out.push_str(&format!("  {label:<10} {count:>6}\n"));
    }

    out.push_str("\nLowest:\n");
    out.push_str(&format_table(&run.summary.lowest));
    out.push_str("\nHighest:\n");
    out.push_str(&format_table(&run.summary.highest));

    if !run.row_errors.is_empty() {
        out.push_str("\nSkipped rows:\n");
        out.push_str(&format_row_errors(&run.row_errors));
    }

    out.push('\n');
    out.push_str(&format_note(table));
    out
}

fn format_table(rows: &[Assessment]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<20} {:<7} {:<6} {:>8} {:>10} {:>8} {:>4}\n",
            "id", "metric", "sex", "age_mo", "value", "z", "pct"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<20} {:-<7} {:-<6} {:-<8} {:-<10} {:-<8} {:-<4}\n",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for a in rows {
        let m = &a.measurement;
        out.push_str(
            format!(
                "{:<20} {:<7} {:<6} {:>8.2} {:>10.2} {:>+8.3} {:>4}\n",
                truncate(&m.id, 20),
                m.metric.as_str(),
                m.sex.as_str(),
                m.age_months,
                m.value,
                a.z,
                a.percentile,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

pub fn format_row_errors(errors: &[RowError]) -> String {
    let mut out = String::new();
    for e in errors {
        match &e.id {
            Some(id) => out.push_str(&format!("  line {} ({id}): {}\n", e.line, e.message)),
            None => out.push_str(&format!("  line {}: {}\n", e.line, e.message)),
        }
    }
    out
}

pub fn format_simulation(report: &SimulationReport) -> String {
    let c = &report.config;
    let n = c.count as f64;
    let mut out = String::new();
    out.push_str(&format!(
        "Simulated {} {} {} measurements (seed={}, age=[{:.1}, {:.1}] months)\n",
        c.count,
        c.sex.as_str(),
        c.metric.as_str(),
        c.seed,
        c.age_min,
        c.age_max
    ));
    out.push_str("Percentile deciles (expected ~10% each):\n");
    for (i, &count) in report.deciles.iter().enumerate() {
        let lo = i * 10;
        let hi = if i == 9 { 100 } else { lo + 9 };
        out.push_str(&format!(
            "  {lo:>3}-{hi:<3} {count:>7} {:>6.2}%\n",
            100.0 * count as f64 / n
        ));
    }
    out.push_str(&format!(
        "Mean percentile: {:.2} | max decile deviation: {:.2}%\n",
        report.mean_percentile,
        100.0 * report.max_deviation
    ));
    out
}

pub fn format_calibration(cal: &Calibration) -> String {
    let mut out = String::new();
    out.push_str(&format!("Calibrated table '{}'\n", cal.table.name));
    out.push_str(&format!(
        "{:<7} {:<6} {:>4} {:>10} {:>8} {:>8} {:>8} {:>8} {:>8}\n",
        "metric", "sex", "n", "mean_a0", "mean_a1", "mean_r2", "sd_b0", "sd_b1", "sd_rmse"
    ));
    for g in &cal.groups {
        out.push_str(&format!(
            "{:<7} {:<6} {:>4} {:>10.4} {:>8.4} {:>8.4} {:>8.4} {:>8.4} {:>8.4}\n",
            g.metric.as_str(),
            g.sex.as_str(),
            g.n,
            g.mean_fit.intercept,
            g.mean_fit.slope,
            g.mean_fit.r_squared,
            g.sd_fit.intercept,
            g.sd_fit.slope,
            g.sd_fit.rmse,
        ));
    }
    for (metric, sex, reason) in &cal.skipped {
        out.push_str(&format!("  (skipped {}/{}) {reason}\n", metric.as_str(), sex.as_str()));
    }
    out
}

pub fn format_sentiment(score: &SentimentScore) -> String {
    format!(
        "Sentiment: {} (score={:+}, positive={}, negative={})\n",
        score.label.as_str(),
        score.score,
        score.positive,
        score.negative
    )
}

pub fn format_sleep_forecast(forecast: Option<&SleepForecast>) -> String {
    let Some(f) = forecast else {
        return "Not enough data: need entries in both of the last two weeks.\n".to_string();
    };
    let mut out = String::new();
    out.push_str(&format!("Anchor date: {}\n", f.anchor));
    out.push_str(&format!(
        "Last 7 days:  {:.2}h avg over {} entries\n",
        f.recent_avg, f.recent_entries
    ));
    out.push_str(&format!(
        "Prior 7 days: {:.2}h avg over {} entries\n",
        f.prior_avg, f.prior_entries
    ));
    out.push_str(&format!("Trend: {:+.2}h\n", f.trend));
    out.push_str(&format!("Forecast next week: {:.2}h avg\n", f.forecast));
    out
}

fn format_note(table: &ReferenceTable) -> String {
    if table.note.is_empty() {
        String::new()
    } else {
        format!("Note: {}\n", table.note)
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Measurement, Metric, Sex};
    use crate::percentile::PercentileEstimator;

    #[test]
    fn assessment_block_mentions_caveat() {
        let est = PercentileEstimator::default();
        let m = Measurement {
            id: "x".to_string(),
            metric: Metric::Height,
            sex: Sex::Female,
            age_months: 6.0,
            value: 70.0,
        };
        let a = est.assess(&m).unwrap();
        let txt = format_assessment(&a, est.table());
        assert!(txt.contains("Percentile: 98 (very high)"));
        assert!(txt.contains("mean=64.60cm sd=2.50cm"));
        assert!(txt.contains("not a substitute for clinical growth charts"));
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }

    #[test]
    fn missing_forecast_message() {
        assert!(format_sleep_forecast(None).starts_with("Not enough data"));
    }
}
