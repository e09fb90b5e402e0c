//! Reporting utilities: batch summaries and formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the estimation code stays clean and testable
//! - output changes are localized

pub mod format;

pub use format::*;

use crate::domain::{Assessment, PercentileBand};

/// Lowest/highest ranked measurements (top-N each side) plus band counts.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub lowest: Vec<Assessment>,
    pub highest: Vec<Assessment>,
    /// Counts in `PercentileBand` order: very low, low, typical, high, very high.
    pub band_counts: [usize; 5],
}

/// Summarize a batch: band histogram and the `top_n` most extreme on each side.
///
/// Extremes are ranked by z-score, which keeps an order between measurements
/// that both round to percentile 0 or 100.
pub fn summarize(assessments: &[Assessment], top_n: usize) -> BatchSummary {
    let mut band_counts = [0usize; 5];
    for a in assessments {
        band_counts[band_index(a.band())] += 1;
    }

    let mut sorted = assessments.to_vec();
    sorted.sort_by(|a, b| a.z.partial_cmp(&b.z).unwrap_or(std::cmp::Ordering::Equal));
    let lowest = sorted.iter().take(top_n).cloned().collect();
    let highest = sorted.iter().rev().take(top_n).cloned().collect();

    BatchSummary {
        lowest,
        highest,
        band_counts,
    }
}

fn band_index(band: PercentileBand) -> usize {
    match band {
        PercentileBand::VeryLow => 0,
        PercentileBand::Low => 1,
        PercentileBand::Typical => 2,
        PercentileBand::High => 3,
        PercentileBand::VeryHigh => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Measurement, Metric, Sex};
    use crate::percentile::PercentileEstimator;

    fn assess(id: &str, value: f64) -> Assessment {
        let m = Measurement {
            id: id.to_string(),
            metric: Metric::Weight,
            sex: Sex::Male,
            age_months: 0.0,
            value,
        };
        PercentileEstimator::default().assess(&m).unwrap()
    }

    #[test]
    fn summarize_ranks_extremes_and_counts_bands() {
        let batch = vec![assess("mid", 3.4), assess("big", 5.5), assess("small", 1.5), assess("tiny", 1.0)];
        let summary = summarize(&batch, 1);

        assert_eq!(summary.lowest.len(), 1);
        assert_eq!(summary.lowest[0].measurement.id, "tiny");
        assert_eq!(summary.highest[0].measurement.id, "big");
        // tiny and small both round to 0 or 1 -> very low; big ~99 -> very high
        assert_eq!(summary.band_counts, [2, 0, 1, 0, 1]);
    }

    #[test]
    fn summarize_empty_batch() {
        let summary = summarize(&[], 5);
        assert!(summary.lowest.is_empty());
        assert_eq!(summary.band_counts.iter().sum::<usize>(), 0);
    }
}
