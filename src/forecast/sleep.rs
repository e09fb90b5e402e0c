//! Week-over-week sleep trend and next-week forecast.
//!
//! Windows are anchored on the most recent entry date `D`:
//!
//! - recent week: `(D - 7d, D]`
//! - prior week:  `(D - 14d, D - 7d]`
//!
//! `forecast = max(0, recent_avg + (recent_avg - prior_avg))`, a one-step
//! linear extrapolation of the weekly averages.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// One logged sleep period (hours may span several naps on the same date).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SleepEntry {
    pub date: NaiveDate,
    pub hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SleepForecast {
    pub anchor: NaiveDate,
    pub recent_avg: f64,
    pub prior_avg: f64,
    pub recent_entries: usize,
    pub prior_entries: usize,
    /// `recent_avg - prior_avg`, hours per entry.
    pub trend: f64,
    pub forecast: f64,
}

/// Compute the forecast, or `None` when either week has no entries.
pub fn forecast_sleep(entries: &[SleepEntry]) -> Option<SleepForecast> {
    let anchor = entries.iter().map(|e| e.date).max()?;
    let recent_start = anchor - Duration::days(7);
    let prior_start = anchor - Duration::days(14);

    let (recent_avg, recent_entries) = window_average(entries, recent_start, anchor)?;
    let (prior_avg, prior_entries) = window_average(entries, prior_start, recent_start)?;

    let trend = recent_avg - prior_avg;
    Some(SleepForecast {
        anchor,
        recent_avg,
        prior_avg,
        recent_entries,
        prior_entries,
        trend,
        forecast: (recent_avg + trend).max(0.0),
    })
}

/// Mean hours of entries with `start < date <= end`.
fn window_average(entries: &[SleepEntry], start: NaiveDate, end: NaiveDate) -> Option<(f64, usize)> {
    let (sum, n) = entries
        .iter()
        .filter(|e| e.date > start && e.date <= end)
        .fold((0.0, 0usize), |(sum, n), e| (sum + e.hours, n + 1));
    if n == 0 {
        return None;
    }
    Some((sum / n as f64, n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap() + Duration::days(offset)
    }

    fn entries(hours: &[(i64, f64)]) -> Vec<SleepEntry> {
        hours
            .iter()
            .map(|&(d, h)| SleepEntry { date: day(d), hours: h })
            .collect()
    }

    #[test]
    fn improving_trend_extrapolates_upwards() {
        // prior week days 0..7 at 12h, recent week days 7..14 at 13h
        let mut data = Vec::new();
        for d in 0..7 {
            data.push((d, 12.0));
        }
        for d in 7..14 {
            data.push((d, 13.0));
        }
        let f = forecast_sleep(&entries(&data)).unwrap();
        assert_eq!(f.anchor, day(13));
        assert_eq!(f.recent_entries, 7);
        assert_eq!(f.prior_entries, 7);
        assert!((f.recent_avg - 13.0).abs() < 1e-12);
        assert!((f.prior_avg - 12.0).abs() < 1e-12);
        assert!((f.trend - 1.0).abs() < 1e-12);
        assert!((f.forecast - 14.0).abs() < 1e-12);
    }

    #[test]
    fn forecast_never_negative() {
        let f = forecast_sleep(&entries(&[(0, 10.0), (8, 2.0)])).unwrap();
        assert!((f.trend + 8.0).abs() < 1e-12);
        assert_eq!(f.forecast, 0.0);
    }

    #[test]
    fn window_boundaries() {
        // anchor = day 14; recent = (7, 14]; prior = (0, 7]; day 0 ignored
        let f = forecast_sleep(&entries(&[(0, 100.0), (7, 10.0), (14, 12.0)])).unwrap();
        assert_eq!(f.recent_entries, 1);
        assert_eq!(f.prior_entries, 1);
        assert!((f.prior_avg - 10.0).abs() < 1e-12);
    }

    #[test]
    fn insufficient_data() {
        assert!(forecast_sleep(&[]).is_none());
        assert!(forecast_sleep(&entries(&[(0, 10.0), (1, 11.0)])).is_none());
    }
}
