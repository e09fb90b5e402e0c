//! Synthetic cohort generation and estimator self-check.
//!
//! Measurements are drawn exactly from the reference model
//! (`value ~ N(mean(age), sd(age)²)`), so their estimated percentiles should be
//! close to uniform on `[0, 100]`. Large decile deviations indicate a broken
//! CDF or a reference table whose sd turns non-positive within the age range.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Measurement, Metric, Sex};
use crate::error::AppError;
use crate::percentile::PercentileEstimator;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub sex: Sex,
    pub metric: Metric,
    pub count: usize,
    pub seed: u64,
    pub age_min: f64,
    pub age_max: f64,
}

#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub config: SimulationConfig,
    /// Counts of percentiles per decile bucket (`0..10`, `10..20`, …, `90..=100`).
    pub deciles: [usize; 10],
    /// Largest `|observed share - 0.1|` over the deciles.
    pub max_deviation: f64,
    pub mean_percentile: f64,
}

/// Draw `count` measurements from the reference model.
pub fn generate_cohort(estimator: &PercentileEstimator, config: &SimulationConfig) -> Result<Vec<Measurement>, AppError> {
    validate(config)?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let standard = Normal::new(0.0, 1.0).map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let mut out = Vec::with_capacity(config.count);
    for i in 0..config.count {
        let age = if config.age_max > config.age_min {
            rng.gen_range(config.age_min..=config.age_max)
        } else {
            config.age_min
        };
        let curve = estimator.curve(age, config.sex, config.metric)?;
        let z: f64 = standard.sample(&mut rng);
        out.push(Measurement {
            id: format!("sim-{:04}", i + 1),
            metric: config.metric,
            sex: config.sex,
            age_months: age,
            value: curve.mean + curve.sd * z,
        });
    }
    Ok(out)
}

/// Generate a cohort, estimate every percentile, and summarize the distribution.
pub fn simulate(estimator: &PercentileEstimator, config: &SimulationConfig) -> Result<SimulationReport, AppError> {
    let cohort = generate_cohort(estimator, config)?;

    let mut deciles = [0usize; 10];
    let mut sum = 0.0;
    for m in &cohort {
        let a = estimator.assess(m)?;
        deciles[decile(a.percentile)] += 1;
        sum += f64::from(a.percentile);
    }

    let n = cohort.len() as f64;
    let max_deviation = deciles
        .iter()
        .map(|&c| (c as f64 / n - 0.1).abs())
        .fold(0.0, f64::max);

    Ok(SimulationReport {
        config: *config,
        deciles,
        max_deviation,
        mean_percentile: sum / n,
    })
}

fn decile(percentile: u8) -> usize {
    usize::from(percentile / 10).min(9)
}

fn validate(config: &SimulationConfig) -> Result<(), AppError> {
    if config.count == 0 {
        return Err(AppError::input("Sample count must be > 0."));
    }
    let range_ok = config.age_min.is_finite()
        && config.age_max.is_finite()
        && config.age_min >= 0.0
        && config.age_max >= config.age_min;
    if !range_ok {
        return Err(AppError::input(format!(
            "Invalid age range [{}, {}] months.",
            config.age_min, config.age_max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(count: usize) -> SimulationConfig {
        SimulationConfig {
            sex: Sex::Female,
            metric: Metric::Weight,
            count,
            seed: 7,
            age_min: 0.0,
            age_max: 24.0,
        }
    }

    #[test]
    fn cohort_is_deterministic_for_a_seed() {
        let est = PercentileEstimator::default();
        let a = generate_cohort(&est, &config(50)).unwrap();
        let b = generate_cohort(&est, &config(50)).unwrap();
        assert_eq!(a, b);
        assert!(a.iter().all(|m| (0.0..=24.0).contains(&m.age_months)));
    }

    #[test]
    fn percentiles_are_roughly_uniform() {
        let est = PercentileEstimator::default();
        let report = simulate(&est, &config(20_000)).unwrap();
        assert_eq!(report.deciles.iter().sum::<usize>(), 20_000);
        // Rounding shifts ~0.5% of mass into the last bucket (p = 100), and
        // sampling noise at n = 20k is ~0.2%.
        assert!(report.max_deviation < 0.02, "deviation {}", report.max_deviation);
        assert!((report.mean_percentile - 50.0).abs() < 1.5);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let est = PercentileEstimator::default();
        assert!(simulate(&est, &config(0)).is_err());

        let mut bad = config(10);
        bad.age_min = 5.0;
        bad.age_max = 1.0;
        assert_eq!(simulate(&est, &bad).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn decile_buckets() {
        assert_eq!(decile(0), 0);
        assert_eq!(decile(9), 0);
        assert_eq!(decile(10), 1);
        assert_eq!(decile(99), 9);
        assert_eq!(decile(100), 9);
    }
}
