//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory by the estimator
//! - parsed from CLI flags and CSV cells
//! - exported to JSON/CSV

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Reference population category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::Female, Sex::Male];

    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Female => "female",
            Sex::Male => "male",
        }
    }

    /// Parse a CSV cell. Accepts `female`/`male` and the `f`/`m` shorthands.
    pub fn parse(s: &str) -> Option<Sex> {
        match s.trim().to_ascii_lowercase().as_str() {
            "female" | "f" | "girl" => Some(Sex::Female),
            "male" | "m" | "boy" => Some(Sex::Male),
            _ => None,
        }
    }
}

/// What is being measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Body weight in kilograms.
    Weight,
    /// Recumbent length / height in centimeters.
    Height,
    /// Head circumference in centimeters.
    Head,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Weight, Metric::Height, Metric::Head];

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Weight => "weight",
            Metric::Height => "height",
            Metric::Head => "head",
        }
    }

    /// Implicit unit of a measurement of this metric.
    pub fn unit(self) -> &'static str {
        match self {
            Metric::Weight => "kg",
            Metric::Height | Metric::Head => "cm",
        }
    }

    pub fn parse(s: &str) -> Option<Metric> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weight" => Some(Metric::Weight),
            "height" | "length" => Some(Metric::Height),
            "head" | "head_circumference" => Some(Metric::Head),
            _ => None,
        }
    }
}

/// `intercept + slope * age_months`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearCoef {
    pub intercept: f64,
    pub slope: f64,
}

impl LinearCoef {
    pub const fn new(intercept: f64, slope: f64) -> Self {
        Self { intercept, slope }
    }

    pub fn at(&self, age_months: f64) -> f64 {
        self.intercept + self.slope * age_months
    }
}

/// Mean and standard deviation models for one (metric, sex) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveCoefficients {
    pub mean: LinearCoef,
    pub sd: LinearCoef,
}

/// Reference distribution at a given age.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCurve {
    pub mean: f64,
    pub sd: f64,
}

/// A tabulated reference value (e.g. one row of a published growth table).
///
/// Calibration fits `LinearCoef`s through these points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePoint {
    pub metric: Metric,
    pub sex: Sex,
    pub age_months: f64,
    pub mean: f64,
    pub sd: f64,
}

/// A single measurement to be ranked against the reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub id: String,
    pub metric: Metric,
    pub sex: Sex,
    pub age_months: f64,
    pub value: f64,
}

/// Percentile assessment of one measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub measurement: Measurement,
    pub curve: ReferenceCurve,
    pub z: f64,
    pub percentile: u8,
}

impl Assessment {
    pub fn band(&self) -> PercentileBand {
        PercentileBand::classify(self.percentile)
    }
}

/// Coarse presentation buckets for a percentile.
///
/// Thresholds follow the usual 3/15/85/97 growth-chart lines: the lower
/// edges 3 and 15 open a new band, the upper edges 85 and 97 still belong to
/// the band below them. So `0..=2` very low, `3..=14` low, `15..=85`
/// typical, `86..=97` high, `98..=100` very high. They are a display aid;
/// the estimator only ever returns the integer percentile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentileBand {
    VeryLow,
    Low,
    Typical,
    High,
    VeryHigh,
}

impl PercentileBand {
    pub fn classify(percentile: u8) -> Self {
        match percentile {
            0..=2 => PercentileBand::VeryLow,
            3..=14 => PercentileBand::Low,
            15..=85 => PercentileBand::Typical,
            86..=97 => PercentileBand::High,
            _ => PercentileBand::VeryHigh,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PercentileBand::VeryLow => "very low",
            PercentileBand::Low => "low",
            PercentileBand::Typical => "typical",
            PercentileBand::High => "high",
            PercentileBand::VeryHigh => "very high",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_shorthands() {
        assert_eq!(Sex::parse(" F "), Some(Sex::Female));
        assert_eq!(Sex::parse("Male"), Some(Sex::Male));
        assert_eq!(Sex::parse("x"), None);
        assert_eq!(Metric::parse("length"), Some(Metric::Height));
        assert_eq!(Metric::parse("HEAD"), Some(Metric::Head));
        assert_eq!(Metric::parse("bmi"), None);
    }

    #[test]
    fn band_thresholds() {
        assert_eq!(PercentileBand::classify(0), PercentileBand::VeryLow);
        assert_eq!(PercentileBand::classify(2), PercentileBand::VeryLow);
        assert_eq!(PercentileBand::classify(3), PercentileBand::Low);
        assert_eq!(PercentileBand::classify(14), PercentileBand::Low);
        assert_eq!(PercentileBand::classify(15), PercentileBand::Typical);
        assert_eq!(PercentileBand::classify(50), PercentileBand::Typical);
        assert_eq!(PercentileBand::classify(85), PercentileBand::Typical);
        assert_eq!(PercentileBand::classify(86), PercentileBand::High);
        assert_eq!(PercentileBand::classify(97), PercentileBand::High);
        assert_eq!(PercentileBand::classify(98), PercentileBand::VeryHigh);
        assert_eq!(PercentileBand::classify(100), PercentileBand::VeryHigh);
    }

    #[test]
    fn metric_units() {
        assert_eq!(Metric::Weight.unit(), "kg");
        assert_eq!(Metric::Head.unit(), "cm");
    }
}
