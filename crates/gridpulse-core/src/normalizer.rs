// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridPulse.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Relative (data-driven) classification.
//!
//! The series is rescaled to `[0, 1]` by its own min/max and split at two
//! quantiles of the rescaled values, so the categories describe how a point
//! compares with the rest of the same day rather than with a fixed standard.

use gridpulse_types::{
    AnalysisError, AnalysisResult, CategoryLabel, ClassificationBounds, PreparedSeries,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::classify_values;

pub const DEFAULT_QUANTILE_LOW: f64 = 0.33;
pub const DEFAULT_QUANTILE_HIGH: f64 = 0.66;

/// What to do with a constant series, where min/max rescaling is undefined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Every point normalizes to 0.0, both bounds are 0.0, all points are Medium
    #[default]
    Flatten,
    /// Surface `AnalysisError::DegenerateSeries`
    Reject,
}

/// Rescale `(v - min) / (max - min)`.
///
/// Fails with `DegenerateSeries` for a constant series and with
/// `InsufficientData` for an empty one.
pub fn normalize(series: &PreparedSeries) -> AnalysisResult<Vec<f64>> {
    let (min, max) = min_max(series)?;
    if max == min {
        return Err(AnalysisError::DegenerateSeries { value: min });
    }
    let range = max - min;
    if range.is_finite() {
        return Ok(series.values().map(|v| (v - min) / range).collect());
    }
    // Spread beyond f64::MAX: rescale on halved values
    let half_range = max / 2.0 - min / 2.0;
    Ok(series
        .values()
        .map(|v| (v / 2.0 - min / 2.0) / half_range)
        .collect())
}

/// Quantile with linear interpolation between order statistics.
///
/// With `n` sorted values the position is `h = (n - 1) * level`; the result
/// lies between the values at `floor(h)` and `ceil(h)`.
pub fn quantile(values: &[f64], level: f64) -> AnalysisResult<f64> {
    if !(0.0..=1.0).contains(&level) {
        return Err(AnalysisError::InvalidQuantile { level });
    }
    if values.is_empty() {
        return Err(AnalysisError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let position = (sorted.len() - 1) as f64 * level;
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "position is within 0..len"
    )]
    let below = position.floor() as usize;
    let fraction = position - position.floor();

    let lower = sorted[below];
    match sorted.get(below + 1) {
        Some(upper) if fraction > 0.0 => Ok(lower + (upper - lower) * fraction),
        _ => Ok(lower),
    }
}

/// Result of the relative scheme for one series
#[derive(Debug, Clone, PartialEq)]
pub struct RelativeClassification {
    pub normalized: Vec<f64>,
    pub bounds: ClassificationBounds,
    pub labels: Vec<CategoryLabel>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeNormalizer {
    quantile_low: f64,
    quantile_high: f64,
    policy: DegeneratePolicy,
}

impl Default for RelativeNormalizer {
    fn default() -> Self {
        Self {
            quantile_low: DEFAULT_QUANTILE_LOW,
            quantile_high: DEFAULT_QUANTILE_HIGH,
            policy: DegeneratePolicy::default(),
        }
    }
}

impl RelativeNormalizer {
    pub fn new(quantile_low: f64, quantile_high: f64, policy: DegeneratePolicy) -> AnalysisResult<Self> {
        for level in [quantile_low, quantile_high] {
            if !(0.0..=1.0).contains(&level) {
                return Err(AnalysisError::InvalidQuantile { level });
            }
        }
        if quantile_low > quantile_high {
            return Err(AnalysisError::InvalidBounds {
                lower: quantile_low,
                upper: quantile_high,
            });
        }
        Ok(Self {
            quantile_low,
            quantile_high,
            policy,
        })
    }

    pub fn policy(&self) -> DegeneratePolicy {
        self.policy
    }

    /// Normalize, derive quantile bounds and label every point.
    ///
    /// Series with fewer than two points fail with `InsufficientData`;
    /// callers turn that into the insufficient-data sentinel.
    pub fn classify(&self, series: &PreparedSeries) -> AnalysisResult<RelativeClassification> {
        if series.len() <= 1 {
            return Err(AnalysisError::InsufficientData {
                required: 2,
                actual: series.len(),
            });
        }

        let normalized = match normalize(series) {
            Ok(normalized) => normalized,
            Err(AnalysisError::DegenerateSeries { value }) => match self.policy {
                DegeneratePolicy::Flatten => {
                    debug!("Constant series at {}, flattening to zero", value);
                    vec![0.0; series.len()]
                }
                DegeneratePolicy::Reject => {
                    return Err(AnalysisError::DegenerateSeries { value });
                }
            },
            Err(e) => return Err(e),
        };

        let lower = quantile(&normalized, self.quantile_low)?;
        let upper = quantile(&normalized, self.quantile_high)?;
        let bounds = ClassificationBounds::new(lower, upper)?;
        let labels = classify_values(&normalized, &bounds);

        debug!(
            "Relative bounds q{}={:.4}, q{}={:.4} over {} points",
            self.quantile_low,
            lower,
            self.quantile_high,
            upper,
            normalized.len()
        );

        Ok(RelativeClassification {
            normalized,
            bounds,
            labels,
        })
    }
}

fn min_max(series: &PreparedSeries) -> AnalysisResult<(f64, f64)> {
    if series.is_empty() {
        return Err(AnalysisError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    Ok(series
        .values()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
            (min.min(v), max.max(v))
        }))
}
