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

//! Aggregate statistics over prepared series

use chrono::NaiveDateTime;
use gridpulse_types::{AnalysisError, AnalysisResult, ClassificationBounds, PreparedSeries};
use serde::Serialize;

/// Mean/min/max of a prepared series together with when the extremes occur
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesStatistics {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// First timestamp carrying the minimum
    pub time_of_min: NaiveDateTime,
    /// First timestamp carrying the maximum
    pub time_of_max: NaiveDateTime,
    pub count: usize,
}

impl SeriesStatistics {
    /// Prior-period comparison bounds: `[min, max]`
    pub fn bounds(&self) -> AnalysisResult<ClassificationBounds> {
        ClassificationBounds::new(self.min, self.max)
    }
}

pub fn summarize(series: &PreparedSeries) -> AnalysisResult<SeriesStatistics> {
    let Some(first) = series.first() else {
        return Err(AnalysisError::InsufficientData {
            required: 1,
            actual: 0,
        });
    };

    let mut stats = SeriesStatistics {
        mean: 0.0,
        min: first.value,
        max: first.value,
        time_of_min: first.timestamp,
        time_of_max: first.timestamp,
        count: series.len(),
    };

    let mut sum = 0.0;
    for point in series.points() {
        sum += point.value;
        if point.value < stats.min {
            stats.min = point.value;
            stats.time_of_min = point.timestamp;
        }
        if point.value > stats.max {
            stats.max = point.value;
            stats.time_of_max = point.timestamp;
        }
    }
    stats.mean = sum / series.len() as f64;

    Ok(stats)
}

/// Timestamps present in both series, with their paired values
pub fn align(left: &PreparedSeries, right: &PreparedSeries) -> Vec<(NaiveDateTime, f64, f64)> {
    left.points()
        .iter()
        .filter_map(|p| {
            right
                .value_at(p.timestamp)
                .map(|other| (p.timestamp, p.value, other))
        })
        .collect()
}

/// Wind generation set against system demand over the shared timestamps
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindContribution {
    pub demand: SeriesStatistics,
    pub wind: SeriesStatistics,
    /// Share of summed demand covered by summed wind output, in percent
    pub wind_share_percent: Option<f64>,
    pub aligned_points: usize,
}

pub fn wind_contribution(
    demand: &PreparedSeries,
    wind: &PreparedSeries,
) -> AnalysisResult<WindContribution> {
    let demand_stats = summarize(demand)?;
    let wind_stats = summarize(wind)?;

    let aligned = align(demand, wind);
    let (demand_total, wind_total) = aligned
        .iter()
        .fold((0.0, 0.0), |(d, w), (_, demand, wind)| (d + demand, w + wind));
    let wind_share_percent = (demand_total > 0.0).then(|| wind_total / demand_total * 100.0);

    Ok(WindContribution {
        demand: demand_stats,
        wind: wind_stats,
        wind_share_percent,
        aligned_points: aligned.len(),
    })
}
