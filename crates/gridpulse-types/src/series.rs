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

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// One observation as published by the grid operator.
///
/// Timestamps are wall-clock instants local to the grid region. A `None`
/// value means the source has not published the reading (yet); it is never
/// treated as zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub timestamp: NaiveDateTime,
    pub value: Option<f64>,
}

impl TimeSeriesPoint {
    pub fn new(timestamp: NaiveDateTime, value: Option<f64>) -> Self {
        Self { timestamp, value }
    }

    pub fn missing(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            value: None,
        }
    }
}

/// Ordered series straight from a data source, gaps included
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawSeries {
    points: Vec<TimeSeriesPoint>,
}

impl RawSeries {
    /// Build a series from points that are already strictly ascending.
    pub fn new(points: Vec<TimeSeriesPoint>) -> AnalysisResult<Self> {
        check_ordered(points.iter().map(|p| p.timestamp))?;
        Ok(Self { points })
    }

    /// Sort by timestamp, keeping the first point seen for a repeated timestamp.
    pub fn from_unordered(mut points: Vec<TimeSeriesPoint>) -> Self {
        points.sort_by_key(|p| p.timestamp);
        points.dedup_by_key(|p| p.timestamp);
        Self { points }
    }

    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<TimeSeriesPoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the last point carrying a value
    pub fn last_defined_index(&self) -> Option<usize> {
        self.points.iter().rposition(|p| p.value.is_some())
    }

    pub fn defined_count(&self) -> usize {
        self.points.iter().filter(|p| p.value.is_some()).count()
    }
}

/// A fully defined observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

/// Ordered series with every value defined and finite.
///
/// Produced by the series preparer and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PreparedSeries {
    points: Vec<SeriesPoint>,
}

impl PreparedSeries {
    pub fn new(points: Vec<SeriesPoint>) -> AnalysisResult<Self> {
        check_ordered(points.iter().map(|p| p.timestamp))?;
        if let Some(index) = points.iter().position(|p| !p.value.is_finite()) {
            return Err(AnalysisError::NonFiniteValue { index });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    pub fn timestamps(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        self.points.iter().map(|p| p.timestamp)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&SeriesPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    /// Value at an exact timestamp, if the series has one
    pub fn value_at(&self, timestamp: NaiveDateTime) -> Option<f64> {
        self.points
            .binary_search_by_key(&timestamp, |p| p.timestamp)
            .ok()
            .map(|idx| self.points[idx].value)
    }
}

fn check_ordered(timestamps: impl Iterator<Item = NaiveDateTime>) -> AnalysisResult<()> {
    let mut previous: Option<NaiveDateTime> = None;
    for (index, timestamp) in timestamps.enumerate() {
        if let Some(prev) = previous
            && timestamp <= prev
        {
            return Err(AnalysisError::UnorderedTimestamps { index });
        }
        previous = Some(timestamp);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 25)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_raw_series_rejects_duplicate_timestamps() {
        let result = RawSeries::new(vec![
            TimeSeriesPoint::new(at(0, 0), Some(1.0)),
            TimeSeriesPoint::new(at(0, 0), Some(2.0)),
        ]);
        assert_eq!(result, Err(AnalysisError::UnorderedTimestamps { index: 1 }));
    }

    #[test]
    fn test_raw_series_rejects_descending_timestamps() {
        let result = RawSeries::new(vec![
            TimeSeriesPoint::new(at(0, 30), Some(1.0)),
            TimeSeriesPoint::new(at(0, 15), Some(2.0)),
        ]);
        assert!(matches!(
            result,
            Err(AnalysisError::UnorderedTimestamps { index: 1 })
        ));
    }

    #[test]
    fn test_from_unordered_sorts_and_keeps_first_duplicate() {
        let series = RawSeries::from_unordered(vec![
            TimeSeriesPoint::new(at(1, 0), Some(3.0)),
            TimeSeriesPoint::new(at(0, 0), Some(1.0)),
            TimeSeriesPoint::new(at(1, 0), Some(9.0)),
        ]);
        let values: Vec<_> = series.points().iter().map(|p| p.value).collect();
        assert_eq!(values, vec![Some(1.0), Some(3.0)]);
    }

    #[test]
    fn test_last_defined_index() {
        let series = RawSeries::new(vec![
            TimeSeriesPoint::new(at(0, 0), Some(1.0)),
            TimeSeriesPoint::missing(at(0, 15)),
            TimeSeriesPoint::new(at(0, 30), Some(2.0)),
            TimeSeriesPoint::missing(at(0, 45)),
        ])
        .unwrap();
        assert_eq!(series.last_defined_index(), Some(2));
        assert_eq!(series.defined_count(), 2);
        assert_eq!(RawSeries::default().last_defined_index(), None);
    }

    #[test]
    fn test_prepared_series_rejects_nan() {
        let result = PreparedSeries::new(vec![
            SeriesPoint {
                timestamp: at(0, 0),
                value: 1.0,
            },
            SeriesPoint {
                timestamp: at(0, 15),
                value: f64::NAN,
            },
        ]);
        assert_eq!(result, Err(AnalysisError::NonFiniteValue { index: 1 }));
    }

    #[test]
    fn test_value_at() {
        let series = PreparedSeries::new(vec![
            SeriesPoint {
                timestamp: at(0, 0),
                value: 1.0,
            },
            SeriesPoint {
                timestamp: at(0, 15),
                value: 2.0,
            },
        ])
        .unwrap();
        assert_eq!(series.value_at(at(0, 15)), Some(2.0));
        assert_eq!(series.value_at(at(0, 30)), None);
    }
}
