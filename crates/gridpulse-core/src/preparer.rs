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

//! Gap handling for series fetched from the grid operator.
//!
//! Forecast and actuals feeds are published up to the end of the requested
//! window, with the not-yet-known tail left empty. Preparation drops that
//! tail and fills the remaining holes by linear interpolation, so every
//! later stage works on fully defined values.

use gridpulse_types::{AnalysisResult, PreparedSeries, RawSeries, SeriesPoint, TimeSeriesPoint};
use tracing::debug;

/// Truncate the missing tail and interpolate internal gaps.
///
/// Interpolation is positional: each missing step between two defined
/// neighbours receives an equal share of the difference, independent of the
/// timestamp spacing. Leading missing values have no left neighbour and are
/// dropped. A series without any defined value yields an empty series.
pub fn prepare(raw: RawSeries) -> AnalysisResult<PreparedSeries> {
    let total = raw.len();
    let points = raw.into_points();

    let defined: Vec<(usize, f64)> = points
        .iter()
        .enumerate()
        .filter_map(|(idx, point)| defined_value(point).map(|value| (idx, value)))
        .collect();

    let Some(&(last_idx, last_value)) = defined.last() else {
        debug!("Series of {} points has no defined value", total);
        return Ok(PreparedSeries::default());
    };

    let mut prepared = Vec::with_capacity(last_idx + 1);
    let mut filled = 0_usize;

    for pair in defined.windows(2) {
        let (left_idx, left_value) = pair[0];
        let (right_idx, right_value) = pair[1];

        prepared.push(SeriesPoint {
            timestamp: points[left_idx].timestamp,
            value: left_value,
        });

        let span = (right_idx - left_idx) as f64;
        for gap_idx in left_idx + 1..right_idx {
            let fraction = (gap_idx - left_idx) as f64 / span;
            prepared.push(SeriesPoint {
                timestamp: points[gap_idx].timestamp,
                value: left_value + (right_value - left_value) * fraction,
            });
            filled += 1;
        }
    }

    prepared.push(SeriesPoint {
        timestamp: points[last_idx].timestamp,
        value: last_value,
    });

    debug!(
        "Prepared series: {} of {} points kept, {} interpolated, {} trailing dropped",
        prepared.len(),
        total,
        filled,
        total - last_idx - 1
    );

    PreparedSeries::new(prepared)
}

/// NaN or infinite readings count as missing
fn defined_value(point: &TimeSeriesPoint) -> Option<f64> {
    point.value.filter(|v| v.is_finite())
}
