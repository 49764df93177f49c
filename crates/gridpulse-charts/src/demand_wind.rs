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

use chrono::{Duration, NaiveDateTime};
use gridpulse_core::align;
use gridpulse_types::PreparedSeries;
use plotters::prelude::*;

use crate::error::{ChartError, ChartResult};
use crate::style::{ChartOptions, DEMAND_EDGE, DEMAND_FILL, WIND_EDGE, WIND_FILL};

/// Axis tick spacing for a data span
pub fn tick_interval(span: Duration) -> Duration {
    let seconds = span.num_seconds();
    if seconds <= 2 * 3600 {
        Duration::minutes(30)
    } else if seconds <= 12 * 3600 {
        Duration::hours(3)
    } else if seconds <= 24 * 3600 {
        Duration::hours(4)
    } else {
        Duration::hours(6)
    }
}

/// Ticks from `start` in steps of `interval`, the last one pinned to `end`
pub fn tick_marks(start: NaiveDateTime, end: NaiveDateTime, interval: Duration) -> Vec<NaiveDateTime> {
    if interval <= Duration::zero() || end <= start {
        return vec![start];
    }

    let mut ticks = vec![start];
    let mut current = start;
    while current <= end {
        current += interval;
        ticks.push(current);
    }
    if let Some(last) = ticks.last_mut()
        && *last > end
    {
        *last = end;
    }
    ticks.dedup();
    ticks
}

/// Demand and wind output as stacked areas over their shared timestamps
pub fn demand_wind_svg(
    demand: &PreparedSeries,
    wind: &PreparedSeries,
    options: &ChartOptions,
) -> ChartResult<String> {
    let aligned = align(demand, wind);
    let (Some(first), Some(last)) = (aligned.first(), aligned.last()) else {
        return Err(ChartError::NoData);
    };

    let start = first.0;
    let end = if last.0 > start {
        last.0
    } else {
        start + Duration::minutes(30)
    };
    let ticks: Vec<_> = tick_marks(start, end, tick_interval(end - start))
        .into_iter()
        .map(|t| t.and_utc())
        .collect();

    let peak = aligned
        .iter()
        .fold(0.0_f64, |acc, (_, d, w)| acc.max(*d).max(*w));
    let y_max = if peak > 0.0 { peak * 1.1 } else { 1.0 };

    let mut svg_data = String::new();
    {
        let root =
            SVGBackend::with_string(&mut svg_data, (options.width, options.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Demand vs Wind Energy Contribution", ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(
                (start.and_utc()..end.and_utc()).with_key_points(ticks),
                0.0..y_max,
            )?;

        chart
            .configure_mesh()
            .x_desc("Time")
            .y_desc("Power (MW)")
            .x_label_formatter(&|dt| dt.format("%H:%M").to_string())
            .label_style(("sans-serif", 12))
            .draw()?;

        chart
            .draw_series(
                AreaSeries::new(
                    aligned.iter().map(|(t, d, _)| (t.and_utc(), *d)),
                    0.0,
                    DEMAND_FILL.mix(0.6),
                )
                .border_style(DEMAND_EDGE.stroke_width(2)),
            )?
            .label("Total Demand")
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], DEMAND_FILL.filled()));

        chart
            .draw_series(
                AreaSeries::new(
                    aligned.iter().map(|(t, _, w)| (t.and_utc(), *w)),
                    0.0,
                    WIND_FILL.mix(0.7),
                )
                .border_style(WIND_EDGE.stroke_width(2)),
            )?
            .label("Wind Contribution")
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], WIND_FILL.filled()));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
    }

    Ok(svg_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gridpulse_types::SeriesPoint;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 25)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn quarter_hourly(values: &[f64]) -> PreparedSeries {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, v)| SeriesPoint {
                timestamp: at(0, 0) + Duration::minutes(15 * i as i64),
                value: *v,
            })
            .collect();
        PreparedSeries::new(points).unwrap()
    }

    #[test]
    fn test_tick_interval_by_span() {
        assert_eq!(tick_interval(Duration::minutes(90)), Duration::minutes(30));
        assert_eq!(tick_interval(Duration::hours(2)), Duration::minutes(30));
        assert_eq!(tick_interval(Duration::hours(2) + Duration::minutes(15)), Duration::hours(3));
        assert_eq!(tick_interval(Duration::hours(12)), Duration::hours(3));
        assert_eq!(tick_interval(Duration::hours(20)), Duration::hours(4));
        assert_eq!(tick_interval(Duration::hours(24)), Duration::hours(4));
        assert_eq!(tick_interval(Duration::hours(30)), Duration::hours(6));
    }

    #[test]
    fn test_tick_marks_end_on_data() {
        let ticks = tick_marks(at(0, 0), at(10, 0), Duration::hours(3));
        assert_eq!(ticks, vec![at(0, 0), at(3, 0), at(6, 0), at(9, 0), at(10, 0)]);

        let exact = tick_marks(at(0, 0), at(1, 0), Duration::minutes(30));
        assert_eq!(exact, vec![at(0, 0), at(0, 30), at(1, 0)]);
    }

    #[test]
    fn test_renders_areas() {
        let demand = quarter_hourly(&[4200.0, 4300.0, 4500.0, 4400.0]);
        let wind = quarter_hourly(&[1200.0, 1500.0, 1300.0, 900.0]);
        let svg = demand_wind_svg(&demand, &wind, &ChartOptions::default()).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Demand vs Wind Energy Contribution"));
        assert!(svg.contains("00:30"));
    }

    #[test]
    fn test_no_shared_timestamps() {
        let demand = quarter_hourly(&[4200.0]);
        let result = demand_wind_svg(&demand, &PreparedSeries::default(), &ChartOptions::default());
        assert!(matches!(result, Err(ChartError::NoData)));
    }
}
