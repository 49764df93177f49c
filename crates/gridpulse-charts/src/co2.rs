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

use chrono::{DateTime, Duration, Utc};
use gridpulse_types::{CategoryLabel, ClassifiedSeries, Scheme};
use plotters::prelude::*;

use crate::error::{ChartError, ChartResult};
use crate::style::{ChartOptions, TREND_LINE, category_color, intensity_color};

/// CO2 intensity trend with one category marker per point.
///
/// The value line carries points coloured along the intensity scale; the
/// markers along the bottom show the labels of `scheme`.
pub fn co2_trend_svg(
    series: &ClassifiedSeries,
    scheme: Scheme,
    options: &ChartOptions,
) -> ChartResult<String> {
    let points = series.points();
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Err(ChartError::NoData);
    };
    if !series.has_scheme(scheme) {
        return Err(ChartError::MissingLabels(scheme));
    }

    let start: DateTime<Utc> = first.timestamp.and_utc();
    let mut end: DateTime<Utc> = last.timestamp.and_utc();
    if end <= start {
        end = start + Duration::minutes(30);
    }

    let (min, max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.value), hi.max(p.value))
        });
    let y_min = (min - 50.0).max(0.0).min(100.0);
    let y_max = max + 100.0;
    let marker_y = y_min + (y_max - y_min) * 0.04;

    let caption = format!(
        "CO2 intensity forecast for {}",
        first.timestamp.format("%A %d/%m/%Y")
    );

    let mut svg_data = String::new();
    {
        let root =
            SVGBackend::with_string(&mut svg_data, (options.width, options.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&caption, ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(start..end, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_desc("Time")
            .y_desc("gCO2/kWh")
            .x_labels(12)
            .y_labels(8)
            .x_label_formatter(&|dt| dt.format("%H:%M").to_string())
            .label_style(("sans-serif", 12))
            .draw()?;

        chart
            .draw_series(LineSeries::new(
                points.iter().map(|p| (p.timestamp.and_utc(), p.value)),
                TREND_LINE.mix(0.6).stroke_width(2),
            ))?
            .label("Intensity")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], TREND_LINE.stroke_width(2)));

        chart.draw_series(points.iter().map(|p| {
            Circle::new(
                (p.timestamp.and_utc(), p.value),
                4,
                intensity_color(p.value).filled(),
            )
        }))?;

        for category in CategoryLabel::ALL {
            let color = category_color(category);
            chart
                .draw_series(
                    points
                        .iter()
                        .filter(|p| p.labels.get(scheme) == Some(category))
                        .map(|p| Circle::new((p.timestamp.and_utc(), marker_y), 5, color.filled())),
                )?
                .label(category.as_str())
                .legend(move |(x, y)| Circle::new((x + 10, y), 5, color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .label_font(("sans-serif", 12))
            .draw()?;

        root.present()?;
    }

    Ok(svg_data)
}
