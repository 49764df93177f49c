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

use gridpulse_core::FuelMix;
use plotters::prelude::*;

use crate::error::{ChartError, ChartResult};
use crate::style::{ChartOptions, fuel_color};

/// Percentage share per fuel as labelled bars
pub fn fuel_mix_svg(mix: &FuelMix, options: &ChartOptions) -> ChartResult<String> {
    let shares = mix.chart_shares();
    if shares.is_empty() {
        return Err(ChartError::NoData);
    }

    let labels: Vec<String> = shares.iter().map(|s| s.source.label().to_owned()).collect();
    let y_max = shares
        .iter()
        .map(|s| s.percentage)
        .fold(0.0_f64, f64::max)
        .max(10.0)
        * 1.15;

    let caption = format!(
        "Fuel Mix Distribution (%) - {}",
        mix.effective_time.format("%d/%m/%Y %H:%M")
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
            .build_cartesian_2d((0..shares.len()).into_segmented(), 0.0..y_max)?;

        // One label per bar, at the centre of its segment
        let label_for = |value: &SegmentValue<usize>| match value {
            SegmentValue::CenterOf(index) => labels.get(*index).cloned().unwrap_or_default(),
            SegmentValue::Exact(_) | SegmentValue::Last => String::new(),
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(shares.len() + 1)
            .y_desc("Share (%)")
            .x_label_formatter(&label_for)
            .label_style(("sans-serif", 13))
            .draw()?;

        chart.draw_series(shares.iter().enumerate().map(|(i, share)| {
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0.0),
                    (SegmentValue::Exact(i + 1), share.percentage),
                ],
                fuel_color(share.source).filled(),
            );
            bar.set_margin(0, 0, 8, 8);
            bar
        }))?;

        chart.draw_series(shares.iter().enumerate().map(|(i, share)| {
            Text::new(
                format!("{:.1}%", share.percentage),
                (SegmentValue::CenterOf(i), share.percentage + y_max * 0.03),
                ("sans-serif", 14),
            )
        }))?;

        root.present()?;
    }

    Ok(svg_data)
}
