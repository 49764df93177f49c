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

//! Text, JSON and CSV renderings of command results.

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Attribute, Cell, Color, Table, presets::UTF8_FULL};
use gridpulse_core::{SchemeOutcome, SeriesStatistics};
use gridpulse_types::{CategoryLabel, ClassifiedSeries, Scheme};
use serde::Serialize;

use crate::commands::{CarbonBrief, DemandWindReport, FuelMixBrief, describe_analysis_error};

/// Formatter for terminal output
#[derive(Debug)]
pub struct TableFormatter;

/// Formatter for CSV export
#[derive(Debug)]
pub struct CsvFormatter;

impl TableFormatter {
    /// Scheme summaries followed by a per-point table
    pub fn format_carbon(brief: &CarbonBrief, metric: &str) -> String {
        let report = &brief.report;
        let mut output = String::new();

        output.push_str(&format!(
            "🌍 CO2 Emissions Forecast for {}\n\n",
            report.date_label()
        ));

        for outcome in &report.outcomes {
            output.push_str(&format!("{}:\n", outcome.scheme.title()));
            output.push_str(&render_outcome(outcome, metric));
            output.push('\n');
        }

        if let Some(stats) = &report.prior_statistics {
            output.push_str(&format!(
                "Yesterday: mean {:.0}, min {:.0} at {}, max {:.0} at {} gCO2/kWh\n\n",
                stats.mean,
                stats.min,
                stats.time_of_min.format("%H:%M"),
                stats.max,
                stats.time_of_max.format("%H:%M"),
            ));
        }

        output.push_str(&Self::format_series(&report.series).to_string());
        output.push('\n');

        if let Some(guidance) = &brief.guidance {
            output.push_str(&format!("\n{guidance}\n"));
        }

        output
    }

    pub fn format_series(series: &ClassifiedSeries) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);

        let mut header = vec![
            Cell::new("Time").add_attribute(Attribute::Bold),
            Cell::new("gCO2/kWh").add_attribute(Attribute::Bold),
        ];
        header.extend(
            series
                .schemes()
                .iter()
                .map(|scheme| Cell::new(scheme.title()).add_attribute(Attribute::Bold)),
        );
        table.set_header(header);

        for point in series.points() {
            let mut row = vec![
                Cell::new(point.timestamp.format("%H:%M")),
                Cell::new(format!("{:.1}", point.value)),
            ];
            row.extend(
                series
                    .schemes()
                    .iter()
                    .map(|scheme| category_cell(point.labels.get(*scheme))),
            );
            table.add_row(row);
        }

        table
    }

    pub fn format_fuel_mix(brief: &FuelMixBrief) -> String {
        let mix = &brief.mix;
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            Cell::new("Source").add_attribute(Attribute::Bold),
            Cell::new("MW").add_attribute(Attribute::Bold),
            Cell::new("Share (%)").add_attribute(Attribute::Bold),
        ]);
        for share in &mix.shares {
            table.add_row(vec![
                Cell::new(share.source.label()),
                Cell::new(format!("{:.0}", share.value)),
                Cell::new(format!("{:.1}", share.percentage)),
            ]);
        }

        let mut output = format!(
            "⚡ Fuel mix at {}\n",
            mix.effective_time.format("%d/%m/%Y %H:%M")
        );
        output.push_str(&table.to_string());
        output.push_str(&format!("\nThe grid is {} electricity.\n", mix.net_import));

        if let Some(guidance) = &brief.guidance {
            output.push_str(&format!("\n{guidance}\n"));
        }
        output
    }

    pub fn format_demand_wind(report: &DemandWindReport, metric: &str) -> String {
        let contribution = &report.contribution;
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            Cell::new("Series").add_attribute(Attribute::Bold),
            Cell::new("Mean (MW)").add_attribute(Attribute::Bold),
            Cell::new("Min (MW)").add_attribute(Attribute::Bold),
            Cell::new("Max (MW)").add_attribute(Attribute::Bold),
        ]);
        table.add_row(stats_row("Demand", &contribution.demand));
        table.add_row(stats_row("Wind", &contribution.wind));

        let mut output = table.to_string();
        output.push('\n');
        match contribution.wind_share_percent {
            Some(share) => {
                output.push_str(&format!(
                    "Wind covered {share:.1}% of demand over {} shared readings.\n",
                    contribution.aligned_points
                ));
            }
            None => output.push_str("Wind share unavailable: no demand over shared readings.\n"),
        }

        output.push_str("\nDemand trend:\n");
        output.push_str(&report.demand_trend.render(metric));
        output.push_str("\nWind trend:\n");
        output.push_str(&report.wind_trend.render(metric));
        output
    }
}

impl CsvFormatter {
    /// One row per point: value, normalized value and a label per applied scheme
    pub fn write_series(series: &ClassifiedSeries, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        Self::write_records(series, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn write_records<W: std::io::Write>(
        series: &ClassifiedSeries,
        writer: &mut csv::Writer<W>,
    ) -> Result<()> {
        for point in series.points() {
            writer.serialize(CsvRow {
                timestamp: point.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                value: point.value,
                normalized: point.normalized,
                prior_period: point.labels.get(Scheme::PriorPeriod),
                eu_standard: point.labels.get(Scheme::EuStandard),
                relative: point.labels.get(Scheme::Relative),
            })?;
        }
        Ok(())
    }

    #[cfg(test)]
    fn render(series: &ClassifiedSeries) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        Self::write_records(series, &mut writer)?;
        let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!(e.to_string()))?;
        Ok(String::from_utf8(bytes)?)
    }
}

#[derive(Serialize)]
struct CsvRow {
    timestamp: String,
    value: f64,
    normalized: Option<f64>,
    prior_period: Option<CategoryLabel>,
    eu_standard: Option<CategoryLabel>,
    relative: Option<CategoryLabel>,
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

/// Text of an outcome, with failures explained in plain words
pub fn render_outcome(outcome: &SchemeOutcome, metric: &str) -> String {
    match &outcome.result {
        Ok(report) => report.render(metric),
        Err(e) => format!("- {}\n", describe_analysis_error(e)),
    }
}

fn category_cell(label: Option<CategoryLabel>) -> Cell {
    match label {
        Some(category) => Cell::new(format!("{} {}", category.marker(), category)).fg(match category {
            CategoryLabel::Low => Color::Green,
            CategoryLabel::Medium => Color::Yellow,
            CategoryLabel::High => Color::Red,
        }),
        None => Cell::new("-"),
    }
}

fn stats_row(name: &str, stats: &SeriesStatistics) -> Vec<Cell> {
    vec![
        Cell::new(name),
        Cell::new(format!("{:.0}", stats.mean)),
        Cell::new(format!("{:.0} at {}", stats.min, stats.time_of_min.format("%H:%M"))),
        Cell::new(format!("{:.0} at {}", stats.max, stats.time_of_max.format("%H:%M"))),
    ]
}
