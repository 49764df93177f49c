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

//! Data pipelines behind the subcommands.
//!
//! Every pipeline takes its data through `GridDataSource`, so the same code
//! runs against the live dashboard and against in-memory series.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDateTime;
use gridpulse_adapters::eirgrid::types::{DashboardRow, rows_to_series};
use gridpulse_adapters::{GridDataSource, OpenAiClient};
use gridpulse_core::{
    FuelMix, IntensityAnalyzer, IntensityReport, RelativeNormalizer, WindContribution,
    carbon_prompt_for, compute_fuel_mix, extract_energy_actions, fuel_mix_prompt,
    relative_report, wind_contribution,
};
use gridpulse_types::{AnalysisError, PeriodReport, PreparedSeries, RawSeries, Scheme, TimeSeriesPoint};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Analyzed CO2 day plus the optional guidance text
#[derive(Debug, Serialize)]
pub struct CarbonBrief {
    pub source: String,
    pub generated_at: NaiveDateTime,
    pub report: IntensityReport,
    pub guidance: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FuelMixBrief {
    pub mix: FuelMix,
    pub guidance: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DemandWindReport {
    pub demand: PreparedSeries,
    pub wind: PreparedSeries,
    pub contribution: WindContribution,
    /// Relative Low/Medium/High periods of demand
    pub demand_trend: PeriodReport,
    pub wind_trend: PeriodReport,
}

/// Series file: either bare points or a saved dashboard response
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SeriesFile {
    Points(Vec<TimeSeriesPoint>),
    Dashboard(SavedDashboard),
}

/// Saved dashboard response; unlike a live one, `Rows` must be present
#[derive(Debug, Deserialize)]
struct SavedDashboard {
    #[serde(rename = "Rows")]
    rows: Vec<DashboardRow>,
}

/// Fetch today's forecast and the trailing day, then classify.
///
/// A failed prior-day fetch only disables the comparison with yesterday.
pub async fn carbon_report(
    source: &dyn GridDataSource,
    analyzer: &IntensityAnalyzer,
    now: NaiveDateTime,
) -> Result<IntensityReport> {
    info!("📡 [CARBON] Fetching CO2 data from {} at {}", source.name(), now);

    let (forecast, prior) = tokio::join!(
        source.co2_forecast(now),
        source.co2_intensity_prior_day(now)
    );
    let forecast = forecast.context("Failed to fetch the CO2 intensity forecast")?;
    let prior = match prior {
        Ok(series) => Some(series),
        Err(e) => {
            warn!("⚠️ [CARBON] Prior day intensity unavailable: {}", e);
            None
        }
    };

    let report = analyzer
        .analyze(forecast, prior)
        .map_err(|e| anyhow!(describe_analysis_error(&e)))?;
    info!(
        "✅ [CARBON] Classified {} points for {}",
        report.series.len(),
        report.date_label()
    );
    Ok(report)
}

/// Classify series read from files
pub fn offline_report(
    analyzer: &IntensityAnalyzer,
    input: &Path,
    prior: Option<&Path>,
) -> Result<IntensityReport> {
    let forecast = load_series(input)?;
    let prior = prior.map(load_series).transpose()?;
    analyzer
        .analyze(forecast, prior)
        .map_err(|e| anyhow!(describe_analysis_error(&e)))
}

pub fn load_series(path: &Path) -> Result<RawSeries> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_series(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn parse_series(content: &str) -> Result<RawSeries> {
    let series = match serde_json::from_str::<SeriesFile>(content)? {
        SeriesFile::Points(points) => RawSeries::from_unordered(points),
        SeriesFile::Dashboard(response) => rows_to_series(&response.rows)?,
    };
    debug!(
        "Loaded {} points, {} with values",
        series.len(),
        series.defined_count()
    );
    Ok(series)
}

pub async fn fuel_mix_report(source: &dyn GridDataSource, now: NaiveDateTime) -> Result<FuelMix> {
    info!("📡 [FUEL] Fetching fuel mix from {} at {}", source.name(), now);
    let records = source
        .fuel_mix(now)
        .await
        .context("Failed to fetch the fuel mix")?;
    let mix = compute_fuel_mix(&records)
        .with_context(|| format!("No usable fuel mix published for {}", now.format("%H:%M")))?;
    info!(
        "✅ [FUEL] {} sources at {}, grid is {}",
        mix.shares.len(),
        mix.effective_time.format("%H:%M"),
        mix.net_import
    );
    Ok(mix)
}

pub async fn demand_wind_report(
    source: &dyn GridDataSource,
    normalizer: &RelativeNormalizer,
    now: NaiveDateTime,
) -> Result<DemandWindReport> {
    info!("📡 [DEMAND] Fetching demand and wind from {} at {}", source.name(), now);

    let (demand, wind) = tokio::join!(source.demand_today(now), source.wind_today(now));
    let demand = demand.context("Failed to fetch system demand")?;
    let wind = wind.context("Failed to fetch wind generation")?;

    let (demand, demand_trend) =
        relative_report(normalizer, demand).map_err(|e| anyhow!(describe_analysis_error(&e)))?;
    let (wind, wind_trend) =
        relative_report(normalizer, wind).map_err(|e| anyhow!(describe_analysis_error(&e)))?;

    let contribution = wind_contribution(&demand, &wind).map_err(|e| {
        anyhow!(
            "Demand or wind data is not published yet ({})",
            describe_analysis_error(&e)
        )
    })?;
    if contribution.aligned_points == 0 {
        warn!("⚠️ [DEMAND] Demand and wind share no timestamps");
    }

    Ok(DemandWindReport {
        demand,
        wind,
        contribution,
        demand_trend,
        wind_trend,
    })
}

/// Ask the language model for energy-saving actions for an analyzed day.
///
/// Failures are logged and yield `None`; the brief is printed without them.
pub async fn carbon_guidance(client: &OpenAiClient, report: &IntensityReport, metric: &str) -> Option<String> {
    let prompt = carbon_prompt_for(report, metric);
    match client.complete(&prompt).await {
        Ok(reply) => {
            let actions = extract_energy_actions(&reply).unwrap_or(reply.as_str());
            Some(actions.to_owned())
        }
        Err(e) => {
            warn!("⚠️ [LLM] Guidance unavailable: {}", e);
            None
        }
    }
}

pub async fn fuel_mix_guidance(client: &OpenAiClient, mix: &FuelMix) -> Option<String> {
    match client.complete(&fuel_mix_prompt(mix)).await {
        Ok(reply) => Some(reply),
        Err(e) => {
            warn!("⚠️ [LLM] Fuel mix explanation unavailable: {}", e);
            None
        }
    }
}

/// Scheme drawn on the CO2 chart: the data trend when present
pub fn chart_scheme(report: &IntensityReport) -> Scheme {
    if report.series.has_scheme(Scheme::Relative) {
        Scheme::Relative
    } else {
        Scheme::EuStandard
    }
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("💾 Wrote {}", path.display());
    Ok(())
}

/// Plain-language explanation of an analysis failure
pub fn describe_analysis_error(error: &AnalysisError) -> String {
    match error {
        AnalysisError::InsufficientData { actual: 0, .. } => {
            "No values have been published for this period yet, try again later.".to_owned()
        }
        AnalysisError::InsufficientData { required, actual } => format!(
            "Only {actual} value(s) available, at least {required} are needed for this analysis."
        ),
        AnalysisError::DegenerateSeries { value } => format!(
            "Every value equals {value}, so there is no trend to rank. \
             Set analysis.degenerate_policy = \"flatten\" to label such days Medium."
        ),
        AnalysisError::MissingBounds => {
            "Yesterday's data is unavailable, so today cannot be compared with it.".to_owned()
        }
        AnalysisError::InvalidBounds { lower, upper } => format!(
            "The classification band {lower}..{upper} is invalid, check the lower and upper bounds."
        ),
        AnalysisError::InvalidQuantile { level } => {
            format!("Quantile {level} is outside 0..1, check analysis.quantile_low/high.")
        }
        AnalysisError::UnorderedTimestamps { index } => format!(
            "Timestamps must be strictly ascending; point {index} repeats or precedes its predecessor."
        ),
        AnalysisError::NonFiniteValue { index } => {
            format!("Point {index} does not hold a finite number.")
        }
        AnalysisError::SchemeNotApplied { .. } | AnalysisError::LabelCountMismatch { .. } => {
            format!("Internal classification error: {error}")
        }
    }
}
