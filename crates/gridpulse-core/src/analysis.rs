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

//! Carbon intensity analysis pipeline.
//!
//! Runs the three classification schemes over one prepared forecast. The
//! schemes are independent: a missing prior day only disables the
//! prior-period comparison, a too-short series only disables the relative
//! trend.

use chrono::NaiveDate;
use gridpulse_types::{
    AnalysisError, AnalysisResult, ClassificationBounds, ClassifiedSeries, PeriodReport,
    PreparedSeries, RawSeries, Scheme,
};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::classifier::classify_series;
use crate::normalizer::{
    DEFAULT_QUANTILE_HIGH, DEFAULT_QUANTILE_LOW, DegeneratePolicy, RelativeNormalizer,
};
use crate::preparer::prepare;
use crate::runs::summarize_runs;
use crate::statistics::{SeriesStatistics, summarize};

/// Tunable thresholds for the analysis pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    #[serde(default = "default_eu_lower")]
    pub eu_lower: f64,
    #[serde(default = "default_eu_upper")]
    pub eu_upper: f64,
    #[serde(default = "default_quantile_low")]
    pub quantile_low: f64,
    #[serde(default = "default_quantile_high")]
    pub quantile_high: f64,
    #[serde(default)]
    pub degenerate_policy: DegeneratePolicy,
    /// Noun used in rendered summaries, e.g. "Emission"
    #[serde(default = "default_metric_label")]
    pub metric_label: String,
}

fn default_eu_lower() -> f64 {
    ClassificationBounds::EU_STANDARD.lower()
}

fn default_eu_upper() -> f64 {
    ClassificationBounds::EU_STANDARD.upper()
}

fn default_quantile_low() -> f64 {
    DEFAULT_QUANTILE_LOW
}

fn default_quantile_high() -> f64 {
    DEFAULT_QUANTILE_HIGH
}

fn default_metric_label() -> String {
    "Emission".to_owned()
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            eu_lower: default_eu_lower(),
            eu_upper: default_eu_upper(),
            quantile_low: default_quantile_low(),
            quantile_high: default_quantile_high(),
            degenerate_policy: DegeneratePolicy::default(),
            metric_label: default_metric_label(),
        }
    }
}

/// Result of one classification scheme
#[derive(Debug, Clone, PartialEq)]
pub struct SchemeOutcome {
    pub scheme: Scheme,
    pub result: AnalysisResult<PeriodReport>,
}

impl SchemeOutcome {
    pub fn report(&self) -> Option<&PeriodReport> {
        self.result.as_ref().ok()
    }

    /// Summary text, or the failure reason when the scheme could not run
    pub fn render(&self, metric: &str) -> String {
        match &self.result {
            Ok(report) => report.render(metric),
            Err(e) => format!("Unavailable: {e}"),
        }
    }
}

impl Serialize for SchemeOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SchemeOutcome", 3)?;
        state.serialize_field("scheme", &self.scheme)?;
        match &self.result {
            Ok(report) => {
                state.serialize_field("report", report)?;
                state.skip_field("error")?;
            }
            Err(e) => {
                state.skip_field("report")?;
                state.serialize_field("error", &e.to_string())?;
            }
        }
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntensityReport {
    /// Day of the first forecast point
    pub date: NaiveDate,
    pub series: ClassifiedSeries,
    pub prior_statistics: Option<SeriesStatistics>,
    pub relative_bounds: Option<ClassificationBounds>,
    /// One entry per scheme, in `Scheme::ALL` order
    pub outcomes: Vec<SchemeOutcome>,
}

impl IntensityReport {
    pub fn outcome(&self, scheme: Scheme) -> Option<&SchemeOutcome> {
        self.outcomes.iter().find(|o| o.scheme == scheme)
    }

    /// `dd/mm/YYYY`, as quoted in the guidance prompt
    pub fn date_label(&self) -> String {
        self.date.format("%d/%m/%Y").to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntensityAnalyzer {
    eu_bounds: ClassificationBounds,
    relative: RelativeNormalizer,
}

impl Default for IntensityAnalyzer {
    fn default() -> Self {
        Self {
            eu_bounds: ClassificationBounds::EU_STANDARD,
            relative: RelativeNormalizer::default(),
        }
    }
}

impl IntensityAnalyzer {
    pub fn new(settings: &AnalysisSettings) -> AnalysisResult<Self> {
        Ok(Self {
            eu_bounds: ClassificationBounds::new(settings.eu_lower, settings.eu_upper)?,
            relative: RelativeNormalizer::new(
                settings.quantile_low,
                settings.quantile_high,
                settings.degenerate_policy,
            )?,
        })
    }

    /// Classify a forecast against the prior day, the EU bounds and itself.
    ///
    /// Fails only when the forecast has no usable point at all; every
    /// per-scheme failure is reported in the matching `SchemeOutcome`.
    pub fn analyze(
        &self,
        forecast: RawSeries,
        prior_period: Option<RawSeries>,
    ) -> AnalysisResult<IntensityReport> {
        let prepared = prepare(forecast)?;
        let Some(first) = prepared.first() else {
            warn!("Forecast contains no usable values");
            return Err(AnalysisError::InsufficientData {
                required: 1,
                actual: 0,
            });
        };
        let date = first.timestamp.date();

        info!(
            "📊 [ANALYSIS] Classifying {} forecast points for {}",
            prepared.len(),
            date
        );

        let prior_statistics = match prior_period.map(prepare).transpose()? {
            Some(prior) => summarize(&prior).ok(),
            None => None,
        };
        if prior_statistics.is_none() {
            warn!("Prior period statistics unavailable, skipping comparison with yesterday");
        }

        let mut series = ClassifiedSeries::from_prepared(&prepared);
        let mut outcomes = Vec::with_capacity(Scheme::ALL.len());

        let prior_bounds = prior_statistics
            .as_ref()
            .ok_or(AnalysisError::MissingBounds)
            .and_then(SeriesStatistics::bounds);
        let (next, outcome) = apply_bounds(series, &prepared, Scheme::PriorPeriod, prior_bounds)?;
        series = next;
        outcomes.push(outcome);

        let (next, outcome) =
            apply_bounds(series, &prepared, Scheme::EuStandard, Ok(self.eu_bounds))?;
        series = next;
        outcomes.push(outcome);

        let (next, outcome, relative_bounds) = self.relative_scheme(series, &prepared)?;
        series = next;
        outcomes.push(outcome);

        Ok(IntensityReport {
            date,
            series,
            prior_statistics,
            relative_bounds,
            outcomes,
        })
    }

    fn relative_scheme(
        &self,
        series: ClassifiedSeries,
        prepared: &PreparedSeries,
    ) -> AnalysisResult<(ClassifiedSeries, SchemeOutcome, Option<ClassificationBounds>)> {
        let scheme = Scheme::Relative;
        match self.relative.classify(prepared) {
            Ok(relative) => {
                let series = series
                    .with_normalized(relative.normalized)?
                    .with_labels(scheme, relative.labels)?;
                let summary = summarize_runs(&series, scheme)?;
                let outcome = SchemeOutcome {
                    scheme,
                    result: Ok(PeriodReport::Summary(summary)),
                };
                Ok((series, outcome, Some(relative.bounds)))
            }
            Err(AnalysisError::InsufficientData { .. }) => {
                debug!("Relative trend skipped: {} point(s)", prepared.len());
                let outcome = SchemeOutcome {
                    scheme,
                    result: Ok(PeriodReport::InsufficientData),
                };
                Ok((series, outcome, None))
            }
            Err(e) => {
                warn!("Relative trend unavailable: {}", e);
                let outcome = SchemeOutcome {
                    scheme,
                    result: Err(e),
                };
                Ok((series, outcome, None))
            }
        }
    }
}

fn apply_bounds(
    series: ClassifiedSeries,
    prepared: &PreparedSeries,
    scheme: Scheme,
    bounds: AnalysisResult<ClassificationBounds>,
) -> AnalysisResult<(ClassifiedSeries, SchemeOutcome)> {
    let bounds = match bounds {
        Ok(bounds) => bounds,
        Err(e) => {
            debug!("Scheme '{}' skipped: {}", scheme, e);
            let outcome = SchemeOutcome {
                scheme,
                result: Err(e),
            };
            return Ok((series, outcome));
        }
    };

    let series = series.with_labels(scheme, classify_series(prepared, &bounds))?;
    let summary = summarize_runs(&series, scheme)?;
    debug!(
        "Scheme '{}' classified with bounds [{}, {}]",
        scheme,
        bounds.lower(),
        bounds.upper()
    );

    let outcome = SchemeOutcome {
        scheme,
        result: Ok(PeriodReport::Summary(summary)),
    };
    Ok((series, outcome))
}

/// Relative-only summary for an arbitrary metric series (demand, wind)
pub fn relative_report(
    normalizer: &RelativeNormalizer,
    raw: RawSeries,
) -> AnalysisResult<(PreparedSeries, PeriodReport)> {
    let prepared = prepare(raw)?;
    match normalizer.classify(&prepared) {
        Ok(relative) => {
            let labeled: Vec<_> = prepared
                .timestamps()
                .zip(relative.labels)
                .collect();
            let summary = crate::runs::summarize_labels(&labeled);
            Ok((prepared, PeriodReport::Summary(summary)))
        }
        Err(AnalysisError::InsufficientData { .. }) => Ok((prepared, PeriodReport::InsufficientData)),
        Err(e) => Err(e),
    }
}
