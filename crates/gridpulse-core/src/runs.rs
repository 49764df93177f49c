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

//! Run-length summaries of labeled series.
//!
//! A single pass over the labels opens a new run whenever the label changes,
//! then each run is rendered as a time range and filed under its category.

use chrono::NaiveDateTime;
use gridpulse_types::{
    AnalysisError, AnalysisResult, CategoryLabel, ClassifiedSeries, PeriodSummary, Run, Scheme,
};

/// Maximal runs of identical labels, in timestamp order
pub fn detect_runs(labeled: &[(NaiveDateTime, CategoryLabel)]) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut current: Option<Run> = None;

    for &(timestamp, category) in labeled {
        match current.as_mut() {
            Some(run) if run.category == category => {
                run.end = timestamp;
                run.len += 1;
            }
            _ => {
                if let Some(finished) = current.take() {
                    runs.push(finished);
                }
                current = Some(Run {
                    category,
                    start: timestamp,
                    end: timestamp,
                    len: 1,
                });
            }
        }
    }

    if let Some(finished) = current {
        runs.push(finished);
    }
    runs
}

/// Render runs into per-category range lists (Low, Medium, High)
pub fn summarize_labels(labeled: &[(NaiveDateTime, CategoryLabel)]) -> PeriodSummary {
    let mut summary = PeriodSummary::new();
    for run in detect_runs(labeled) {
        summary.push(run.category, run.render());
    }
    summary
}

pub fn summarize_runs(series: &ClassifiedSeries, scheme: Scheme) -> AnalysisResult<PeriodSummary> {
    let labeled = series
        .labeled(scheme)
        .ok_or(AnalysisError::SchemeNotApplied { scheme })?;
    Ok(summarize_labels(&labeled))
}

pub fn runs_for(series: &ClassifiedSeries, scheme: Scheme) -> AnalysisResult<Vec<Run>> {
    let labeled = series
        .labeled(scheme)
        .ok_or(AnalysisError::SchemeNotApplied { scheme })?;
    Ok(detect_runs(&labeled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gridpulse_types::CategoryLabel::{High, Low, Medium};

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 25)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn half_hourly(labels: &[CategoryLabel]) -> Vec<(NaiveDateTime, CategoryLabel)> {
        labels
            .iter()
            .enumerate()
            .map(|(i, label)| (at(0, 0) + chrono::Duration::minutes(30 * i as i64), *label))
            .collect()
    }

    #[test]
    fn test_empty_input_has_no_runs() {
        assert!(detect_runs(&[]).is_empty());
        let summary = summarize_labels(&[]);
        assert!(summary.iter().all(|(_, periods)| periods.is_empty()));
    }

    #[test]
    fn test_adjacent_runs_differ() {
        let runs = detect_runs(&half_hourly(&[Low, Low, High, High, Low, Medium]));
        assert_eq!(runs.len(), 4);
        for pair in runs.windows(2) {
            assert_ne!(pair[0].category, pair[1].category);
        }
        assert_eq!(runs[0].len, 2);
        assert_eq!(runs[0].start, at(0, 0));
        assert_eq!(runs[0].end, at(0, 30));
        assert_eq!(runs[3].start, runs[3].end);
    }

    #[test]
    fn test_runs_cover_every_timestamp_once() {
        let labels = [Medium, Low, Low, Low, High, Medium, Medium, Low, High, High];
        let labeled = half_hourly(&labels);
        let runs = detect_runs(&labeled);

        assert_eq!(runs.iter().map(|r| r.len).sum::<usize>(), labels.len());
        for category in CategoryLabel::ALL {
            let covered: usize = runs
                .iter()
                .filter(|r| r.category == category)
                .map(|r| r.len)
                .sum();
            let counted = labels.iter().filter(|l| **l == category).count();
            assert_eq!(covered, counted, "{category}");
        }
    }

    #[test]
    fn test_summary_groups_by_category_in_fixed_order() {
        let summary = summarize_labels(&half_hourly(&[High, Low, Low, High, Medium]));
        assert_eq!(summary.periods(Low), ["00:30 to 01:00"]);
        assert_eq!(summary.periods(Medium), ["02:00"]);
        assert_eq!(summary.periods(High), ["00:00", "01:30"]);

        let order: Vec<_> = summary.iter().map(|(c, _)| c).collect();
        assert_eq!(order, vec![Low, Medium, High]);
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let labeled = half_hourly(&[Low, Medium, Medium, High, Low]);
        assert_eq!(summarize_labels(&labeled), summarize_labels(&labeled));
    }

    #[test]
    fn test_summarize_runs_requires_scheme() {
        let series = ClassifiedSeries::default();
        assert_eq!(
            summarize_runs(&series, Scheme::Relative),
            Err(AnalysisError::SchemeNotApplied {
                scheme: Scheme::Relative
            })
        );
    }
}
