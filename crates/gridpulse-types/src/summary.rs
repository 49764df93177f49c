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
use serde::Serialize;

use crate::category::CategoryLabel;

/// Placeholder rendered for a category without any run
pub const NO_PERIODS_PLACEHOLDER: &str = "No specific periods identified.";

/// Sentinel returned instead of a summary when a series has at most one point
pub const INSUFFICIENT_DATA_MESSAGE: &str =
    "Sorry, we do not have enough data to process data trend analysis.";

/// Maximal span of consecutive timestamps sharing one label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Run {
    pub category: CategoryLabel,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Number of timestamps covered
    pub len: usize,
}

impl Run {
    /// `"HH:MM"` for a single instant, `"HH:MM to HH:MM"` otherwise
    pub fn render(&self) -> String {
        let start = self.start.format("%H:%M");
        if self.start == self.end {
            start.to_string()
        } else {
            format!("{start} to {}", self.end.format("%H:%M"))
        }
    }
}

/// Rendered time ranges per category, always holding all three categories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    #[serde(rename = "Low")]
    low: Vec<String>,
    #[serde(rename = "Medium")]
    medium: Vec<String>,
    #[serde(rename = "High")]
    high: Vec<String>,
}

impl PeriodSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, category: CategoryLabel, range: String) {
        self.slot_mut(category).push(range);
    }

    pub fn periods(&self, category: CategoryLabel) -> &[String] {
        match category {
            CategoryLabel::Low => &self.low,
            CategoryLabel::Medium => &self.medium,
            CategoryLabel::High => &self.high,
        }
    }

    /// Categories in display order (Low, Medium, High)
    pub fn iter(&self) -> impl Iterator<Item = (CategoryLabel, &[String])> {
        CategoryLabel::ALL
            .into_iter()
            .map(|category| (category, self.periods(category)))
    }

    /// One line per category, e.g. `- 🟢 Low Emission: 00:00 to 01:00, 04:00`
    pub fn render(&self, metric: &str) -> String {
        let mut text = String::new();
        for (category, periods) in self.iter() {
            let body = if periods.is_empty() {
                NO_PERIODS_PLACEHOLDER.to_owned()
            } else {
                periods.join(", ")
            };
            text.push_str(&format!("- {} {category} {metric}: {body}\n", category.marker()));
        }
        text
    }

    fn slot_mut(&mut self, category: CategoryLabel) -> &mut Vec<String> {
        match category {
            CategoryLabel::Low => &mut self.low,
            CategoryLabel::Medium => &mut self.medium,
            CategoryLabel::High => &mut self.high,
        }
    }
}

/// Outcome of summarizing one scheme
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "periods", rename_all = "snake_case")]
pub enum PeriodReport {
    Summary(PeriodSummary),
    /// The series had at most one usable point
    InsufficientData,
}

impl PeriodReport {
    pub fn summary(&self) -> Option<&PeriodSummary> {
        match self {
            Self::Summary(summary) => Some(summary),
            Self::InsufficientData => None,
        }
    }

    pub fn render(&self, metric: &str) -> String {
        match self {
            Self::Summary(summary) => summary.render(metric),
            Self::InsufficientData => INSUFFICIENT_DATA_MESSAGE.to_owned(),
        }
    }
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
    fn test_run_render() {
        let single = Run {
            category: CategoryLabel::Low,
            start: at(4, 0),
            end: at(4, 0),
            len: 1,
        };
        assert_eq!(single.render(), "04:00");

        let span = Run {
            category: CategoryLabel::Low,
            start: at(0, 0),
            end: at(1, 30),
            len: 4,
        };
        assert_eq!(span.render(), "00:00 to 01:30");
    }

    #[test]
    fn test_render_includes_placeholder_for_empty_categories() {
        let mut summary = PeriodSummary::new();
        summary.push(CategoryLabel::High, "03:00".to_owned());
        summary.push(CategoryLabel::Low, "00:00 to 01:00".to_owned());
        summary.push(CategoryLabel::Low, "04:00".to_owned());

        assert_eq!(
            summary.render("Emission"),
            "- 🟢 Low Emission: 00:00 to 01:00, 04:00\n\
             - 🟡 Medium Emission: No specific periods identified.\n\
             - 🔴 High Emission: 03:00\n"
        );
    }

    #[test]
    fn test_summary_serializes_all_three_keys() {
        let json = serde_json::to_value(PeriodSummary::new()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"Low": [], "Medium": [], "High": []})
        );
    }

    #[test]
    fn test_insufficient_data_renders_sentinel() {
        let report = PeriodReport::InsufficientData;
        assert!(report.summary().is_none());
        assert_eq!(report.render("Emission"), INSUFFICIENT_DATA_MESSAGE);
    }
}
