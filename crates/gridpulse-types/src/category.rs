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

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AnalysisError, AnalysisResult};

/// Ordinal intensity category, `Low < Medium < High`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CategoryLabel {
    Low,
    Medium,
    High,
}

impl CategoryLabel {
    /// Fixed display order used by every summary
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Traffic-light marker shown next to the category in text summaries
    pub fn marker(self) -> &'static str {
        match self {
            Self::Low => "🟢",
            Self::Medium => "🟡",
            Self::High => "🔴",
        }
    }
}

impl fmt::Display for CategoryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification scheme a label column was produced by
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    /// Bounds taken from the previous day's min/max
    PriorPeriod,
    /// Fixed EU reference bounds
    EuStandard,
    /// Quantiles of the min/max normalized series itself
    Relative,
}

impl Scheme {
    pub const ALL: [Self; 3] = [Self::PriorPeriod, Self::EuStandard, Self::Relative];

    pub fn title(self) -> &'static str {
        match self {
            Self::PriorPeriod => "Compared to Yesterday",
            Self::EuStandard => "EU Standards Analysis",
            Self::Relative => "Data Trend",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Inclusive `[lower, upper]` band that classifies as Medium
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationBounds {
    lower: f64,
    upper: f64,
}

impl ClassificationBounds {
    /// EU reference thresholds for CO2 intensity (gCO2/kWh)
    pub const EU_STANDARD: Self = Self {
        lower: 250.0,
        upper: 500.0,
    };

    pub fn new(lower: f64, upper: f64) -> AnalysisResult<Self> {
        if !lower.is_finite() || !upper.is_finite() || lower > upper {
            return Err(AnalysisError::InvalidBounds { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }
}
