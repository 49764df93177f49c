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

pub mod category;
pub mod classified;
pub mod error;
pub mod series;
pub mod summary;

// Re-export common types for convenience
pub use category::{CategoryLabel, ClassificationBounds, Scheme};
pub use classified::{ClassifiedPoint, ClassifiedSeries, SchemeLabels};
pub use error::{AnalysisError, AnalysisResult};
pub use series::{PreparedSeries, RawSeries, SeriesPoint, TimeSeriesPoint};
pub use summary::{
    INSUFFICIENT_DATA_MESSAGE, NO_PERIODS_PLACEHOLDER, PeriodReport, PeriodSummary, Run,
};
