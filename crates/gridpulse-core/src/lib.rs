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

pub mod analysis;
pub mod classifier;
pub mod fuel_mix;
pub mod guidance;
pub mod normalizer;
pub mod preparer;
pub mod runs;
pub mod statistics;

pub use analysis::{
    AnalysisSettings, IntensityAnalyzer, IntensityReport, SchemeOutcome, relative_report,
};
pub use classifier::{classify, classify_series, classify_values, classify_with};
pub use fuel_mix::{
    FuelMix, FuelMixError, FuelMixRecord, FuelShare, FuelSource, NetImportStatus, compute_fuel_mix,
};
pub use guidance::{carbon_prompt, carbon_prompt_for, extract_energy_actions, fuel_mix_prompt};
pub use normalizer::{DegeneratePolicy, RelativeClassification, RelativeNormalizer, normalize, quantile};
pub use preparer::prepare;
pub use runs::{detect_runs, runs_for, summarize_labels, summarize_runs};
pub use statistics::{SeriesStatistics, WindContribution, align, summarize, wind_contribution};
