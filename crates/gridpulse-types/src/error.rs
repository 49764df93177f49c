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

//! Error types shared by every analysis stage

use thiserror::Error;

use crate::category::Scheme;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("not enough data: {actual} usable point(s), at least {required} required")]
    InsufficientData { required: usize, actual: usize },

    #[error("series is constant at {value}, normalization is undefined")]
    DegenerateSeries { value: f64 },

    #[error("comparison bounds unavailable: prior period statistics are missing")]
    MissingBounds,

    #[error("invalid classification bounds: lower {lower}, upper {upper}")]
    InvalidBounds { lower: f64, upper: f64 },

    #[error("invalid quantile level {level} (must be within 0..=1)")]
    InvalidQuantile { level: f64 },

    #[error("timestamp at index {index} is not strictly after its predecessor")]
    UnorderedTimestamps { index: usize },

    #[error("value at index {index} is not a finite number")]
    NonFiniteValue { index: usize },

    #[error("classification scheme '{scheme}' has not been applied to this series")]
    SchemeNotApplied { scheme: Scheme },

    #[error("label column has {actual} entries, series has {expected} points")]
    LabelCountMismatch { expected: usize, actual: usize },
}

pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;
