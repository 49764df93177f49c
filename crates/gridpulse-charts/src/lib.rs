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

//! SVG rendering of analysis results.
//!
//! Naive grid-local timestamps are placed on the time axis as if they were
//! UTC, so axis labels show the grid's wall clock.

pub mod co2;
pub mod demand_wind;
pub mod error;
pub mod fuel_mix;
pub mod style;

pub use co2::co2_trend_svg;
pub use demand_wind::{demand_wind_svg, tick_interval, tick_marks};
pub use error::{ChartError, ChartResult};
pub use fuel_mix::fuel_mix_svg;
pub use style::ChartOptions;
