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

use gridpulse_core::FuelSource;
use gridpulse_types::CategoryLabel;
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

/// Output size of rendered charts in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartOptions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 {
    1000
}

fn default_height() -> u32 {
    600
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

pub const TREND_LINE: RGBColor = RGBColor(33, 150, 243);
pub const DEMAND_FILL: RGBColor = RGBColor(135, 206, 235);
pub const DEMAND_EDGE: RGBColor = RGBColor(0, 0, 255);
pub const WIND_FILL: RGBColor = RGBColor(144, 238, 144);
pub const WIND_EDGE: RGBColor = RGBColor(0, 128, 0);

/// Intensity scale used for point colours, in gCO2/kWh
const SCALE_LOW: f64 = 100.0;
const SCALE_HIGH: f64 = 600.0;

pub fn category_color(category: CategoryLabel) -> RGBColor {
    match category {
        CategoryLabel::Low => RGBColor(0, 128, 0),
        CategoryLabel::Medium => RGBColor(255, 165, 0),
        CategoryLabel::High => RGBColor(220, 20, 20),
    }
}

pub fn fuel_color(source: FuelSource) -> RGBColor {
    match source {
        FuelSource::Coal => RGBColor(0x3B, 0x34, 0x34),
        FuelSource::Gas => RGBColor(0xFF, 0x57, 0x33),
        FuelSource::NetImport => RGBColor(0x86, 0x48, 0xBD),
        FuelSource::OtherFossil => RGBColor(0xF0, 0x80, 0x80),
        FuelSource::Renewables => RGBColor(0x48, 0xBD, 0x5F),
    }
}

/// Green through yellow to red across the intensity scale
pub fn intensity_color(value: f64) -> RGBColor {
    let t = ((value - SCALE_LOW) / (SCALE_HIGH - SCALE_LOW)).clamp(0.0, 1.0);
    let (from, to, local) = if t < 0.5 {
        ((26, 152, 80), (255, 255, 191), t * 2.0)
    } else {
        ((255, 255, 191), (215, 48, 39), (t - 0.5) * 2.0)
    };
    RGBColor(
        lerp(from.0, to.0, local),
        lerp(from.1, to.1, local),
        lerp(from.2, to.2, local),
    )
}

fn lerp(from: u8, to: u8, t: f64) -> u8 {
    let value = f64::from(from) + (f64::from(to) - f64::from(from)) * t;
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "value is clamped to the u8 range"
    )]
    let channel = value.round().clamp(0.0, 255.0) as u8;
    channel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intensity_color_ends() {
        assert_eq!(intensity_color(50.0), RGBColor(26, 152, 80));
        assert_eq!(intensity_color(100.0), RGBColor(26, 152, 80));
        assert_eq!(intensity_color(350.0), RGBColor(255, 255, 191));
        assert_eq!(intensity_color(600.0), RGBColor(215, 48, 39));
        assert_eq!(intensity_color(900.0), RGBColor(215, 48, 39));
    }

    #[test]
    fn test_palettes_are_distinct() {
        let categories: Vec<_> = CategoryLabel::ALL.iter().map(|c| category_color(*c)).collect();
        assert_ne!(categories[0], categories[1]);
        assert_ne!(categories[1], categories[2]);
        assert_eq!(fuel_color(FuelSource::Renewables), RGBColor(72, 189, 95));
    }
}
