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

use gridpulse_types::{CategoryLabel, ClassificationBounds, PreparedSeries};

/// Threshold rule shared by every scheme.
///
/// `value < lower` is Low, `value > upper` is High, anything in the closed
/// range `[lower, upper]` is Medium.
pub fn classify(value: f64, lower: f64, upper: f64) -> CategoryLabel {
    if value < lower {
        CategoryLabel::Low
    } else if value > upper {
        CategoryLabel::High
    } else {
        CategoryLabel::Medium
    }
}

pub fn classify_with(bounds: &ClassificationBounds, value: f64) -> CategoryLabel {
    classify(value, bounds.lower(), bounds.upper())
}

/// Label column for a prepared series
pub fn classify_series(series: &PreparedSeries, bounds: &ClassificationBounds) -> Vec<CategoryLabel> {
    series.values().map(|v| classify_with(bounds, v)).collect()
}

pub fn classify_values(values: &[f64], bounds: &ClassificationBounds) -> Vec<CategoryLabel> {
    values.iter().map(|v| classify_with(bounds, *v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_bounds_are_medium() {
        assert_eq!(classify(250.0, 250.0, 500.0), CategoryLabel::Medium);
        assert_eq!(classify(500.0, 250.0, 500.0), CategoryLabel::Medium);
    }

    #[test]
    fn test_just_outside_bounds() {
        assert_eq!(classify(250.0 - EPSILON, 250.0, 500.0), CategoryLabel::Low);
        assert_eq!(classify(500.0 + EPSILON, 250.0, 500.0), CategoryLabel::High);
    }

    #[test]
    fn test_degenerate_bounds() {
        assert_eq!(classify(0.0, 0.0, 0.0), CategoryLabel::Medium);
        assert_eq!(classify(-0.1, 0.0, 0.0), CategoryLabel::Low);
        assert_eq!(classify(0.1, 0.0, 0.0), CategoryLabel::High);
    }

    #[test]
    fn test_boundary_rule_over_many_bounds() {
        let cases = [(-10.0, 10.0), (0.0, 0.33), (180.5, 412.25), (1e6, 2e6)];
        for (lo, hi) in cases {
            let bounds = ClassificationBounds::new(lo, hi).unwrap();
            assert_eq!(classify_with(&bounds, lo), CategoryLabel::Medium);
            assert_eq!(classify_with(&bounds, hi), CategoryLabel::Medium);
            assert_eq!(classify_with(&bounds, lo - 1.0), CategoryLabel::Low);
            assert_eq!(classify_with(&bounds, hi + 1.0), CategoryLabel::High);
        }
    }

    #[test]
    fn test_classify_values_eu() {
        let labels = classify_values(
            &[100.0, 120.0, 453.0, 704.0, 150.0],
            &ClassificationBounds::EU_STANDARD,
        );
        assert_eq!(
            labels,
            vec![
                CategoryLabel::Low,
                CategoryLabel::Low,
                CategoryLabel::Medium,
                CategoryLabel::High,
                CategoryLabel::Low,
            ]
        );
    }
}
