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

use crate::category::{CategoryLabel, Scheme};
use crate::error::{AnalysisError, AnalysisResult};
use crate::series::PreparedSeries;

/// One label per classification scheme, exposed as parallel fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchemeLabels {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prior_period: Option<CategoryLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eu_standard: Option<CategoryLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative: Option<CategoryLabel>,
}

impl SchemeLabels {
    pub fn get(&self, scheme: Scheme) -> Option<CategoryLabel> {
        match scheme {
            Scheme::PriorPeriod => self.prior_period,
            Scheme::EuStandard => self.eu_standard,
            Scheme::Relative => self.relative,
        }
    }

    fn set(&mut self, scheme: Scheme, label: CategoryLabel) {
        let slot = match scheme {
            Scheme::PriorPeriod => &mut self.prior_period,
            Scheme::EuStandard => &mut self.eu_standard,
            Scheme::Relative => &mut self.relative,
        };
        *slot = Some(label);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedPoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
    /// Min/max rescaled value, present once the relative scheme ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized: Option<f64>,
    pub labels: SchemeLabels,
}

/// Prepared series augmented with one category column per active scheme.
///
/// Adding a column consumes the series and returns a new one, so a column is
/// either present on every point or on none.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassifiedSeries {
    points: Vec<ClassifiedPoint>,
    schemes: Vec<Scheme>,
}

impl ClassifiedSeries {
    pub fn from_prepared(series: &PreparedSeries) -> Self {
        let points = series
            .points()
            .iter()
            .map(|p| ClassifiedPoint {
                timestamp: p.timestamp,
                value: p.value,
                normalized: None,
                labels: SchemeLabels::default(),
            })
            .collect();
        Self {
            points,
            schemes: Vec::new(),
        }
    }

    /// Attach (or replace) the label column for `scheme`
    pub fn with_labels(mut self, scheme: Scheme, labels: Vec<CategoryLabel>) -> AnalysisResult<Self> {
        if labels.len() != self.points.len() {
            return Err(AnalysisError::LabelCountMismatch {
                expected: self.points.len(),
                actual: labels.len(),
            });
        }
        for (point, label) in self.points.iter_mut().zip(labels) {
            point.labels.set(scheme, label);
        }
        if !self.schemes.contains(&scheme) {
            self.schemes.push(scheme);
        }
        Ok(self)
    }

    /// Attach the normalized value column
    pub fn with_normalized(mut self, normalized: Vec<f64>) -> AnalysisResult<Self> {
        if normalized.len() != self.points.len() {
            return Err(AnalysisError::LabelCountMismatch {
                expected: self.points.len(),
                actual: normalized.len(),
            });
        }
        for (point, value) in self.points.iter_mut().zip(normalized) {
            point.normalized = Some(value);
        }
        Ok(self)
    }

    pub fn points(&self) -> &[ClassifiedPoint] {
        &self.points
    }

    /// Schemes in the order they were attached
    pub fn schemes(&self) -> &[Scheme] {
        &self.schemes
    }

    pub fn has_scheme(&self, scheme: Scheme) -> bool {
        self.schemes.contains(&scheme)
    }

    /// `(timestamp, label)` pairs for one scheme, `None` if it is not active
    pub fn labeled(&self, scheme: Scheme) -> Option<Vec<(NaiveDateTime, CategoryLabel)>> {
        if !self.has_scheme(scheme) {
            return None;
        }
        self.points
            .iter()
            .map(|p| p.labels.get(scheme).map(|label| (p.timestamp, label)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
