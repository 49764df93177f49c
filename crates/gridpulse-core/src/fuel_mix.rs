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

//! Generation fuel mix shares

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FuelMixError {
    #[error("fuel mix response contained no recognised fuel rows")]
    Empty,

    #[error("fuel mix response has no net import row")]
    MissingNetImport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelSource {
    Coal,
    Gas,
    NetImport,
    OtherFossil,
    Renewables,
}

impl FuelSource {
    pub const ALL: [FuelSource; 5] = [
        FuelSource::Coal,
        FuelSource::Gas,
        FuelSource::NetImport,
        FuelSource::OtherFossil,
        FuelSource::Renewables,
    ];

    /// Parse the dashboard field name, e.g. `FUEL_NET_IMPORT`
    pub fn from_field_name(name: &str) -> Option<Self> {
        match name {
            "FUEL_COAL" => Some(Self::Coal),
            "FUEL_GAS" => Some(Self::Gas),
            "FUEL_NET_IMPORT" => Some(Self::NetImport),
            "FUEL_OTHER_FOSSIL" => Some(Self::OtherFossil),
            "FUEL_RENEW" => Some(Self::Renewables),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Coal => "Coal",
            Self::Gas => "Gas",
            Self::NetImport => "Net Import",
            Self::OtherFossil => "Other Fossil",
            Self::Renewables => "Renewables",
        }
    }
}

impl fmt::Display for FuelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the fuel mix feed as delivered by the grid operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelMixRecord {
    pub effective_time: NaiveDateTime,
    pub field_name: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetImportStatus {
    Importing,
    Exporting,
}

impl fmt::Display for NetImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Importing => f.write_str("importing"),
            Self::Exporting => f.write_str("exporting"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FuelShare {
    pub source: FuelSource,
    /// Reported output in MW, negative for net exports
    pub value: f64,
    /// Share of the positive total, 0 for non-positive values
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelMix {
    pub effective_time: NaiveDateTime,
    pub shares: Vec<FuelShare>,
    pub net_import: NetImportStatus,
}

impl FuelMix {
    pub fn share(&self, source: FuelSource) -> Option<&FuelShare> {
        self.shares.iter().find(|s| s.source == source)
    }

    /// Shares worth drawing: net import is left out while exporting
    pub fn chart_shares(&self) -> Vec<FuelShare> {
        self.shares
            .iter()
            .filter(|s| {
                !(s.source == FuelSource::NetImport && self.net_import == NetImportStatus::Exporting)
            })
            .copied()
            .collect()
    }

    /// Sum of positive output in MW
    pub fn total(&self) -> f64 {
        self.shares.iter().map(|s| s.value.max(0.0)).sum()
    }
}

/// Turn raw rows into percentage shares.
///
/// Only the latest timestamp in the feed is used. Values are clamped at zero
/// before the total is taken; a negative net import flips the status to
/// `Exporting`. Unknown field names and missing readings are skipped.
pub fn compute_fuel_mix(records: &[FuelMixRecord]) -> Result<FuelMix, FuelMixError> {
    let mut parsed = Vec::with_capacity(records.len());
    for record in records {
        let Some(source) = FuelSource::from_field_name(&record.field_name) else {
            warn!("Skipping unknown fuel field '{}'", record.field_name);
            continue;
        };
        match record.value {
            Some(value) => parsed.push((record.effective_time, source, value)),
            None => warn!(
                "Skipping {} at {}: no reading published",
                source, record.effective_time
            ),
        }
    }

    let Some(effective_time) = parsed.iter().map(|(time, _, _)| *time).max() else {
        return Err(FuelMixError::Empty);
    };
    parsed.retain(|(time, _, _)| *time == effective_time);

    let net_import = parsed
        .iter()
        .find(|(_, source, _)| *source == FuelSource::NetImport)
        .map(|(_, _, value)| {
            if *value < 0.0 {
                NetImportStatus::Exporting
            } else {
                NetImportStatus::Importing
            }
        })
        .ok_or(FuelMixError::MissingNetImport)?;

    let total: f64 = parsed.iter().map(|(_, _, v)| v.max(0.0)).sum();
    let shares = parsed
        .into_iter()
        .map(|(_, source, value)| {
            let percentage = if value > 0.0 && total > 0.0 {
                value / total * 100.0
            } else {
                0.0
            };
            FuelShare {
                source,
                value,
                percentage,
            }
        })
        .collect();

    Ok(FuelMix {
        effective_time,
        shares,
        net_import,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(field: &str, value: Option<f64>) -> FuelMixRecord {
        FuelMixRecord {
            effective_time: NaiveDate::from_ymd_opt(2024, 2, 25)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            field_name: field.to_owned(),
            value,
        }
    }

    fn rows(net_import: f64) -> Vec<FuelMixRecord> {
        vec![
            record("FUEL_COAL", Some(100.0)),
            record("FUEL_GAS", Some(2000.0)),
            record("FUEL_NET_IMPORT", Some(net_import)),
            record("FUEL_OTHER_FOSSIL", Some(100.0)),
            record("FUEL_RENEW", Some(1500.0)),
        ]
    }

    #[test]
    fn test_field_names_map_to_sources() {
        assert_eq!(FuelSource::from_field_name("FUEL_RENEW"), Some(FuelSource::Renewables));
        assert_eq!(FuelSource::from_field_name("FUEL_WIND"), None);
        assert_eq!(FuelSource::OtherFossil.to_string(), "Other Fossil");
    }

    #[test]
    fn test_importing_shares() {
        let mix = compute_fuel_mix(&rows(300.0)).unwrap();
        assert_eq!(mix.net_import, NetImportStatus::Importing);
        assert_eq!(mix.total(), 4000.0);
        assert_eq!(mix.share(FuelSource::Gas).unwrap().percentage, 50.0);
        assert!((mix.share(FuelSource::NetImport).unwrap().percentage - 7.5).abs() < 1e-9);
        assert_eq!(mix.chart_shares().len(), 5);

        let sum: f64 = mix.shares.iter().map(|s| s.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_exporting_clamps_and_hides_net_import() {
        let mix = compute_fuel_mix(&rows(-300.0)).unwrap();
        assert_eq!(mix.net_import, NetImportStatus::Exporting);
        assert_eq!(mix.total(), 3700.0);

        let net = mix.share(FuelSource::NetImport).unwrap();
        assert_eq!(net.value, -300.0);
        assert_eq!(net.percentage, 0.0);

        let charted = mix.chart_shares();
        assert_eq!(charted.len(), 4);
        assert!(charted.iter().all(|s| s.source != FuelSource::NetImport));
    }

    #[test]
    fn test_missing_readings_are_skipped() {
        let mut records = rows(0.0);
        records[0].value = None;
        let mix = compute_fuel_mix(&records).unwrap();

        assert!(mix.share(FuelSource::Coal).is_none());
        assert_eq!(mix.shares.len(), 4);
        assert_eq!(mix.total(), 3600.0);
        assert_eq!(mix.net_import, NetImportStatus::Importing);
    }

    #[test]
    fn test_missing_net_import_reading_is_an_error() {
        let mut records = rows(0.0);
        records[2].value = None;
        assert!(matches!(
            compute_fuel_mix(&records),
            Err(FuelMixError::MissingNetImport)
        ));
    }

    #[test]
    fn test_latest_timestamp_wins() {
        let mut records = rows(300.0);
        let mut earlier = record("FUEL_GAS", Some(9000.0));
        earlier.effective_time -= chrono::Duration::minutes(15);
        records.insert(0, earlier);

        let mix = compute_fuel_mix(&records).unwrap();
        assert_eq!(mix.shares.len(), 5);
        assert_eq!(mix.share(FuelSource::Gas).unwrap().value, 2000.0);
        assert_eq!(mix.effective_time, records[1].effective_time);
    }

    #[test]
    fn test_errors() {
        assert_eq!(compute_fuel_mix(&[]), Err(FuelMixError::Empty));
        assert_eq!(
            compute_fuel_mix(&[record("FUEL_UNKNOWN", Some(1.0))]),
            Err(FuelMixError::Empty)
        );
        assert_eq!(
            compute_fuel_mix(&[record("FUEL_GAS", Some(1.0))]),
            Err(FuelMixError::MissingNetImport)
        );
    }
}
