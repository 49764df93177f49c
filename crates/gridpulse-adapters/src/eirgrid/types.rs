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

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use gridpulse_core::FuelMixRecord;
use gridpulse_types::{RawSeries, TimeSeriesPoint};
use serde::{Deserialize, Serialize};

use crate::eirgrid::errors::{EirGridError, EirGridResult};

/// Timestamp layout used by both dashboard endpoints, e.g. `25-Feb-2024 00:00:00`
pub const EFFECTIVE_TIME_FORMAT: &str = "%d-%b-%Y %H:%M:%S";

/// Data areas published by the dashboard service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataArea {
    Co2Stats,
    GenerationActual,
    Co2Emission,
    Co2Intensity,
    Interconnection,
    SnspAll,
    Frequency,
    DemandActual,
    WindActual,
    FuelMix,
}

impl DataArea {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Co2Stats => "CO2Stats",
            Self::GenerationActual => "generationactual",
            Self::Co2Emission => "co2emission",
            Self::Co2Intensity => "co2intensity",
            Self::Interconnection => "interconnection",
            Self::SnspAll => "SnspAll",
            Self::Frequency => "frequency",
            Self::DemandActual => "demandactual",
            Self::WindActual => "windactual",
            Self::FuelMix => "fuelMix",
        }
    }
}

impl fmt::Display for DataArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grid region: Republic of Ireland, Northern Ireland or both
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "ROI", alias = "roi")]
    Roi,
    #[serde(rename = "NI", alias = "ni")]
    Ni,
    #[default]
    #[serde(rename = "ALL", alias = "all")]
    All,
}

impl Region {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Roi => "ROI",
            Self::Ni => "NI",
            Self::All => "ALL",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = EirGridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ROI" => Ok(Self::Roi),
            "NI" => Ok(Self::Ni),
            "ALL" => Ok(Self::All),
            other => Err(EirGridError::ConfigError(format!(
                "Unknown region '{other}', expected ROI, NI or ALL"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DashboardResponse {
    #[serde(default)]
    pub rows: Vec<DashboardRow>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DashboardRow {
    pub effective_time: String,
    #[serde(default)]
    pub field_name: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
}

impl DashboardRow {
    pub fn timestamp(&self) -> EirGridResult<NaiveDateTime> {
        NaiveDateTime::parse_from_str(self.effective_time.trim(), EFFECTIVE_TIME_FORMAT)
            .map_err(|_| EirGridError::InvalidTimestamp(self.effective_time.clone()))
    }
}

/// Build a raw series, ordering rows and keeping the first of duplicate times
pub fn rows_to_series(rows: &[DashboardRow]) -> EirGridResult<RawSeries> {
    let points = rows
        .iter()
        .map(|row| Ok(TimeSeriesPoint::new(row.timestamp()?, row.value)))
        .collect::<EirGridResult<Vec<_>>>()?;
    Ok(RawSeries::from_unordered(points))
}

pub fn rows_to_fuel_records(rows: &[DashboardRow]) -> EirGridResult<Vec<FuelMixRecord>> {
    rows.iter()
        .map(|row| {
            let field_name = row.field_name.clone().ok_or_else(|| {
                EirGridError::InvalidResponse(format!(
                    "fuel mix row at {} has no field name",
                    row.effective_time
                ))
            })?;
            Ok(FuelMixRecord {
                effective_time: row.timestamp()?,
                field_name,
                value: row.value,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(time: &str, value: Option<f64>) -> DashboardRow {
        DashboardRow {
            effective_time: time.to_owned(),
            field_name: Some("CO2_INTENSITY".to_owned()),
            region: Some("ALL".to_owned()),
            value,
        }
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{"Rows":[
            {"EffectiveTime":"25-Feb-2024 00:00:00","FieldName":"CO2_INTENSITY","Region":"ALL","Value":212.0},
            {"EffectiveTime":"25-Feb-2024 00:15:00","FieldName":"CO2_INTENSITY","Region":"ALL","Value":null}
        ],"Status":"Success"}"#;
        let response: DashboardResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.rows.len(), 2);
        assert_eq!(response.rows[0].value, Some(212.0));
        assert_eq!(response.rows[1].value, None);
        assert_eq!(
            response.rows[0].timestamp().unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 25)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_rows_to_series_sorts_and_dedups() {
        let rows = [
            row("25-Feb-2024 00:30:00", Some(3.0)),
            row("25-Feb-2024 00:00:00", Some(1.0)),
            row("25-Feb-2024 00:15:00", None),
            row("25-Feb-2024 00:00:00", Some(9.0)),
        ];
        let series = rows_to_series(&rows).unwrap();
        let values: Vec<_> = series.points().iter().map(|p| p.value).collect();
        assert_eq!(values, vec![Some(1.0), None, Some(3.0)]);
    }

    #[test]
    fn test_bad_timestamp() {
        let result = rows_to_series(&[row("2024-02-25T00:00:00", Some(1.0))]);
        assert!(matches!(result, Err(EirGridError::InvalidTimestamp(_))));
    }

    #[test]
    fn test_fuel_rows_need_field_name() {
        let mut bad = row("25-Feb-2024 12:00:00", Some(1.0));
        bad.field_name = None;
        assert!(matches!(
            rows_to_fuel_records(&[bad]),
            Err(EirGridError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_region_parsing() {
        assert_eq!("roi".parse::<Region>().unwrap(), Region::Roi);
        assert_eq!("ALL".parse::<Region>().unwrap(), Region::All);
        assert!("EU".parse::<Region>().is_err());
        assert_eq!(DataArea::FuelMix.to_string(), "fuelMix");
    }
}
