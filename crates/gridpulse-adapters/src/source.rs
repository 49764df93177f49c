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

use async_trait::async_trait;
use chrono::NaiveDateTime;
use gridpulse_core::FuelMixRecord;
use gridpulse_types::RawSeries;
use tracing::info;

use crate::eirgrid::client::EirGridClient;
use crate::eirgrid::errors::EirGridResult;
use crate::eirgrid::types::{DataArea, rows_to_fuel_records, rows_to_series};
use crate::eirgrid::window::{
    forecast_window, grid_now, prior_day_window, round_to_quarter_hour, today_window,
};

/// Provider of the grid series the analysis commands consume.
///
/// All `now` arguments are grid-local wall-clock times.
#[async_trait]
pub trait GridDataSource: Send + Sync {
    /// CO2 intensity forecast for the rest of the day
    async fn co2_forecast(&self, now: NaiveDateTime) -> EirGridResult<RawSeries>;

    /// Measured CO2 intensity over the trailing 24 hours
    async fn co2_intensity_prior_day(&self, now: NaiveDateTime) -> EirGridResult<RawSeries>;

    async fn demand_today(&self, now: NaiveDateTime) -> EirGridResult<RawSeries>;

    async fn wind_today(&self, now: NaiveDateTime) -> EirGridResult<RawSeries>;

    /// Fuel mix rows at the current quarter hour
    async fn fuel_mix(&self, now: NaiveDateTime) -> EirGridResult<Vec<FuelMixRecord>>;

    /// Current grid-local time
    fn now(&self) -> NaiveDateTime;

    fn name(&self) -> &str;
}

#[async_trait]
impl GridDataSource for EirGridClient {
    async fn co2_forecast(&self, now: NaiveDateTime) -> EirGridResult<RawSeries> {
        let (start, end) = forecast_window(now);
        let rows = self.fetch_co2_forecast(start, end).await?;
        let series = rows_to_series(&rows)?;
        info!(
            "✅ [GRID] CO2 forecast: {} points, {} defined",
            series.len(),
            series.defined_count()
        );
        Ok(series)
    }

    async fn co2_intensity_prior_day(&self, now: NaiveDateTime) -> EirGridResult<RawSeries> {
        let (start, end) = prior_day_window(now);
        let rows = self.fetch_area(DataArea::Co2Intensity, start, end).await?;
        rows_to_series(&rows)
    }

    async fn demand_today(&self, now: NaiveDateTime) -> EirGridResult<RawSeries> {
        let (start, end) = today_window(now);
        let rows = self.fetch_area(DataArea::DemandActual, start, end).await?;
        rows_to_series(&rows)
    }

    async fn wind_today(&self, now: NaiveDateTime) -> EirGridResult<RawSeries> {
        let (start, end) = today_window(now);
        let rows = self.fetch_area(DataArea::WindActual, start, end).await?;
        rows_to_series(&rows)
    }

    async fn fuel_mix(&self, now: NaiveDateTime) -> EirGridResult<Vec<FuelMixRecord>> {
        let at = round_to_quarter_hour(now);
        let rows = self.fetch_area(DataArea::FuelMix, at, at).await?;
        rows_to_fuel_records(&rows)
    }

    fn now(&self) -> NaiveDateTime {
        grid_now(self.timezone())
    }

    fn name(&self) -> &str {
        "EirGrid"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eirgrid::client::EirGridSettings;
    use chrono::NaiveDate;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 25)
            .unwrap()
            .and_hms_opt(12, 7, 31)
            .unwrap()
    }

    fn client_for(url: &str) -> EirGridClient {
        let settings = EirGridSettings {
            dashboard_url: url.to_owned(),
            co2_forecast_url: url.to_owned(),
            max_retries: 1,
            ..EirGridSettings::default()
        };
        EirGridClient::new(&settings).unwrap()
    }

    #[tokio::test]
    async fn test_forecast_uses_half_hour_window() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/co2_fc/202402251200/202402252359/ALL")
            .with_status(200)
            .with_body(
                json!({"Rows": [
                    {"EffectiveTime": "25-Feb-2024 12:30:00", "Value": 190.0},
                    {"EffectiveTime": "25-Feb-2024 12:00:00", "Value": 180.0},
                    {"EffectiveTime": "25-Feb-2024 13:00:00", "Value": null}
                ]})
                .to_string(),
            )
            .create_async()
            .await;

        let series = client_for(&server.url()).co2_forecast(now()).await.unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.points()[0].value, Some(180.0));
        assert_eq!(series.defined_count(), 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fuel_mix_queries_current_quarter_hour() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/DashboardService.svc/data")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("area".into(), "fuelMix".into()),
                Matcher::UrlEncoded("datefrom".into(), "25-feb-2024 12:00".into()),
                Matcher::UrlEncoded("dateto".into(), "25-feb-2024 12:00".into()),
            ]))
            .with_status(200)
            .with_body(
                json!({"Rows": [
                    {"EffectiveTime": "25-Feb-2024 12:00:00", "FieldName": "FUEL_GAS", "Region": "ALL", "Value": 2100.0},
                    {"EffectiveTime": "25-Feb-2024 12:00:00", "FieldName": "FUEL_NET_IMPORT", "Region": "ALL", "Value": -150.0}
                ]})
                .to_string(),
            )
            .create_async()
            .await;

        let records = client_for(&server.url()).fuel_mix(now()).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].field_name, "FUEL_NET_IMPORT");

        let mix = gridpulse_core::compute_fuel_mix(&records).unwrap();
        assert_eq!(mix.net_import, gridpulse_core::NetImportStatus::Exporting);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_demand_queries_since_midnight() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/DashboardService.svc/data")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("area".into(), "demandactual".into()),
                Matcher::UrlEncoded("datefrom".into(), "25-feb-2024 00:00".into()),
                Matcher::UrlEncoded("dateto".into(), "25-feb-2024 12:00".into()),
            ]))
            .with_status(200)
            .with_body(json!({"Rows": []}).to_string())
            .create_async()
            .await;

        let series = client_for(&server.url()).demand_today(now()).await.unwrap();
        assert!(series.is_empty());
        mock.assert_async().await;
    }
}
