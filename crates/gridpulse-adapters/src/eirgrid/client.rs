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

use std::time::Duration;

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::eirgrid::errors::{EirGridError, EirGridResult};
use crate::eirgrid::types::{DashboardResponse, DashboardRow, DataArea, Region};
use crate::eirgrid::window::{format_dashboard_time, format_forecast_time};

/// Connection settings for the grid dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EirGridSettings {
    #[serde(default = "default_dashboard_url")]
    pub dashboard_url: String,
    #[serde(default = "default_co2_forecast_url")]
    pub co2_forecast_url: String,
    #[serde(default)]
    pub region: Region,
    /// IANA zone of the grid's wall clock
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// The forecast host has served a broken certificate chain
    #[serde(default = "default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,
}

fn default_dashboard_url() -> String {
    "http://smartgriddashboard.eirgrid.com".to_owned()
}

fn default_co2_forecast_url() -> String {
    "https://www.co2.smartgriddashboard.com".to_owned()
}

fn default_timezone() -> String {
    "Europe/Dublin".to_owned()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_accept_invalid_certs() -> bool {
    true
}

impl Default for EirGridSettings {
    fn default() -> Self {
        Self {
            dashboard_url: default_dashboard_url(),
            co2_forecast_url: default_co2_forecast_url(),
            region: Region::default(),
            timezone: default_timezone(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            accept_invalid_certs: default_accept_invalid_certs(),
        }
    }
}

impl EirGridSettings {
    pub fn timezone(&self) -> EirGridResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| EirGridError::ConfigError(format!("Invalid timezone '{}': {}", self.timezone, e)))
    }
}

/// Smart grid dashboard REST client
#[derive(Debug, Clone)]
pub struct EirGridClient {
    dashboard_url: String,
    co2_forecast_url: String,
    region: Region,
    timezone: Tz,
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl EirGridClient {
    pub fn new(settings: &EirGridSettings) -> EirGridResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()
            .map_err(|e| EirGridError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            dashboard_url: settings.dashboard_url.trim_end_matches('/').to_owned(),
            co2_forecast_url: settings.co2_forecast_url.trim_end_matches('/').to_owned(),
            region: settings.region,
            timezone: settings.timezone()?,
            client,
            max_retries: settings.max_retries.max(1),
            retry_delay: Duration::from_millis(settings.retry_delay_ms),
        })
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Rows of one dashboard area between two grid-local times
    pub async fn fetch_area(
        &self,
        area: DataArea,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> EirGridResult<Vec<DashboardRow>> {
        let url = format!(
            "{}/DashboardService.svc/data?area={}&region={}&datefrom={}&dateto={}",
            self.dashboard_url,
            area,
            self.region,
            format_dashboard_time(start),
            format_dashboard_time(end)
        );
        info!(
            "📊 [GRID] Fetching '{}' for {} from {} to {}",
            area, self.region, start, end
        );
        self.get_rows(&url).await
    }

    /// Rows of the CO2 intensity forecast between two grid-local times
    pub async fn fetch_co2_forecast(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> EirGridResult<Vec<DashboardRow>> {
        let url = format!(
            "{}/api/co2_fc/{}/{}/{}",
            self.co2_forecast_url,
            format_forecast_time(start),
            format_forecast_time(end),
            self.region
        );
        info!(
            "📊 [GRID] Fetching CO2 forecast for {} from {} to {}",
            self.region, start, end
        );
        self.get_rows(&url).await
    }

    async fn get_rows(&self, url: &str) -> EirGridResult<Vec<DashboardRow>> {
        debug!("   URL: {}", url);

        let response = self
            .retry_request(|| async { self.client.get(url).send().await })
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                let parsed: DashboardResponse = serde_json::from_str(&body)?;
                let defined = parsed.rows.iter().filter(|r| r.value.is_some()).count();
                debug!(
                    "✅ [GRID] {} rows received, {} with values",
                    parsed.rows.len(),
                    defined
                );
                Ok(parsed.rows)
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                error!("❌ [GRID] Status {}: {}", status, error_text);
                Err(EirGridError::ApiError {
                    status: status.as_u16(),
                    message: error_text,
                })
            }
        }
    }

    async fn retry_request<F, Fut>(&self, mut request_fn: F) -> EirGridResult<reqwest::Response>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let mut attempts = 0;
        let mut delay = self.retry_delay;

        loop {
            attempts += 1;
            match request_fn().await {
                Ok(response) if response.status().is_server_error() && attempts < self.max_retries => {
                    warn!(
                        "Dashboard returned {} (attempt {}/{}). Retrying in {:?}",
                        response.status(),
                        attempts,
                        self.max_retries,
                        delay
                    );
                }
                Ok(response) => return Ok(response),
                Err(e) if attempts >= self.max_retries => {
                    error!("Request failed after {} attempts: {}", attempts, e);
                    return Err(EirGridError::HttpError(e));
                }
                Err(e) => {
                    warn!(
                        "Request failed (attempt {}/{}): {}. Retrying in {:?}",
                        attempts, self.max_retries, e, delay
                    );
                }
            }
            tokio::time::sleep(delay).await;
            delay *= 2;
        }
    }

    pub fn with_retry_config(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries.max(1);
        self.retry_delay = retry_delay;
        self
    }
}
