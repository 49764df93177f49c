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

//! Request windows and timestamp formats for the dashboard endpoints.
//!
//! Every window is expressed in grid-local wall-clock time.

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;

/// Current wall-clock time of the grid
pub fn grid_now(timezone: Tz) -> NaiveDateTime {
    Utc::now().with_timezone(&timezone).naive_local()
}

fn round_down(dt: NaiveDateTime, step_minutes: u32) -> NaiveDateTime {
    dt - Duration::minutes(i64::from(dt.minute() % step_minutes))
        - Duration::seconds(i64::from(dt.second()))
        - Duration::nanoseconds(i64::from(dt.nanosecond()))
}

pub fn round_to_quarter_hour(dt: NaiveDateTime) -> NaiveDateTime {
    round_down(dt, 15)
}

pub fn round_to_half_hour(dt: NaiveDateTime) -> NaiveDateTime {
    round_down(dt, 30)
}

fn midnight(dt: NaiveDateTime) -> NaiveDateTime {
    dt.date().and_time(NaiveTime::MIN)
}

/// Forecast window: current half hour until 23:59:59 the same day
pub fn forecast_window(now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    let end = midnight(now) + Duration::seconds(24 * 3600 - 1);
    (round_to_half_hour(now), end)
}

/// Trailing 24 hours ending at the current quarter hour
pub fn prior_day_window(now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    let end = round_to_quarter_hour(now);
    (end - Duration::days(1), end)
}

/// Midnight until the current quarter hour
pub fn today_window(now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    (midnight(now), round_to_quarter_hour(now))
}

/// Dashboard query format: `25-feb-2024+13%3A45`
pub fn format_dashboard_time(dt: NaiveDateTime) -> String {
    format!(
        "{}+{}",
        dt.format("%d-%b-%Y").to_string().to_lowercase(),
        dt.format("%H%%3A%M")
    )
}

/// Forecast path segment format: `202402251345`
pub fn format_forecast_time(dt: NaiveDateTime) -> String {
    dt.format("%Y%m%d%H%M").to_string()
}
