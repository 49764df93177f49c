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

//! Prompt construction for the language-model guidance step and parsing of
//! its reply.


use gridpulse_types::{PeriodReport, Scheme};

use crate::analysis::IntensityReport;
use crate::fuel_mix::FuelMix;

pub const ENERGY_ACTIONS_HEADING: &str = "- 💡 Energy-Saving Actions:";

/// Headings that may follow the energy-saving section in a reply
const SECTION_MARKERS: [&str; 4] = ["📋", "- 🇪🇺", "- 🔍", "- 💡"];

/// Combined CO2 brief prompt for one day.
///
/// `date` is rendered as given, normally `dd/mm/YYYY`.
pub fn carbon_prompt(date: &str, eu_summary: &str, trend_summary: &str) -> String {
    let prompt_data = format!(
        "🌍 CO2 Emissions Forecast for {date}:\n\n\
         1. **EU Standards Analysis** 🇪🇺 :\n\
         {eu_summary}\n\n\
         2. **Data Trend**: 🔍\n\
         {trend_summary}\n\n"
    );

    let structure = format!(
        "📋 CO2 Emission Brief & Energy Efficiency Guide:\n\n\
         - 🇪🇺 EU Standards Forecast: ONLY report it\n\
         - 🔍 Data Trend Schedule: ONLY report it\n\
         {ENERGY_ACTIONS_HEADING} Give an example of energy-saving actions for each category of CO2 emission trend, \
         considering the current season ({date}). Examples should cover:\n   \
         -🟢 Low Emission Periods: [Your Example Here]\n   \
         -🟡 Medium Emission Periods: [Your Example Here]\n   \
         -🔴High Emission Periods: [Your Example Here]\n"
    );

    format!(
        "📊 Given the CO2 emission forecasts and detailed analysis for {date}, let's explore how we can adjust our \
         energy consumption to minimize our environmental impact. Our aim is to provide straightforward and practical \
         advice, utilizing specific data trends.\n\n\
         {prompt_data}\
         💡 In periods of low emissions, feel free to use energy-intensive appliances without much concern for reduction.\n\n\
         👉 Please use the following format for your response and avoid using * in your response: \n\n {structure}\n"
    )
}

/// Prompt for an analyzed day, using its EU and data-trend summaries
pub fn carbon_prompt_for(report: &IntensityReport, metric: &str) -> String {
    let section = |scheme: Scheme| {
        report
            .outcome(scheme)
            .map(|o| o.render(metric))
            .unwrap_or_else(|| PeriodReport::InsufficientData.render(metric))
    };
    carbon_prompt(
        &report.date_label(),
        &section(Scheme::EuStandard),
        &section(Scheme::Relative),
    )
}

/// Prompt asking for a short explanation of the current generation mix
pub fn fuel_mix_prompt(mix: &FuelMix) -> String {
    let mut table = String::new();
    for share in &mix.shares {
        table.push_str(&format!(
            "- {}: {:.0} MW ({:.1}%)\n",
            share.source, share.value, share.percentage
        ));
    }

    format!(
        "⚡ Fuel mix of the electricity grid at {time}:\n\n\
         {table}\n\
         The grid is currently {status} electricity over the interconnectors.\n\n\
         👉 In a few short sentences and without using *, explain what this mix means for the carbon \
         intensity of electricity right now, highlight the share of renewables, and suggest whether this \
         is a good moment for energy-intensive tasks.\n",
        time = mix.effective_time.format("%d/%m/%Y %H:%M"),
        status = mix.net_import,
    )
}

/// Slice the energy-saving section out of a reply.
///
/// The section runs from the heading to the next section marker or the end
/// of the text. Returns `None` when the heading is absent.
pub fn extract_energy_actions(reply: &str) -> Option<&str> {
    let start = reply.find(ENERGY_ACTIONS_HEADING)?;
    let body_start = start + ENERGY_ACTIONS_HEADING.len();
    let tail = &reply[body_start..];

    let end = SECTION_MARKERS
        .iter()
        .filter_map(|marker| tail.find(marker))
        .min()
        .map_or(reply.len(), |offset| body_start + offset);

    Some(reply[start..end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuel_mix::{FuelMixRecord, compute_fuel_mix};
    use chrono::NaiveDate;

    #[test]
    fn test_carbon_prompt_embeds_sections() {
        let prompt = carbon_prompt(
            "25/02/2024",
            "- 🟢 Low Emission: 00:00 to 01:00",
            "- 🔴 High Emission: 18:00",
        );
        assert!(prompt.starts_with("📊 Given the CO2 emission forecasts and detailed analysis for 25/02/2024"));
        assert!(prompt.contains("🌍 CO2 Emissions Forecast for 25/02/2024:\n\n1. **EU Standards Analysis** 🇪🇺 :\n- 🟢 Low Emission: 00:00 to 01:00\n\n"));
        assert!(prompt.contains("2. **Data Trend**: 🔍\n- 🔴 High Emission: 18:00\n\n"));
        assert!(prompt.contains("considering the current season (25/02/2024)"));
        assert!(prompt.contains("   -🟡 Medium Emission Periods: [Your Example Here]\n"));
    }

    #[test]
    fn test_extract_until_next_marker() {
        let reply = "📋 Brief\n\n- 🇪🇺 EU: fine\n- 💡 Energy-Saving Actions: run the dishwasher at night\n   -🟢 Low: laundry\n- 🔍 Data Trend: stable";
        assert_eq!(
            extract_energy_actions(reply),
            Some("- 💡 Energy-Saving Actions: run the dishwasher at night\n   -🟢 Low: laundry")
        );
    }

    #[test]
    fn test_extract_until_end_of_text() {
        let reply = "intro\n- 💡 Energy-Saving Actions: unplug chargers  \n";
        assert_eq!(
            extract_energy_actions(reply),
            Some("- 💡 Energy-Saving Actions: unplug chargers")
        );
    }

    #[test]
    fn test_extract_without_heading() {
        assert_eq!(extract_energy_actions("no guidance here"), None);
    }

    #[test]
    fn test_fuel_mix_prompt_lists_shares() {
        let at = NaiveDate::from_ymd_opt(2024, 2, 25)
            .unwrap()
            .and_hms_opt(12, 15, 0)
            .unwrap();
        let records = [
            ("FUEL_GAS", 1000.0),
            ("FUEL_NET_IMPORT", -200.0),
            ("FUEL_RENEW", 3000.0),
        ]
        .map(|(field, value)| FuelMixRecord {
            effective_time: at,
            field_name: field.to_owned(),
            value: Some(value),
        });
        let mix = compute_fuel_mix(&records).unwrap();
        let prompt = fuel_mix_prompt(&mix);

        assert!(prompt.contains("25/02/2024 12:15"));
        assert!(prompt.contains("- Renewables: 3000 MW (75.0%)"));
        assert!(prompt.contains("currently exporting electricity"));
    }
}
