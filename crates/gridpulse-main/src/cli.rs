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

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use gridpulse_adapters::Region;

#[derive(Debug, Parser)]
#[command(name = "gridpulse", version)]
#[command(about = "Grid carbon intensity briefs from EirGrid data")]
#[command(
    long_about = "Classify the grid's CO2 intensity forecast against yesterday, the EU reference \
    bands and its own trend, and summarize when to use or avoid electricity.\n\
    \nExamples:\n  \
    gridpulse carbon                          # Today's brief with guidance\n  \
    gridpulse carbon --no-llm --chart co2.svg # Brief and chart, no language model\n  \
    gridpulse fuel-mix --format json          # Current generation mix as JSON\n  \
    gridpulse analyze --input forecast.json   # Offline analysis of saved points"
)]
pub struct Cli {
    /// Configuration file (TOML or JSON)
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the configured grid region (ROI, NI, ALL)
    #[arg(long, global = true, value_name = "REGION")]
    pub region: Option<Region>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Classify today's CO2 intensity forecast
    #[command(
        long_about = "Fetch the CO2 intensity forecast for the rest of today and the measured \
        intensity of the last 24 hours, classify every half hour under three schemes and print \
        the Low/Medium/High periods.\n\
        \nExamples:\n  \
        gridpulse carbon\n  \
        gridpulse carbon --no-llm --csv forecast.csv\n  \
        gridpulse carbon --format json --chart co2.svg"
    )]
    Carbon(CarbonArgs),

    /// Show the current generation fuel mix
    FuelMix(FuelMixArgs),

    /// Compare today's demand with wind generation
    DemandWind(DemandWindArgs),

    /// Analyze series stored in JSON files instead of fetching them
    #[command(
        long_about = "Run the carbon analysis on files instead of live data.\n\
        \nAccepted layouts:\n  \
        - a list of points: [{\"timestamp\": \"2024-02-25T00:00:00\", \"value\": 120.5}, ...]\n  \
        - a saved dashboard response: {\"Rows\": [{\"EffectiveTime\": \"25-Feb-2024 00:00:00\", \"Value\": 120.5}, ...]}\n\
        \nA null value marks a missing reading."
    )]
    Analyze(AnalyzeArgs),

    /// Print the effective configuration and its validation issues
    Config(ConfigArgs),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable tables and summaries
    #[default]
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct CarbonArgs {
    /// Skip the language model guidance
    #[arg(long, default_value_t = false)]
    pub no_llm: bool,

    /// Write the CO2 trend chart (SVG)
    #[arg(long, value_name = "PATH")]
    pub chart: Option<PathBuf>,

    /// Export the classified series as CSV
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct FuelMixArgs {
    /// Skip the language model explanation
    #[arg(long, default_value_t = false)]
    pub no_llm: bool,

    /// Write the fuel share chart (SVG)
    #[arg(long, value_name = "PATH")]
    pub chart: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct DemandWindArgs {
    /// Write the demand vs wind chart (SVG)
    #[arg(long, value_name = "PATH")]
    pub chart: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Forecast series to classify
    #[arg(long, short, value_name = "FILE")]
    pub input: PathBuf,

    /// Previous period used for the comparison scheme
    #[arg(long, value_name = "FILE")]
    pub prior: Option<PathBuf>,

    /// Write the CO2 trend chart (SVG)
    #[arg(long, value_name = "PATH")]
    pub chart: Option<PathBuf>,

    /// Export the classified series as CSV
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Also write the effective configuration to this TOML file
    #[arg(long, value_name = "PATH")]
    pub write: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_carbon() {
        let cli = Cli::try_parse_from([
            "gridpulse", "carbon", "--no-llm", "--chart", "co2.svg", "--format", "json",
        ])
        .unwrap();

        let Commands::Carbon(args) = cli.command else {
            panic!("expected carbon subcommand");
        };
        assert!(args.no_llm);
        assert_eq!(args.chart, Some(PathBuf::from("co2.svg")));
        assert_eq!(args.csv, None);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_global_region_after_subcommand() {
        let cli = Cli::try_parse_from(["gridpulse", "fuel-mix", "--region", "ni"]).unwrap();
        assert_eq!(cli.region, Some(Region::Ni));
        assert!(matches!(cli.command, Commands::FuelMix(_)));
    }

    #[test]
    fn test_analyze_requires_input() {
        assert!(Cli::try_parse_from(["gridpulse", "analyze"]).is_err());

        let cli = Cli::try_parse_from([
            "gridpulse", "analyze", "-i", "today.json", "--prior", "yesterday.json",
        ])
        .unwrap();
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze subcommand");
        };
        assert_eq!(args.input, PathBuf::from("today.json"));
        assert_eq!(args.prior, Some(PathBuf::from("yesterday.json")));
        assert_eq!(args.format, OutputFormat::Text);
    }

    #[test]
    fn test_unknown_region_rejected() {
        assert!(Cli::try_parse_from(["gridpulse", "carbon", "--region", "EU"]).is_err());
    }
}
