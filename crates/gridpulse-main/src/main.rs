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

mod cli;
mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use gridpulse_adapters::{EirGridClient, GridDataSource, OpenAiClient};
use gridpulse_charts::{co2_trend_svg, demand_wind_svg, fuel_mix_svg};
use gridpulse_core::{IntensityAnalyzer, IntensityReport, RelativeNormalizer};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::cli::{
    AnalyzeArgs, CarbonArgs, Cli, Commands, ConfigArgs, DemandWindArgs, FuelMixArgs, OutputFormat,
};
use crate::commands::{CarbonBrief, FuelMixBrief};
use crate::config::AppConfig;
use crate::output::{CsvFormatter, TableFormatter, to_json};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configuration loading logs at the default level
    let bootstrap = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    let mut config =
        tracing::subscriber::with_default(bootstrap, || AppConfig::load(cli.config.as_deref()))?;
    if let Some(region) = cli.region {
        config.eirgrid.region = region;
    }

    // Respects RUST_LOG, falls back to the configured level
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.system.log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install the tracing subscriber")?;

    info!("🚀 Starting GridPulse");
    info!("📋 Configuration Summary:");
    info!("   Region: {}", config.eirgrid.region);
    info!("   Timezone: {}", config.eirgrid.timezone);
    info!(
        "   EU bands: {} / {} gCO2/kWh",
        config.analysis.eu_lower, config.analysis.eu_upper
    );
    info!(
        "   Guidance: {}",
        if config.guidance_available() {
            config.llm.model.as_str()
        } else {
            "disabled"
        }
    );

    match cli.command {
        Commands::Carbon(args) => run_carbon(&config, &args).await,
        Commands::FuelMix(args) => run_fuel_mix(&config, &args).await,
        Commands::DemandWind(args) => run_demand_wind(&config, &args).await,
        Commands::Analyze(args) => run_analyze(&config, &args),
        Commands::Config(args) => run_config(&config, &args),
    }
}

async fn run_carbon(config: &AppConfig, args: &CarbonArgs) -> Result<()> {
    let source = EirGridClient::new(&config.eirgrid)?;
    let analyzer = IntensityAnalyzer::new(&config.analysis)?;
    let now = source.now();

    let report = commands::carbon_report(&source, &analyzer, now).await?;
    let guidance = match llm_client(config, args.no_llm) {
        Some(client) => {
            commands::carbon_guidance(&client, &report, &config.analysis.metric_label).await
        }
        None => None,
    };

    let brief = CarbonBrief {
        source: source.name().to_owned(),
        generated_at: now,
        report,
        guidance,
    };
    write_intensity_extras(config, &brief.report, args.chart.as_deref(), args.csv.as_deref())?;
    print_carbon(&brief, args.format, &config.analysis.metric_label)
}

fn run_analyze(config: &AppConfig, args: &AnalyzeArgs) -> Result<()> {
    let analyzer = IntensityAnalyzer::new(&config.analysis)?;
    let report = commands::offline_report(&analyzer, &args.input, args.prior.as_deref())?;

    let brief = CarbonBrief {
        source: args.input.display().to_string(),
        generated_at: chrono::Local::now().naive_local(),
        report,
        guidance: None,
    };
    write_intensity_extras(config, &brief.report, args.chart.as_deref(), args.csv.as_deref())?;
    print_carbon(&brief, args.format, &config.analysis.metric_label)
}

async fn run_fuel_mix(config: &AppConfig, args: &FuelMixArgs) -> Result<()> {
    let source = EirGridClient::new(&config.eirgrid)?;
    let mix = commands::fuel_mix_report(&source, source.now()).await?;

    if let Some(path) = &args.chart {
        let svg = fuel_mix_svg(&mix, &config.charts.options())?;
        commands::write_file(&config.charts.resolve(path), &svg)?;
    }

    let guidance = match llm_client(config, args.no_llm) {
        Some(client) => commands::fuel_mix_guidance(&client, &mix).await,
        None => None,
    };
    let brief = FuelMixBrief { mix, guidance };

    match args.format {
        OutputFormat::Text => println!("{}", TableFormatter::format_fuel_mix(&brief)),
        OutputFormat::Json => println!("{}", to_json(&brief)?),
    }
    Ok(())
}

async fn run_demand_wind(config: &AppConfig, args: &DemandWindArgs) -> Result<()> {
    let source = EirGridClient::new(&config.eirgrid)?;
    let normalizer = RelativeNormalizer::new(
        config.analysis.quantile_low,
        config.analysis.quantile_high,
        config.analysis.degenerate_policy,
    )?;
    let report = commands::demand_wind_report(&source, &normalizer, source.now()).await?;

    if let Some(path) = &args.chart {
        let svg = demand_wind_svg(&report.demand, &report.wind, &config.charts.options())?;
        commands::write_file(&config.charts.resolve(path), &svg)?;
    }

    match args.format {
        OutputFormat::Text => println!(
            "{}",
            TableFormatter::format_demand_wind(&report, "Demand")
        ),
        OutputFormat::Json => println!("{}", to_json(&report)?),
    }
    Ok(())
}

fn run_config(config: &AppConfig, args: &ConfigArgs) -> Result<()> {
    println!("{}", toml::to_string_pretty(config)?);

    let result = config.validate_detailed();
    for issue in result.errors.iter().chain(&result.warnings) {
        println!("{:?}: {}", issue.severity, issue);
    }
    if result.valid {
        println!("Configuration is valid.");
    }

    if let Some(path) = &args.write {
        config.save(path)?;
    }
    Ok(())
}

/// Guidance client, or `None` when disabled or not configured
fn llm_client(config: &AppConfig, skip: bool) -> Option<OpenAiClient> {
    if skip || !config.guidance_available() {
        return None;
    }
    match OpenAiClient::new(&config.llm) {
        Ok(client) => Some(client),
        Err(e) => {
            warn!("⚠️ [LLM] Guidance disabled: {}", e);
            None
        }
    }
}

fn write_intensity_extras(
    config: &AppConfig,
    report: &IntensityReport,
    chart: Option<&std::path::Path>,
    csv: Option<&std::path::Path>,
) -> Result<()> {
    if let Some(path) = chart {
        let scheme = commands::chart_scheme(report);
        let svg = co2_trend_svg(&report.series, scheme, &config.charts.options())?;
        commands::write_file(&config.charts.resolve(path), &svg)?;
    }
    if let Some(path) = csv {
        CsvFormatter::write_series(&report.series, path)?;
        info!("💾 Wrote {}", path.display());
    }
    Ok(())
}

fn print_carbon(brief: &CarbonBrief, format: OutputFormat, metric: &str) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{}", TableFormatter::format_carbon(brief, metric)),
        OutputFormat::Json => println!("{}", to_json(brief)?),
    }
    Ok(())
}
