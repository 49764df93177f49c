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

mod validation;

pub use validation::ValidationResult;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gridpulse_adapters::{EirGridSettings, LlmSettings, Region};
use gridpulse_charts::ChartOptions;
use gridpulse_core::AnalysisSettings;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Files probed in the working directory when no `--config` is given
const DEFAULT_TOML_PATH: &str = "gridpulse.toml";
const DEFAULT_JSON_PATH: &str = "gridpulse.json";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Grid operator endpoints and region
    #[serde(default)]
    pub eirgrid: EirGridSettings,

    /// Classification thresholds
    #[serde(default)]
    pub analysis: AnalysisSettings,

    /// Language model guidance
    #[serde(default)]
    pub llm: LlmSettings,

    #[serde(default)]
    pub charts: ChartsConfig,

    #[serde(default)]
    pub system: SystemConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartsConfig {
    #[serde(default = "default_chart_width")]
    pub width: u32,
    #[serde(default = "default_chart_height")]
    pub height: u32,
    /// Directory relative chart paths are resolved against
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_chart_width() -> u32 {
    ChartOptions::default().width
}

fn default_chart_height() -> u32 {
    ChartOptions::default().height
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            width: default_chart_width(),
            height: default_chart_height(),
            output_dir: default_output_dir(),
        }
    }
}

impl ChartsConfig {
    pub fn options(&self) -> ChartOptions {
        ChartOptions {
            width: self.width,
            height: self.height,
        }
    }

    /// Absolute paths are kept, relative ones land in `output_dir`
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.output_dir.join(path)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Default tracing filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_owned()
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Order: the explicit `path`, then `gridpulse.toml`, then
    /// `gridpulse.json`, then defaults with environment overrides. The API
    /// key is taken from `OPENAI_API_KEY` whenever the file does not set one.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            let mut config = Self::from_file(path)?;
            config.fill_secrets(env_lookup);
            config.validate()?;
            return Ok(config);
        }

        for candidate in [DEFAULT_TOML_PATH, DEFAULT_JSON_PATH] {
            let candidate = Path::new(candidate);
            if candidate.exists() {
                let mut config = Self::from_file(candidate)?;
                config.fill_secrets(env_lookup);
                config.validate()?;
                return Ok(config);
            }
        }

        warn!("No configuration file found, using defaults with environment overrides");
        let mut config = Self::default();
        config.apply_overrides(env_lookup);
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML or JSON file, chosen by extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config: AppConfig = if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        };

        info!("✅ Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply `GRIDPULSE_*` overrides and the API key
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(region) = lookup("GRIDPULSE_REGION") {
            match region.parse::<Region>() {
                Ok(region) => self.eirgrid.region = region,
                Err(e) => warn!("Ignoring GRIDPULSE_REGION: {}", e),
            }
        }

        if let Some(level) = lookup("GRIDPULSE_LOG_LEVEL") {
            self.system.log_level = level;
        }

        if let Some(enabled) = lookup("GRIDPULSE_LLM_ENABLED")
            && let Ok(enabled) = enabled.parse::<bool>()
        {
            self.llm.enabled = enabled;
        }

        self.fill_secrets(lookup);
    }

    fn fill_secrets(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.llm.api_key.is_none()
            && let Some(key) = lookup("OPENAI_API_KEY")
            && !key.trim().is_empty()
        {
            self.llm.api_key = Some(key);
        }
    }

    /// Validate configuration with detailed error reporting
    pub fn validate_detailed(&self) -> ValidationResult {
        let mut result = ValidationResult::success();

        result.merge(self.validate_eirgrid());
        result.merge(self.validate_analysis());
        result.merge(self.validate_llm());

        if self.charts.width == 0 {
            result.add_error("charts.width", "Chart width must be greater than 0");
        }
        if self.charts.height == 0 {
            result.add_error("charts.height", "Chart height must be greater than 0");
        }

        let level = self.system.log_level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            result.add_warning(
                "system.log_level",
                format!(
                    "'{}' is not a plain level, it will be used as a filter directive",
                    self.system.log_level
                ),
            );
        }

        result
    }

    fn validate_eirgrid(&self) -> ValidationResult {
        let mut result = ValidationResult::success();
        let eirgrid = &self.eirgrid;

        for (field, url) in [
            ("eirgrid.dashboard_url", &eirgrid.dashboard_url),
            ("eirgrid.co2_forecast_url", &eirgrid.co2_forecast_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                result.add_error(field, format!("'{url}' is not an http(s) URL"));
            }
        }

        if let Err(e) = eirgrid.timezone() {
            result.add_error("eirgrid.timezone", e.to_string());
        }

        if eirgrid.timeout_secs == 0 {
            result.add_error("eirgrid.timeout_secs", "Timeout must be greater than 0");
        }

        if eirgrid.accept_invalid_certs {
            result.add_warning(
                "eirgrid.accept_invalid_certs",
                "TLS certificate verification is disabled",
            );
        }

        result
    }

    fn validate_analysis(&self) -> ValidationResult {
        let mut result = ValidationResult::success();
        let analysis = &self.analysis;

        if !analysis.eu_lower.is_finite() || !analysis.eu_upper.is_finite() {
            result.add_error("analysis.eu_lower", "EU bounds must be finite numbers");
        } else if analysis.eu_lower > analysis.eu_upper {
            result.add_error(
                "analysis.eu_lower",
                format!(
                    "EU lower bound ({}) must not exceed the upper bound ({})",
                    analysis.eu_lower, analysis.eu_upper
                ),
            );
        }

        for (field, quantile) in [
            ("analysis.quantile_low", analysis.quantile_low),
            ("analysis.quantile_high", analysis.quantile_high),
        ] {
            if !(quantile > 0.0 && quantile < 1.0) {
                result.add_error(field, format!("Quantile {quantile} must lie in (0, 1)"));
            }
        }
        if analysis.quantile_low > analysis.quantile_high {
            result.add_error(
                "analysis.quantile_low",
                format!(
                    "Low quantile ({}) must not exceed the high quantile ({})",
                    analysis.quantile_low, analysis.quantile_high
                ),
            );
        }

        if analysis.metric_label.trim().is_empty() {
            result.add_error("analysis.metric_label", "Metric label must not be empty");
        }

        result
    }

    fn validate_llm(&self) -> ValidationResult {
        let mut result = ValidationResult::success();
        let llm = &self.llm;

        if !llm.enabled {
            return result;
        }

        if llm.api_key.as_deref().is_none_or(|key| key.trim().is_empty()) {
            result.add_warning(
                "llm.api_key",
                "No API key configured (set OPENAI_API_KEY), guidance will be skipped",
            );
        }
        if !(0.0..=2.0).contains(&llm.temperature) {
            result.add_error("llm.temperature", "Temperature must lie in [0, 2]");
        }
        if llm.max_tokens == 0 {
            result.add_error("llm.max_tokens", "max_tokens must be greater than 0");
        }
        if llm.model.trim().is_empty() {
            result.add_error("llm.model", "Model name must not be empty");
        }

        result
    }

    /// Fail on the first batch of errors, log warnings
    pub fn validate(&self) -> Result<()> {
        let result = self.validate_detailed();
        for issue in &result.warnings {
            warn!("⚠️ [CONFIG] {}", issue);
        }
        if result.has_errors() {
            let messages: Vec<String> = result.errors.iter().map(ToString::to_string).collect();
            anyhow::bail!("Invalid configuration: {}", messages.join("; "));
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// LLM guidance is attempted only with a key at hand
    pub fn guidance_available(&self) -> bool {
        self.llm.enabled && self.llm.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridpulse_core::DegeneratePolicy;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.eirgrid.region, Region::All);
        assert_eq!(config.eirgrid.timezone, "Europe/Dublin");
        assert!((config.analysis.eu_lower - 250.0).abs() < f64::EPSILON);
        assert!((config.analysis.eu_upper - 500.0).abs() < f64::EPSILON);
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
        assert_eq!(config.llm.max_tokens, 600);
        assert_eq!(config.system.log_level, "info");

        let result = config.validate_detailed();
        assert!(result.valid);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_serialization() {
        let mut config = AppConfig::default();
        config.analysis.degenerate_policy = DegeneratePolicy::Reject;
        config.charts.output_dir = PathBuf::from("/tmp/charts");

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_json_serialization() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_api_key_is_not_serialized() {
        let mut config = AppConfig::default();
        config.llm.api_key = Some("sk-secret".to_owned());

        let toml_str = toml::to_string(&config).unwrap();
        assert!(!toml_str.contains("sk-secret"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
            [eirgrid]
            region = "NI"

            [analysis]
            quantile_low = 0.25
            degenerate_policy = "reject"
        "#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.eirgrid.region, Region::Ni);
        assert_eq!(config.eirgrid.timeout_secs, 10);
        assert!((config.analysis.quantile_low - 0.25).abs() < f64::EPSILON);
        assert!((config.analysis.quantile_high - 0.66).abs() < f64::EPSILON);
        assert_eq!(config.analysis.degenerate_policy, DegeneratePolicy::Reject);
        assert_eq!(config.charts.width, 1000);
    }

    #[test]
    fn test_load_explicit_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[charts]\nwidth = 640\nheight = 480\n\n[llm]\nenabled = false").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.charts.options(), ChartOptions { width: 640, height: 480 });
        assert!(!config.llm.enabled);
    }

    #[test]
    fn test_load_explicit_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"eirgrid": {{"region": "ROI"}}, "system": {{"log_level": "debug"}}}}"#).unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.eirgrid.region, Region::Roi);
        assert_eq!(config.system.log_level, "debug");
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[analysis]\neu_lower = 600.0\neu_upper = 100.0").unwrap();

        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("analysis.eu_lower"));
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[eirgrid]\nregion = \"MARS\"").unwrap();

        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gridpulse.toml");

        let mut config = AppConfig::default();
        config.eirgrid.region = Region::Ni;
        config.save(&path).unwrap();

        let loaded = AppConfig::from_file(&path).unwrap();
        assert_eq!(loaded.eirgrid.region, Region::Ni);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_overrides(lookup_from(&[
            ("GRIDPULSE_REGION", "roi"),
            ("GRIDPULSE_LOG_LEVEL", "debug"),
            ("GRIDPULSE_LLM_ENABLED", "false"),
            ("OPENAI_API_KEY", "sk-test"),
        ]));

        assert_eq!(config.eirgrid.region, Region::Roi);
        assert_eq!(config.system.log_level, "debug");
        assert!(!config.llm.enabled);
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_env_overrides_ignore_garbage() {
        let mut config = AppConfig::default();
        config.apply_overrides(lookup_from(&[
            ("GRIDPULSE_REGION", "atlantis"),
            ("GRIDPULSE_LLM_ENABLED", "maybe"),
            ("OPENAI_API_KEY", "   "),
        ]));

        assert_eq!(config.eirgrid.region, Region::All);
        assert!(config.llm.enabled);
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn test_file_key_wins_over_env() {
        let mut config = AppConfig::default();
        config.llm.api_key = Some("sk-file".to_owned());
        config.fill_secrets(lookup_from(&[("OPENAI_API_KEY", "sk-env")]));

        assert_eq!(config.llm.api_key.as_deref(), Some("sk-file"));
    }

    #[test]
    fn test_validate_quantiles() {
        let mut config = AppConfig::default();
        config.analysis.quantile_low = 0.8;
        config.analysis.quantile_high = 1.2;

        let result = config.validate_detailed();
        let fields: Vec<_> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["analysis.quantile_high"]);

        config.analysis.quantile_low = 1.2;
        config.analysis.quantile_high = 0.5;
        let result = config.validate_detailed();
        let fields: Vec<_> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["analysis.quantile_low", "analysis.quantile_low"]);
    }

    #[test]
    fn test_validate_quantile_order() {
        let mut config = AppConfig::default();
        config.analysis.quantile_low = 0.7;
        config.analysis.quantile_high = 0.4;

        let result = config.validate_detailed();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, "analysis.quantile_low");
        assert!(result.errors[0].message.contains("must not exceed"));
    }

    #[test]
    fn test_validate_bad_timezone() {
        let mut config = AppConfig::default();
        config.eirgrid.timezone = "Europe/Atlantis".to_owned();

        let result = config.validate_detailed();
        assert!(result.errors.iter().any(|e| e.field == "eirgrid.timezone"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_chart_size() {
        let mut config = AppConfig::default();
        config.charts.height = 0;

        assert!(
            config
                .validate()
                .unwrap_err()
                .to_string()
                .contains("charts.height")
        );
    }

    #[test]
    fn test_missing_api_key_is_a_warning() {
        let config = AppConfig::default();
        let result = config.validate_detailed();

        assert!(result.valid);
        assert!(result.warnings.iter().any(|w| w.field == "llm.api_key"));
        assert!(!config.guidance_available());

        let mut disabled = AppConfig::default();
        disabled.llm.enabled = false;
        assert!(
            !disabled
                .validate_detailed()
                .warnings
                .iter()
                .any(|w| w.field == "llm.api_key")
        );
    }

    #[test]
    fn test_chart_paths_resolve_against_output_dir() {
        let charts = ChartsConfig {
            output_dir: PathBuf::from("/srv/charts"),
            ..ChartsConfig::default()
        };

        assert_eq!(
            charts.resolve(Path::new("co2.svg")),
            PathBuf::from("/srv/charts/co2.svg")
        );
        assert_eq!(
            charts.resolve(Path::new("/tmp/co2.svg")),
            PathBuf::from("/tmp/co2.svg")
        );
    }
}
