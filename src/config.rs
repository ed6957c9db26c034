/// Report configuration loader - parses report.toml
///
/// Separates run parameters from code, making it easy to point the report
/// at a different Socrata dataset, change the forecast horizon, or resize
/// charts without recompiling. Every field has a built-in default so the
/// binary also runs with no configuration file at all.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Root configuration structure for TOML parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ReportConfig {
    pub dataset: DatasetConfig,
    pub forecast: ForecastConfig,
    pub charts: ChartConfig,
    pub output: OutputConfig,
}

/// Which Socrata dataset to pull and how patiently.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Socrata 4x4 dataset id.
    pub id: String,
    /// Portal base URL, no trailing slash.
    pub base_url: String,
    /// HTTP timeout for the CSV download. The full historic export is
    /// tens of megabytes, so this is generous.
    pub http_timeout_secs: u64,
}

/// Forecast model parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Months to forecast past the end of the observed series.
    pub horizon_months: usize,
    /// Autoregressive order fitted on the differenced monthly series.
    pub ar_order: usize,
    /// Differencing passes applied before fitting.
    pub differencing: usize,
    /// Confidence level for the forecast band (0.80, 0.90, 0.95, or 0.99).
    pub confidence_level: f64,
}

/// Rendered chart dimensions in pixels.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
}

/// Where the rendered document lands.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        DatasetConfig {
            // NYPD Shooting Incident Data (Historic) on NYC Open Data.
            id: "833y-fsy8".to_string(),
            base_url: "https://data.cityofnewyork.us".to_string(),
            http_timeout_secs: 120,
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        ForecastConfig {
            horizon_months: 12,
            ar_order: 3,
            differencing: 1,
            confidence_level: 0.95,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig { width: 720, height: 360 }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig { path: "report.html".to_string() }
    }
}

/// Loads configuration from the given TOML file.
///
/// # Panics
/// Panics if the file exists but cannot be read or parsed. A malformed
/// config is a setup error, not a condition to paper over at run time.
pub fn load_config(path: &str) -> ReportConfig {
    let contents = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e));

    toml::from_str(&contents)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path, e))
}

/// Loads configuration from `path` if it exists, otherwise returns the
/// built-in defaults. The report needs no configuration to run against
/// the canonical dataset.
pub fn load_or_default(path: &str) -> ReportConfig {
    if Path::new(path).exists() {
        load_config(path)
    } else {
        ReportConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_target_canonical_dataset() {
        let config = ReportConfig::default();
        assert_eq!(config.dataset.id, "833y-fsy8");
        assert!(config.dataset.base_url.starts_with("https://"));
        assert!(!config.dataset.base_url.ends_with('/'), "base_url must not have trailing slash");
    }

    #[test]
    fn test_default_forecast_parameters_are_sane() {
        let config = ReportConfig::default();
        assert_eq!(config.forecast.horizon_months, 12);
        assert!(config.forecast.ar_order >= 1);
        assert!(config.forecast.differencing <= 2);
        assert!(config.forecast.confidence_level > 0.0 && config.forecast.confidence_level < 1.0);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults_per_section() {
        let parsed: ReportConfig = toml::from_str(
            r#"
            [forecast]
            horizon_months = 6
            "#,
        )
        .expect("partial config should parse");

        assert_eq!(parsed.forecast.horizon_months, 6);
        // Unspecified fields within the section fall back too.
        assert_eq!(parsed.forecast.ar_order, 3);
        // Untouched sections are fully defaulted.
        assert_eq!(parsed.dataset.id, "833y-fsy8");
        assert_eq!(parsed.output.path, "report.html");
    }

    #[test]
    fn test_load_or_default_with_missing_file() {
        let config = load_or_default("definitely/not/a/real/path.toml");
        assert_eq!(config.dataset.id, "833y-fsy8");
    }

    #[test]
    fn test_full_toml_round_trip() {
        let parsed: ReportConfig = toml::from_str(
            r#"
            [dataset]
            id = "abcd-1234"
            base_url = "https://example.socrata.test"
            http_timeout_secs = 30

            [forecast]
            horizon_months = 24
            ar_order = 2
            differencing = 0
            confidence_level = 0.90

            [charts]
            width = 800
            height = 400

            [output]
            path = "out/incidents.html"
            "#,
        )
        .expect("full config should parse");

        assert_eq!(parsed.dataset.id, "abcd-1234");
        assert_eq!(parsed.forecast.horizon_months, 24);
        assert_eq!(parsed.charts.width, 800);
        assert_eq!(parsed.output.path, "out/incidents.html");
    }
}
