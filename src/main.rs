//! Shooting Incident Trends - Report Generator
//!
//! A one-shot pipeline that:
//! 1. Downloads the NYPD Shooting Incident Data (Historic) CSV export
//!    from NYC Open Data (or reads a local copy)
//! 2. Cleans the date, time, and borough columns
//! 3. Aggregates by month, year, hour of day, and borough
//! 4. Fits a linear trend to the annual totals and an integrated AR
//!    forecast to the monthly series
//! 5. Renders a single self-contained HTML report with inline SVG charts
//!
//! Usage:
//!   cargo run --release                              # Fetch and render with defaults
//!   cargo run --release -- --input export.csv        # Use a local CSV, no network
//!   cargo run --release -- --output out/trends.html  # Override the output path
//!   cargo run --release -- --horizon 6               # Forecast 6 months ahead
//!   cargo run --release -- --config custom.toml      # Use a different config file

use std::env;

use shooting_trends::analysis::forecast::ArForecaster;
use shooting_trends::analysis::groupings;
use shooting_trends::analysis::regression;
use shooting_trends::config;
use shooting_trends::ingest::records;
use shooting_trends::ingest::socrata;
use shooting_trends::report::render::{self, ReportContext};

fn main() {
    println!("🗽 Shooting Incident Trends");
    println!("===========================\n");

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut input_file: Option<String> = None;
    let mut output_override: Option<String> = None;
    let mut horizon_override: Option<usize> = None;
    let mut config_path = "report.toml".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                if i + 1 < args.len() {
                    input_file = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --input requires a file path");
                    std::process::exit(1);
                }
            }
            "--output" => {
                if i + 1 < args.len() {
                    output_override = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --output requires a file path");
                    std::process::exit(1);
                }
            }
            "--horizon" => {
                if i + 1 < args.len() {
                    match args[i + 1].parse() {
                        Ok(n) => horizon_override = Some(n),
                        Err(_) => {
                            eprintln!("Error: --horizon requires a number of months");
                            std::process::exit(1);
                        }
                    }
                    i += 2;
                } else {
                    eprintln!("Error: --horizon requires a number of months");
                    std::process::exit(1);
                }
            }
            "--config" => {
                if i + 1 < args.len() {
                    config_path = args[i + 1].clone();
                    i += 2;
                } else {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!(
                    "Usage: {} [--input FILE] [--output PATH] [--horizon MONTHS] [--config FILE]",
                    args[0]
                );
                std::process::exit(1);
            }
        }
    }

    let mut cfg = config::load_or_default(&config_path);
    if let Some(horizon) = horizon_override {
        cfg.forecast.horizon_months = horizon;
    }
    if let Some(output) = output_override {
        cfg.output.path = output;
    }

    // Acquire the CSV export and, when fetching, the dataset metadata.
    let (csv_text, metadata) = match &input_file {
        Some(path) => {
            println!("📂 Reading local export from {}...", path);
            match std::fs::read_to_string(path) {
                Ok(text) => (text, None),
                Err(e) => {
                    eprintln!("\n❌ Failed to read {}: {}\n", path, e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            let csv_url = socrata::build_csv_url(&cfg.dataset.base_url, &cfg.dataset.id);
            println!("📥 Downloading dataset {} from {}...", cfg.dataset.id, cfg.dataset.base_url);

            let client = match socrata::make_client(cfg.dataset.http_timeout_secs) {
                Ok(client) => client,
                Err(e) => {
                    eprintln!("\n❌ {}\n", e);
                    std::process::exit(1);
                }
            };

            let text = match socrata::fetch_csv(&client, &csv_url) {
                Ok(text) => text,
                Err(e) => {
                    eprintln!("\n❌ Download failed: {}\n", e);
                    std::process::exit(1);
                }
            };
            println!("   ✓ {} bytes received", text.len());

            // Metadata is cosmetic (report header); a failure here only
            // costs the header, not the report.
            let metadata_url = socrata::build_metadata_url(&cfg.dataset.base_url, &cfg.dataset.id);
            let metadata = match socrata::fetch_metadata(&client, &metadata_url) {
                Ok(meta) => {
                    println!("   ✓ Dataset: {}", meta.name);
                    Some(meta)
                }
                Err(e) => {
                    eprintln!("   ⚠ Metadata fetch failed, continuing without it: {}", e);
                    None
                }
            };
            (text, metadata)
        }
    };

    // Clean
    println!("\n🧹 Cleaning rows...");
    let parsed = match records::parse_incident_csv(&csv_text) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("\n❌ Cleaning failed: {}\n", e);
            std::process::exit(1);
        }
    };
    let stats = &parsed.stats;
    println!(
        "   ✓ {} rows kept of {} ({} dropped for bad dates, {} missing times, {} unknown boroughs)",
        stats.kept, stats.total_rows, stats.dropped_bad_date, stats.time_defaulted,
        stats.unknown_borough
    );

    // Aggregate
    println!("\n📊 Aggregating...");
    let years = groupings::count_by_year(&parsed.incidents);
    let months = groupings::count_by_month(&parsed.incidents);
    let hours = groupings::count_by_hour(&parsed.incidents);
    let boroughs = groupings::count_by_borough(&parsed.incidents);
    let borough_years = groupings::count_by_borough_year(&parsed.incidents);
    println!("   ✓ {} years, {} months", years.len(), months.len());

    // Model
    println!("\n📈 Fitting models...");
    let trend = match regression::annual_trend(&years) {
        Ok(trend) => {
            println!(
                "   ✓ Annual trend: {:+.1} incidents/year (R² = {:.3})",
                trend.slope, trend.r_squared
            );
            trend
        }
        Err(e) => {
            eprintln!("\n❌ Trend fit failed: {}\n", e);
            std::process::exit(1);
        }
    };

    let monthly_series: Vec<f64> = months.iter().map(|m| m.count as f64).collect();
    let forecast = fit_forecast(&cfg, &monthly_series).unwrap_or_else(|e| {
        eprintln!("\n❌ Forecast failed: {}\n", e);
        std::process::exit(1);
    });
    println!(
        "   ✓ {}-month forecast at {:.0}% confidence",
        forecast.point.len(),
        forecast.confidence_level * 100.0
    );

    // Render
    println!("\n📝 Rendering report...");
    let html = render::render_report(&ReportContext {
        metadata: metadata.as_ref(),
        stats,
        boroughs: &boroughs,
        hours: &hours,
        months: &months,
        borough_years: &borough_years,
        trend: &trend,
        forecast: &forecast,
        chart_width: cfg.charts.width,
        chart_height: cfg.charts.height,
    });

    if let Err(e) = render::write_report(&cfg.output.path, &html) {
        eprintln!("\n❌ Failed to write {}: {}\n", cfg.output.path, e);
        std::process::exit(1);
    }
    println!("   ✓ Wrote {} ({} bytes)\n", cfg.output.path, html.len());
}

fn fit_forecast(
    cfg: &config::ReportConfig,
    monthly_series: &[f64],
) -> Result<shooting_trends::analysis::forecast::ForecastBand, String> {
    let mut model = ArForecaster::new(cfg.forecast.ar_order, cfg.forecast.differencing)?;
    model.fit(monthly_series)?;
    model.forecast(cfg.forecast.horizon_months, cfg.forecast.confidence_level)
}
