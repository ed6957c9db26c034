/// Assembles the report document.
///
/// Produces a single self-contained HTML file: run header with dataset
/// metadata and cleaning statistics, borough summary table with per-100k
/// rates, the four inlined SVG charts, the trend model summary, and the
/// forecast table. No external assets and no scripting, so the file can
/// be archived or mailed as-is.

use std::fs;
use std::path::Path;

use crate::analysis::forecast::ForecastBand;
use crate::analysis::groupings::{BoroughCount, BoroughYearTable, HourHistogram, MonthCount};
use crate::analysis::regression::LinearTrend;
use crate::ingest::socrata::DatasetMetadata;
use crate::model::CleanStats;
use crate::report::charts::{self, xml_escape};

/// Everything the renderer needs, borrowed from the pipeline stages.
pub struct ReportContext<'a> {
    pub metadata: Option<&'a DatasetMetadata>,
    pub stats: &'a CleanStats,
    pub boroughs: &'a [BoroughCount],
    pub hours: &'a HourHistogram,
    pub months: &'a [MonthCount],
    pub borough_years: &'a BoroughYearTable,
    pub trend: &'a LinearTrend,
    pub forecast: &'a ForecastBand,
    pub chart_width: u32,
    pub chart_height: u32,
}

// ---------------------------------------------------------------------------
// Document assembly
// ---------------------------------------------------------------------------

/// Renders the full HTML document.
pub fn render_report(ctx: &ReportContext) -> String {
    let mut html = String::with_capacity(64 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let title = ctx
        .metadata
        .map(|m| m.name.as_str())
        .unwrap_or("Shooting Incident Trends");
    html.push_str(&format!("<title>{}</title>\n", xml_escape(title)));
    html.push_str(STYLE);
    html.push_str("</head>\n<body>\n");

    push_header(&mut html, ctx);
    push_borough_section(&mut html, ctx);
    push_time_sections(&mut html, ctx);
    push_trend_section(&mut html, ctx);
    push_forecast_section(&mut html, ctx);

    html.push_str("</body>\n</html>\n");
    html
}

/// Writes the rendered document to `path`, creating parent directories
/// as needed.
pub fn write_report(path: &str, html: &str) -> Result<(), std::io::Error> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, html)
}

const STYLE: &str = "<style>\n\
    body { font-family: sans-serif; max-width: 64em; margin: 2em auto; color: #1a202c; }\n\
    table { border-collapse: collapse; margin: 1em 0; }\n\
    th, td { border: 1px solid #cbd5e0; padding: 0.35em 0.8em; text-align: right; }\n\
    th:first-child, td:first-child { text-align: left; }\n\
    caption { text-align: left; font-weight: bold; padding-bottom: 0.4em; }\n\
    .note { color: #4a5568; font-size: 0.9em; }\n\
    </style>\n";

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn push_header(html: &mut String, ctx: &ReportContext) {
    match ctx.metadata {
        Some(meta) => {
            html.push_str(&format!("<h1>{}</h1>\n", xml_escape(&meta.name)));
            if let Some(updated) = meta.rows_updated {
                html.push_str(&format!(
                    "<p class=\"note\">Dataset rows last updated {}.</p>\n",
                    updated.format("%Y-%m-%d")
                ));
            }
            if let Some(description) = &meta.description {
                html.push_str(&format!("<p class=\"note\">{}</p>\n", xml_escape(description)));
            }
        }
        None => html.push_str("<h1>Shooting Incident Trends</h1>\n"),
    }

    let stats = ctx.stats;
    html.push_str("<table>\n<caption>Cleaning summary</caption>\n");
    html.push_str("<tr><th>Measure</th><th>Rows</th></tr>\n");
    html.push_str(&format!("<tr><td>Rows in export</td><td>{}</td></tr>\n", stats.total_rows));
    html.push_str(&format!("<tr><td>Rows kept</td><td>{}</td></tr>\n", stats.kept));
    html.push_str(&format!(
        "<tr><td>Dropped (unparseable date)</td><td>{}</td></tr>\n",
        stats.dropped_bad_date
    ));
    html.push_str(&format!(
        "<tr><td>Kept without a parseable time</td><td>{}</td></tr>\n",
        stats.time_defaulted
    ));
    html.push_str(&format!(
        "<tr><td>Kept with unrecognized borough</td><td>{}</td></tr>\n",
        stats.unknown_borough
    ));
    html.push_str("</table>\n");
}

fn push_borough_section(html: &mut String, ctx: &ReportContext) {
    html.push_str("<h2>Incidents by borough</h2>\n");
    html.push_str("<table>\n<caption>Totals and population-adjusted rates</caption>\n");
    html.push_str("<tr><th>Borough</th><th>Incidents</th><th>Per 100k residents</th></tr>\n");
    for row in ctx.boroughs {
        let rate = match row.rate_per_100k {
            Some(rate) => format!("{:.1}", rate),
            None => "&mdash;".to_string(),
        };
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            row.borough.as_str(),
            row.count,
            rate
        ));
    }
    html.push_str("</table>\n");

    let labels: Vec<String> = ctx
        .boroughs
        .iter()
        .map(|r| r.borough.as_str().to_string())
        .collect();
    let values: Vec<u64> = ctx.boroughs.iter().map(|r| r.count).collect();
    html.push_str(&charts::bar_chart(
        "Incidents by borough",
        &labels,
        &values,
        ctx.chart_width,
        ctx.chart_height,
    ));

    // Borough × year comparison.
    if !ctx.borough_years.years.is_empty() {
        let year_labels: Vec<String> =
            ctx.borough_years.years.iter().map(|y| y.to_string()).collect();
        let series: Vec<(String, Vec<u64>)> = ctx
            .borough_years
            .rows
            .iter()
            .map(|(borough, cells)| (borough.as_str().to_string(), cells.clone()))
            .collect();
        html.push_str(&charts::multi_line_chart(
            "Incidents per year by borough",
            &year_labels,
            &series,
            ctx.chart_width,
            ctx.chart_height,
        ));
        push_legend(html, &series);
    }
}

fn push_legend(html: &mut String, series: &[(String, Vec<u64>)]) {
    html.push_str("<p class=\"note\">");
    for (idx, (name, _)) in series.iter().enumerate() {
        let color = charts::PALETTE[idx % charts::PALETTE.len()];
        html.push_str(&format!(
            "<span style=\"color:{}\">&#9632;</span> {} &nbsp; ",
            color,
            xml_escape(name)
        ));
    }
    html.push_str("</p>\n");
}

fn push_time_sections(html: &mut String, ctx: &ReportContext) {
    html.push_str("<h2>When incidents occur</h2>\n");

    let hour_labels: Vec<String> = ctx.hours.bins.iter().map(|b| b.hour.to_string()).collect();
    let hour_values: Vec<u64> = ctx.hours.bins.iter().map(|b| b.count).collect();
    html.push_str(&charts::bar_chart(
        "Incidents by hour of day",
        &hour_labels,
        &hour_values,
        ctx.chart_width,
        ctx.chart_height,
    ));
    if ctx.hours.untimed > 0 {
        html.push_str(&format!(
            "<p class=\"note\">{} incidents had no parseable occurrence time and are not binned above.</p>\n",
            ctx.hours.untimed
        ));
    }

    let month_labels: Vec<String> = ctx.months.iter().map(|m| m.label()).collect();
    let month_series = vec![(
        "All boroughs".to_string(),
        ctx.months.iter().map(|m| m.count).collect::<Vec<u64>>(),
    )];
    html.push_str(&charts::multi_line_chart(
        "Incidents per month",
        &month_labels,
        &month_series,
        ctx.chart_width,
        ctx.chart_height,
    ));
}

fn push_trend_section(html: &mut String, ctx: &ReportContext) {
    let trend = ctx.trend;
    html.push_str("<h2>Annual trend</h2>\n");
    html.push_str("<table>\n<caption>Linear fit of annual totals against calendar year</caption>\n");
    html.push_str("<tr><th>Statistic</th><th>Value</th></tr>\n");
    html.push_str(&format!(
        "<tr><td>Slope (incidents / year)</td><td>{:+.1}</td></tr>\n",
        trend.slope
    ));
    html.push_str(&format!("<tr><td>Intercept</td><td>{:.1}</td></tr>\n", trend.intercept));
    html.push_str(&format!("<tr><td>R&sup2;</td><td>{:.3}</td></tr>\n", trend.r_squared));
    html.push_str(&format!(
        "<tr><td>Residual std. error</td><td>{:.1}</td></tr>\n",
        trend.residual_std_error
    ));
    html.push_str(&format!("<tr><td>Years fitted</td><td>{}</td></tr>\n", trend.n));
    html.push_str("</table>\n");
}

fn push_forecast_section(html: &mut String, ctx: &ReportContext) {
    let forecast = ctx.forecast;
    html.push_str("<h2>Monthly forecast</h2>\n");

    let history: Vec<f64> = ctx.months.iter().map(|m| m.count as f64).collect();
    let labels = chart_labels_with_horizon(ctx.months, forecast.point.len());
    html.push_str(&charts::forecast_chart(
        &format!(
            "Monthly incidents with {:.0}% confidence band",
            forecast.confidence_level * 100.0
        ),
        &labels,
        &history,
        forecast,
        ctx.chart_width,
        ctx.chart_height,
    ));

    html.push_str("<table>\n<caption>Forecast by month</caption>\n");
    html.push_str("<tr><th>Month</th><th>Lower</th><th>Point</th><th>Upper</th></tr>\n");
    let forecast_labels = &labels[ctx.months.len()..];
    for (i, label) in forecast_labels.iter().enumerate() {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{:.0}</td><td>{:.0}</td><td>{:.0}</td></tr>\n",
            label, forecast.lower[i], forecast.point[i], forecast.upper[i]
        ));
    }
    html.push_str("</table>\n");
    html.push_str(
        "<p class=\"note\">Band widths reflect in-sample residual spread and widen with the horizon; \
         treat the point values as a short-range extrapolation, not a prediction of policy outcomes.</p>\n",
    );
}

/// Month labels for the forecast chart: the observed labels followed by
/// `horizon` continuation months.
fn chart_labels_with_horizon(months: &[MonthCount], horizon: usize) -> Vec<String> {
    let mut labels: Vec<String> = months.iter().map(|m| m.label()).collect();

    let (mut year, mut month) = match months.last() {
        Some(last) => (last.year, last.month),
        None => return labels,
    };
    for _ in 0..horizon {
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
        labels.push(format!("{}-{:02}", year, month));
    }
    labels
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::groupings::{BoroughCount, HourCount};
    use crate::model::Borough;

    fn month(year: i32, month: u32, count: u64) -> MonthCount {
        MonthCount { year, month, count }
    }

    fn sample_context_parts() -> (
        CleanStats,
        Vec<BoroughCount>,
        HourHistogram,
        Vec<MonthCount>,
        BoroughYearTable,
        LinearTrend,
        ForecastBand,
    ) {
        let stats = CleanStats {
            total_rows: 100,
            kept: 98,
            dropped_bad_date: 2,
            time_defaulted: 3,
            unknown_borough: 1,
        };
        let boroughs = vec![
            BoroughCount {
                borough: Borough::Brooklyn,
                count: 40,
                rate_per_100k: Some(1.46),
            },
            BoroughCount { borough: Borough::Unknown, count: 1, rate_per_100k: None },
        ];
        let hours = HourHistogram {
            bins: (0..24).map(|h| HourCount { hour: h, count: 4 }).collect(),
            untimed: 3,
        };
        let months = vec![month(2021, 10, 30), month(2021, 11, 35), month(2021, 12, 33)];
        let borough_years = BoroughYearTable {
            years: vec![2020, 2021],
            rows: vec![
                (Borough::Brooklyn, vec![20, 20]),
                (Borough::Queens, vec![10, 12]),
            ],
        };
        let trend = LinearTrend {
            slope: -12.5,
            intercept: 26_000.0,
            r_squared: 0.84,
            residual_std_error: 41.0,
            n: 16,
        };
        let forecast = ForecastBand {
            point: vec![32.0, 31.0],
            lower: vec![25.0, 22.0],
            upper: vec![39.0, 40.0],
            confidence_level: 0.95,
        };
        (stats, boroughs, hours, months, borough_years, trend, forecast)
    }

    #[test]
    fn test_render_report_contains_every_section() {
        let (stats, boroughs, hours, months, borough_years, trend, forecast) =
            sample_context_parts();
        let html = render_report(&ReportContext {
            metadata: None,
            stats: &stats,
            boroughs: &boroughs,
            hours: &hours,
            months: &months,
            borough_years: &borough_years,
            trend: &trend,
            forecast: &forecast,
            chart_width: 720,
            chart_height: 360,
        });

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h2>Incidents by borough</h2>"));
        assert!(html.contains("<h2>When incidents occur</h2>"));
        assert!(html.contains("<h2>Annual trend</h2>"));
        assert!(html.contains("<h2>Monthly forecast</h2>"));
        // All five charts made it in: 2 bar, 1 comparative line, 1 monthly
        // line, 1 forecast.
        assert_eq!(html.matches("<svg ").count(), 5);
    }

    #[test]
    fn test_render_report_uses_metadata_when_present() {
        let (stats, boroughs, hours, months, borough_years, trend, forecast) =
            sample_context_parts();
        let metadata = DatasetMetadata {
            name: "NYPD Shooting Incident Data (Historic)".to_string(),
            description: Some("List of every shooting incident".to_string()),
            rows_updated: chrono::DateTime::from_timestamp(1714579200, 0),
        };
        let html = render_report(&ReportContext {
            metadata: Some(&metadata),
            stats: &stats,
            boroughs: &boroughs,
            hours: &hours,
            months: &months,
            borough_years: &borough_years,
            trend: &trend,
            forecast: &forecast,
            chart_width: 720,
            chart_height: 360,
        });

        assert!(html.contains("<h1>NYPD Shooting Incident Data (Historic)</h1>"));
        assert!(html.contains("2024-05-01"), "rowsUpdatedAt should render as a date");
    }

    #[test]
    fn test_render_report_shows_cleaning_counts_and_rates() {
        let (stats, boroughs, hours, months, borough_years, trend, forecast) =
            sample_context_parts();
        let html = render_report(&ReportContext {
            metadata: None,
            stats: &stats,
            boroughs: &boroughs,
            hours: &hours,
            months: &months,
            borough_years: &borough_years,
            trend: &trend,
            forecast: &forecast,
            chart_width: 720,
            chart_height: 360,
        });

        assert!(html.contains("<td>Rows in export</td><td>100</td>"));
        assert!(html.contains("<td>Dropped (unparseable date)</td><td>2</td>"));
        // Unknown borough renders a dash, not a rate.
        assert!(html.contains("<td>Unknown</td><td>1</td><td>&mdash;</td>"));
        assert!(html.contains("1.5"), "Brooklyn rate rounds to one decimal");
    }

    #[test]
    fn test_forecast_table_rows_follow_observed_months() {
        let (stats, boroughs, hours, months, borough_years, trend, forecast) =
            sample_context_parts();
        let html = render_report(&ReportContext {
            metadata: None,
            stats: &stats,
            boroughs: &boroughs,
            hours: &hours,
            months: &months,
            borough_years: &borough_years,
            trend: &trend,
            forecast: &forecast,
            chart_width: 720,
            chart_height: 360,
        });

        // History ends at 2021-12; two forecast rows continue into 2022.
        assert!(html.contains("<td>2022-01</td><td>25</td><td>32</td><td>39</td>"));
        assert!(html.contains("<td>2022-02</td><td>22</td><td>31</td><td>40</td>"));
    }

    #[test]
    fn test_chart_labels_with_horizon_crosses_year_boundary() {
        let months = vec![month(2023, 11, 10), month(2023, 12, 12)];
        let labels = chart_labels_with_horizon(&months, 3);
        assert_eq!(labels, vec!["2023-11", "2023-12", "2024-01", "2024-02", "2024-03"]);
    }

    #[test]
    fn test_chart_labels_with_horizon_empty_history() {
        assert!(chart_labels_with_horizon(&[], 5).is_empty());
    }

    #[test]
    fn test_write_report_creates_parent_directories() {
        let dir = std::env::temp_dir().join("shooting_trends_render_test");
        let path = dir.join("nested").join("report.html");
        let path_str = path.to_str().unwrap();

        write_report(path_str, "<html></html>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<html></html>");

        fs::remove_dir_all(&dir).unwrap();
    }
}
