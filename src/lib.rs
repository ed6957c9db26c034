/// shooting_trends: NYPD shooting incident trend report generator.
///
/// # Module structure
///
/// ```text
/// shooting_trends
/// ├── model       — shared data types (Incident, Borough, CleanStats, IngestError)
/// ├── config      — report configuration loader (report.toml)
/// ├── boroughs    — borough registry with census populations for per-100k rates
/// ├── ingest
/// │   ├── socrata — NYC Open Data API: URL construction, CSV + metadata fetch
/// │   ├── records — CSV parsing and row-level cleaning
/// │   └── fixtures (test only) — representative export and metadata payloads
/// ├── analysis
/// │   ├── groupings  — aggregation by year, month, hour of day, and borough
/// │   ├── regression — OLS linear trend over annual totals
/// │   └── forecast   — integrated AR forecast of the monthly series
/// └── report
///     ├── charts  — inline SVG bar, line, and forecast charts
///     └── render  — HTML document assembly and output
/// ```

/// Public modules
pub mod analysis;
pub mod boroughs;
pub mod config;
pub mod ingest;
pub mod model;
pub mod report;
