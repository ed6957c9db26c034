/// CSV parsing and cleaning for the incident export.
///
/// The Socrata export is a wide table (20+ columns, quoted free-text
/// fields with embedded commas); the report consumes exactly three of
/// them:
///   - OCCUR_DATE — MM/DD/YYYY
///   - OCCUR_TIME — HH:MM:SS, 24-hour
///   - BORO       — uppercase borough name
///
/// Columns are located by header name, not position, so upstream column
/// reordering does not break the parse. Row-level damage is handled
/// row-by-row: a bad date drops the row, a bad time keeps the row with
/// `time = None`, an unrecognized borough keeps the row as `Unknown`.
/// Every drop and default is counted in `CleanStats`.

use chrono::{NaiveDate, NaiveTime};

use crate::model::{Borough, CleanStats, Incident, IngestError};

/// Header names consumed from the export.
pub const COL_DATE: &str = "OCCUR_DATE";
pub const COL_TIME: &str = "OCCUR_TIME";
pub const COL_BORO: &str = "BORO";

const DATE_FORMAT: &str = "%m/%d/%Y";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Result of the parse-and-clean pass.
#[derive(Debug, Clone)]
pub struct ParsedIncidents {
    pub incidents: Vec<Incident>,
    pub stats: CleanStats,
}

/// Parses the raw CSV export text into cleaned `Incident` records.
///
/// # Errors
/// - `IngestError::ParseError` — unreadable header row, or any of the
///   three required columns missing (schema drift in the remote CSV).
/// - `IngestError::NoDataAvailable` — the CSV parsed but produced zero
///   usable rows.
pub fn parse_incident_csv(csv_text: &str) -> Result<ParsedIncidents, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| IngestError::ParseError(format!("Failed to read CSV header: {}", e)))?
        .clone();

    let date_idx = find_column(&headers, COL_DATE)?;
    let time_idx = find_column(&headers, COL_TIME)?;
    let boro_idx = find_column(&headers, COL_BORO)?;

    let mut incidents = Vec::new();
    let mut stats = CleanStats::default();

    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                // A structurally broken line (stray quote, truncation) is
                // dropped like a bad date, not treated as fatal.
                eprintln!("Warning: skipping unreadable CSV row: {}", e);
                stats.total_rows += 1;
                stats.dropped_bad_date += 1;
                continue;
            }
        };
        stats.total_rows += 1;

        // Date is the one field the row cannot survive without.
        let date = record
            .get(date_idx)
            .map(str::trim)
            .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok());

        let date = match date {
            Some(d) => d,
            None => {
                stats.dropped_bad_date += 1;
                continue;
            }
        };

        let time = record
            .get(time_idx)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| NaiveTime::parse_from_str(s, TIME_FORMAT).ok());
        if time.is_none() {
            stats.time_defaulted += 1;
        }

        let borough = record
            .get(boro_idx)
            .map(Borough::from_raw)
            .unwrap_or(Borough::Unknown);
        if borough == Borough::Unknown {
            stats.unknown_borough += 1;
        }

        incidents.push(Incident { date, time, borough });
        stats.kept += 1;
    }

    if incidents.is_empty() {
        return Err(IngestError::NoDataAvailable(
            "CSV export contained no parseable incident rows".to_string(),
        ));
    }

    Ok(ParsedIncidents { incidents, stats })
}

/// Locates a required column by header name.
fn find_column(headers: &csv::StringRecord, name: &str) -> Result<usize, IngestError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| IngestError::ParseError(format!("Missing {} column in CSV header", name)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
