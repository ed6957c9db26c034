/// Shared data types for the shooting incident report pipeline.
///
/// The ingest layer produces a flat `Vec<Incident>` from the raw Socrata
/// CSV export; everything downstream (grouping, regression, forecasting,
/// rendering) works from that list plus the `CleanStats` accounting of
/// what the cleaning pass dropped or defaulted.

use chrono::{NaiveDate, NaiveTime};

// ---------------------------------------------------------------------------
// Borough
// ---------------------------------------------------------------------------

/// One of the five NYC administrative divisions, or `Unknown` for rows
/// where the `BORO` column is blank, `(null)`, or an unrecognized spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Borough {
    Bronx,
    Brooklyn,
    Manhattan,
    Queens,
    StatenIsland,
    Unknown,
}

impl Borough {
    /// Display name used in tables and chart labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Borough::Bronx => "Bronx",
            Borough::Brooklyn => "Brooklyn",
            Borough::Manhattan => "Manhattan",
            Borough::Queens => "Queens",
            Borough::StatenIsland => "Staten Island",
            Borough::Unknown => "Unknown",
        }
    }

    /// Normalizes a raw `BORO` column value. The dataset uses uppercase
    /// spellings ("BRONX", "STATEN ISLAND"); comparison is case-insensitive
    /// and whitespace-tolerant so schema drift in casing doesn't silently
    /// reroute rows into `Unknown`.
    pub fn from_raw(raw: &str) -> Borough {
        match raw.trim().to_ascii_uppercase().as_str() {
            "BRONX" => Borough::Bronx,
            "BROOKLYN" => Borough::Brooklyn,
            "MANHATTAN" => Borough::Manhattan,
            "QUEENS" => Borough::Queens,
            "STATEN ISLAND" => Borough::StatenIsland,
            _ => Borough::Unknown,
        }
    }
}

// ---------------------------------------------------------------------------
// Incident
// ---------------------------------------------------------------------------

/// One cleaned shooting incident record.
///
/// `time` is optional: a small fraction of historical rows carry a valid
/// occurrence date but an unparseable time, and dropping those rows would
/// shrink every date-based aggregate. Hour-of-day grouping simply skips
/// incidents without a time.
#[derive(Debug, Clone, PartialEq)]
pub struct Incident {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub borough: Borough,
}

// ---------------------------------------------------------------------------
// Cleaning statistics
// ---------------------------------------------------------------------------

/// Row-level accounting from the CSV cleaning pass.
///
/// Invariant: `kept + dropped_bad_date == total_rows`. Rows with a bad
/// time or unknown borough are kept, so `time_defaulted` and
/// `unknown_borough` overlap with `kept`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanStats {
    /// Data rows seen in the CSV (header excluded).
    pub total_rows: u64,
    /// Rows that produced an `Incident`.
    pub kept: u64,
    /// Rows dropped because `OCCUR_DATE` did not parse.
    pub dropped_bad_date: u64,
    /// Kept rows where `OCCUR_TIME` did not parse and was set to `None`.
    pub time_defaulted: u64,
    /// Kept rows whose `BORO` value mapped to `Borough::Unknown`.
    pub unknown_borough: u64,
}

// ---------------------------------------------------------------------------
// Ingest errors
// ---------------------------------------------------------------------------

/// Errors from the fetch-and-parse stage of the pipeline.
///
/// There is deliberately no retry machinery behind these: a network
/// failure or schema drift in the remote CSV aborts report generation.
#[derive(Debug)]
pub enum IngestError {
    /// HTTP transport failure or non-2xx status from the Socrata API.
    Http(String),
    /// Structural problem in the payload (missing column, bad header row,
    /// malformed metadata JSON).
    ParseError(String),
    /// The payload parsed but yielded zero usable incident rows.
    NoDataAvailable(String),
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::Http(msg) => write!(f, "HTTP error: {}", msg),
            IngestError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            IngestError::NoDataAvailable(msg) => write!(f, "No data available: {}", msg),
        }
    }
}

impl std::error::Error for IngestError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
