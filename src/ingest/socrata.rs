/// NYC Open Data (Socrata) API client.
///
/// Handles URL construction, the CSV export download, and dataset
/// metadata retrieval for the portal at:
///   https://data.cityofnewyork.us
///
/// Two endpoints are used:
///   - `/api/views/{id}/rows.csv?accessType=DOWNLOAD` — the full CSV
///     export consumed by the cleaning pass.
///   - `/api/views/{id}.json` — dataset metadata (name, last row update),
///     shown in the report header so a reader knows which vintage of the
///     dataset the charts were built from.
///
/// See `fixtures.rs` for annotated examples of both payloads.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::model::IngestError;

// ---------------------------------------------------------------------------
// Serde structures for the metadata JSON envelope
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ViewResponse {
    name: String,
    description: Option<String>,
    #[serde(rename = "rowsUpdatedAt")]
    rows_updated_at: Option<i64>,  // epoch seconds
}

/// Dataset metadata extracted from the views endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetMetadata {
    pub name: String,
    pub description: Option<String>,
    /// When the portal last refreshed the dataset's rows.
    pub rows_updated: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds the full-export CSV URL for a Socrata dataset.
///
/// # Example
/// ```
/// use shooting_trends::ingest::socrata::build_csv_url;
///
/// let url = build_csv_url("https://data.cityofnewyork.us", "833y-fsy8");
/// assert_eq!(
///     url,
///     "https://data.cityofnewyork.us/api/views/833y-fsy8/rows.csv?accessType=DOWNLOAD"
/// );
/// ```
pub fn build_csv_url(base_url: &str, dataset_id: &str) -> String {
    format!("{}/api/views/{}/rows.csv?accessType=DOWNLOAD", base_url, dataset_id)
}

/// Builds a filtered CSV URL through the SODA resource endpoint with a
/// SoQL `$where` clause. The clause is percent-encoded; Socrata rejects
/// raw spaces and quotes in query parameters.
///
/// Useful for spot-checking a single borough or year without pulling the
/// full export.
pub fn build_filtered_csv_url(base_url: &str, dataset_id: &str, where_clause: &str) -> String {
    format!(
        "{}/resource/{}.csv?$where={}&$limit=50000",
        base_url,
        dataset_id,
        urlencoding::encode(where_clause)
    )
}

/// Builds the dataset metadata URL.
pub fn build_metadata_url(base_url: &str, dataset_id: &str) -> String {
    format!("{}/api/views/{}.json", base_url, dataset_id)
}

// ---------------------------------------------------------------------------
// HTTP fetch
// ---------------------------------------------------------------------------

/// Builds the blocking HTTP client used for both endpoints.
pub fn make_client(timeout_secs: u64) -> Result<reqwest::blocking::Client, IngestError> {
    reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| IngestError::Http(format!("Failed to build HTTP client: {}", e)))
}

/// Downloads the CSV export body as text.
///
/// No retries: a transport failure or non-2xx status aborts report
/// generation with `IngestError::Http`.
pub fn fetch_csv(client: &reqwest::blocking::Client, url: &str) -> Result<String, IngestError> {
    let response = client
        .get(url)
        .header("Accept", "text/csv")
        .send()
        .map_err(|e| IngestError::Http(format!("Request to {} failed: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(IngestError::Http(format!(
            "Socrata returned {} for {}",
            response.status(),
            url
        )));
    }

    response
        .text()
        .map_err(|e| IngestError::Http(format!("Failed to read response body: {}", e)))
}

/// Fetches and parses dataset metadata from the views endpoint.
pub fn fetch_metadata(
    client: &reqwest::blocking::Client,
    url: &str,
) -> Result<DatasetMetadata, IngestError> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .map_err(|e| IngestError::Http(format!("Request to {} failed: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(IngestError::Http(format!(
            "Socrata returned {} for {}",
            response.status(),
            url
        )));
    }

    let body = response
        .text()
        .map_err(|e| IngestError::Http(format!("Failed to read response body: {}", e)))?;

    parse_metadata(&body)
}

// ---------------------------------------------------------------------------
// Metadata parsing
// ---------------------------------------------------------------------------

/// Parses the views endpoint JSON into `DatasetMetadata`.
///
/// # Errors
/// - `IngestError::ParseError` — malformed or unexpected JSON structure.
pub fn parse_metadata(json: &str) -> Result<DatasetMetadata, IngestError> {
    let view: ViewResponse = serde_json::from_str(json)
        .map_err(|e| IngestError::ParseError(format!("JSON deserialization failed: {}", e)))?;

    // rowsUpdatedAt is epoch seconds; absent on never-published drafts.
    let rows_updated = view
        .rows_updated_at
        .and_then(|secs| DateTime::from_timestamp(secs, 0));

    Ok(DatasetMetadata {
        name: view.name,
        description: view.description,
        rows_updated,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::*;
    use chrono::Datelike;

    // --- URL construction ---------------------------------------------------

    #[test]
    fn test_build_csv_url_targets_rows_export() {
        let url = build_csv_url("https://data.cityofnewyork.us", "833y-fsy8");
        assert!(
            url.contains("/api/views/833y-fsy8/rows.csv"),
            "must target the rows export, got: {}",
            url
        );
        assert!(url.contains("accessType=DOWNLOAD"), "must request the download export");
    }

    #[test]
    fn test_build_filtered_csv_url_encodes_where_clause() {
        let url = build_filtered_csv_url(
            "https://data.cityofnewyork.us",
            "833y-fsy8",
            "boro = 'QUEENS'",
        );
        assert!(
            url.contains("boro%20%3D%20%27QUEENS%27"),
            "SoQL clause should be percent-encoded, got: {}",
            url
        );
        assert!(url.contains("/resource/833y-fsy8.csv"), "filtered pulls use the SODA endpoint");
    }

    #[test]
    fn test_build_metadata_url() {
        let url = build_metadata_url("https://data.cityofnewyork.us", "833y-fsy8");
        assert_eq!(url, "https://data.cityofnewyork.us/api/views/833y-fsy8.json");
    }

    // --- Metadata parsing ---------------------------------------------------

    #[test]
    fn test_parse_metadata_extracts_name_and_update_time() {
        let meta = parse_metadata(fixture_view_metadata_json())
            .expect("valid metadata fixture should parse");

        assert_eq!(meta.name, "NYPD Shooting Incident Data (Historic)");
        let updated = meta.rows_updated.expect("fixture carries rowsUpdatedAt");
        assert_eq!(updated.year(), 2024);
    }

    #[test]
    fn test_parse_metadata_tolerates_missing_optional_fields() {
        let meta = parse_metadata(r#"{ "name": "Bare Dataset" }"#)
            .expect("metadata without optional fields should parse");
        assert_eq!(meta.name, "Bare Dataset");
        assert!(meta.description.is_none());
        assert!(meta.rows_updated.is_none());
    }

    #[test]
    fn test_parse_metadata_malformed_json_returns_parse_error() {
        let result = parse_metadata("{ this is not valid json }}}");
        assert!(
            matches!(result, Err(IngestError::ParseError(_))),
            "malformed JSON should return ParseError, got {:?}",
            result
        );
    }

    #[test]
    fn test_parse_metadata_missing_name_returns_parse_error() {
        let result = parse_metadata(r#"{ "rowsUpdatedAt": 1714579200 }"#);
        assert!(
            matches!(result, Err(IngestError::ParseError(_))),
            "name is required, got {:?}",
            result
        );
    }
}
