/// Borough registry for the shooting incident trend report.
///
/// Defines the canonical list of NYC boroughs covered by the dataset,
/// along with their raw `BORO` spellings and census populations. This is
/// the single source of truth for borough ordering — tables and charts
/// iterate this registry rather than whatever order HashMap happens to
/// produce.

use crate::model::Borough;

// ---------------------------------------------------------------------------
// Borough metadata
// ---------------------------------------------------------------------------

/// Metadata for a single borough.
pub struct BoroughInfo {
    /// Enum key used throughout the analysis.
    pub borough: Borough,
    /// Display name.
    pub name: &'static str,
    /// Exact spelling used in the dataset's `BORO` column.
    pub raw_value: &'static str,
    /// 2020 Census population, used for incidents-per-100k rates.
    pub population: u64,
}

/// All five boroughs, ordered by population descending so the comparative
/// table and chart read largest-first.
///
/// Sources:
///   - BORO spellings: NYPD Shooting Incident Data (Historic) data dictionary
///   - Populations: 2020 Decennial Census (data.census.gov)
pub static BOROUGH_REGISTRY: &[BoroughInfo] = &[
    BoroughInfo {
        borough: Borough::Brooklyn,
        name: "Brooklyn",
        raw_value: "BROOKLYN",
        population: 2_736_074,
    },
    BoroughInfo {
        borough: Borough::Queens,
        name: "Queens",
        raw_value: "QUEENS",
        population: 2_405_464,
    },
    BoroughInfo {
        borough: Borough::Manhattan,
        name: "Manhattan",
        raw_value: "MANHATTAN",
        population: 1_694_251,
    },
    BoroughInfo {
        borough: Borough::Bronx,
        name: "Bronx",
        raw_value: "BRONX",
        population: 1_472_654,
    },
    BoroughInfo {
        borough: Borough::StatenIsland,
        name: "Staten Island",
        raw_value: "STATEN ISLAND",
        population: 495_747,
    },
];

/// Returns the borough keys in registry order, suitable for driving
/// table rows and chart series.
pub fn all_boroughs() -> Vec<Borough> {
    BOROUGH_REGISTRY.iter().map(|b| b.borough).collect()
}

/// Looks up registry metadata for a borough. Returns `None` for
/// `Borough::Unknown`, which has no population or canonical spelling.
pub fn find_borough(borough: Borough) -> Option<&'static BoroughInfo> {
    BOROUGH_REGISTRY.iter().find(|b| b.borough == borough)
}

/// Incidents per 100,000 residents. Returns `None` when the borough has
/// no registry entry (`Unknown` rows are excluded from rate columns).
pub fn rate_per_100k(borough: Borough, count: u64) -> Option<f64> {
    find_borough(borough).map(|info| count as f64 * 100_000.0 / info.population as f64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
