/// Aggregation of the flat incident list into the summary tables the
/// report renders.
///
/// `count_by_month` produces a dense series: every calendar month between
/// the first and last observed incident appears, zero-count months
/// included. The regression and forecast both index the series by
/// position, so a sparse series would silently compress time.
///
/// `count_by_hour` always yields 24 bins; incidents without a parsed
/// time are excluded from the bins and reported separately so the
/// exclusion is visible to the caller rather than silently shrinking
/// the histogram.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Timelike};

use crate::boroughs::{self, BOROUGH_REGISTRY};
use crate::model::{Borough, Incident};

// ---------------------------------------------------------------------------
// Summary row types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearCount {
    pub year: i32,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCount {
    pub year: i32,
    /// 1-12.
    pub month: u32,
    pub count: u64,
}

impl MonthCount {
    /// Axis label, e.g. "2020-07".
    pub fn label(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourCount {
    /// 0-23.
    pub hour: u32,
    pub count: u64,
}

/// Hour-of-day histogram plus the rows it had to leave out.
#[derive(Debug, Clone, PartialEq)]
pub struct HourHistogram {
    /// Exactly 24 bins, hour 0 first.
    pub bins: Vec<HourCount>,
    /// Incidents with no parsed time, excluded from the bins.
    pub untimed: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoroughCount {
    pub borough: Borough,
    pub count: u64,
    /// Incidents per 100k residents; `None` for `Unknown`.
    pub rate_per_100k: Option<f64>,
}

/// Borough × year counts for the comparative chart. Rows follow
/// registry order; every row has one cell per entry in `years`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoroughYearTable {
    pub years: Vec<i32>,
    pub rows: Vec<(Borough, Vec<u64>)>,
}

// ---------------------------------------------------------------------------
// Grouping functions
// ---------------------------------------------------------------------------

/// Counts incidents per calendar year, ascending.
pub fn count_by_year(incidents: &[Incident]) -> Vec<YearCount> {
    let mut counts: BTreeMap<i32, u64> = BTreeMap::new();
    for incident in incidents {
        *counts.entry(incident.date.year()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// Counts incidents per calendar month, ascending, with zero-count
/// months filled in between the first and last observed month.
pub fn count_by_month(incidents: &[Incident]) -> Vec<MonthCount> {
    let mut counts: BTreeMap<(i32, u32), u64> = BTreeMap::new();
    for incident in incidents {
        let key = (incident.date.year(), incident.date.month());
        *counts.entry(key).or_insert(0) += 1;
    }

    let (first, last) = match (counts.keys().next(), counts.keys().next_back()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Vec::new(),
    };

    let mut series = Vec::new();
    let mut current = first;
    loop {
        series.push(MonthCount {
            year: current.0,
            month: current.1,
            count: counts.get(&current).copied().unwrap_or(0),
        });
        if current == last {
            break;
        }
        current = next_month(current);
    }
    series
}

fn next_month((year, month): (i32, u32)) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

/// Builds the hour-of-day histogram. Always 24 bins.
pub fn count_by_hour(incidents: &[Incident]) -> HourHistogram {
    let mut bins = vec![0u64; 24];
    let mut untimed = 0u64;

    for incident in incidents {
        match incident.time {
            Some(time) => bins[time.hour() as usize] += 1,
            None => untimed += 1,
        }
    }

    HourHistogram {
        bins: bins
            .into_iter()
            .enumerate()
            .map(|(hour, count)| HourCount { hour: hour as u32, count })
            .collect(),
        untimed,
    }
}

/// Counts incidents per borough in registry order, with per-100k rates.
/// An `Unknown` row is appended at the end only when such rows exist.
pub fn count_by_borough(incidents: &[Incident]) -> Vec<BoroughCount> {
    let mut counts: HashMap<Borough, u64> = HashMap::new();
    for incident in incidents {
        *counts.entry(incident.borough).or_insert(0) += 1;
    }

    let mut rows: Vec<BoroughCount> = BOROUGH_REGISTRY
        .iter()
        .map(|info| {
            let count = counts.get(&info.borough).copied().unwrap_or(0);
            BoroughCount {
                borough: info.borough,
                count,
                rate_per_100k: boroughs::rate_per_100k(info.borough, count),
            }
        })
        .collect();

    if let Some(&unknown) = counts.get(&Borough::Unknown) {
        rows.push(BoroughCount {
            borough: Borough::Unknown,
            count: unknown,
            rate_per_100k: None,
        });
    }

    rows
}

/// Builds the borough × year table for the comparative chart. Years are
/// dense between the first and last observed year; boroughs follow
/// registry order (no `Unknown` row, matching the chart's series list).
pub fn count_by_borough_year(incidents: &[Incident]) -> BoroughYearTable {
    let mut counts: HashMap<(Borough, i32), u64> = HashMap::new();
    let mut min_year = i32::MAX;
    let mut max_year = i32::MIN;

    for incident in incidents {
        let year = incident.date.year();
        min_year = min_year.min(year);
        max_year = max_year.max(year);
        *counts.entry((incident.borough, year)).or_insert(0) += 1;
    }

    if min_year > max_year {
        return BoroughYearTable { years: Vec::new(), rows: Vec::new() };
    }

    let years: Vec<i32> = (min_year..=max_year).collect();
    let rows = BOROUGH_REGISTRY
        .iter()
        .map(|info| {
            let cells = years
                .iter()
                .map(|&year| counts.get(&(info.borough, year)).copied().unwrap_or(0))
                .collect();
            (info.borough, cells)
        })
        .collect();

    BoroughYearTable { years, rows }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn incident(date: (i32, u32, u32), hour: Option<u32>, borough: Borough) -> Incident {
        Incident {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            time: hour.map(|h| NaiveTime::from_hms_opt(h, 15, 0).unwrap()),
            borough,
        }
    }

    fn sample() -> Vec<Incident> {
        vec![
            incident((2020, 1, 5), Some(22), Borough::Brooklyn),
            incident((2020, 1, 20), Some(23), Borough::Bronx),
            incident((2020, 3, 2), Some(1), Borough::Bronx),
            incident((2020, 12, 31), None, Borough::Queens),
            incident((2021, 1, 1), Some(0), Borough::Brooklyn),
            incident((2021, 6, 15), Some(22), Borough::Manhattan),
        ]
    }

    // --- Yearly -------------------------------------------------------------

    #[test]
    fn test_count_by_year_is_sorted_and_complete() {
        let years = count_by_year(&sample());
        assert_eq!(years.len(), 2);
        assert_eq!(years[0], YearCount { year: 2020, count: 4 });
        assert_eq!(years[1], YearCount { year: 2021, count: 2 });
    }

    #[test]
    fn test_yearly_counts_sum_to_total_row_count() {
        let incidents = sample();
        let total: u64 = count_by_year(&incidents).iter().map(|y| y.count).sum();
        assert_eq!(total, incidents.len() as u64);
    }

    // --- Monthly ------------------------------------------------------------

    #[test]
    fn test_count_by_month_fills_gap_months_with_zero() {
        let series = count_by_month(&sample());
        // 2020-01 through 2021-06 inclusive = 18 months.
        assert_eq!(series.len(), 18);
        assert_eq!(series[0].label(), "2020-01");
        assert_eq!(series[0].count, 2);
        // February 2020 had no incidents but must be present.
        assert_eq!(series[1].label(), "2020-02");
        assert_eq!(series[1].count, 0);
        assert_eq!(series.last().unwrap().label(), "2021-06");
    }

    #[test]
    fn test_monthly_counts_sum_to_total_row_count() {
        let incidents = sample();
        let total: u64 = count_by_month(&incidents).iter().map(|m| m.count).sum();
        assert_eq!(total, incidents.len() as u64);
    }

    #[test]
    fn test_count_by_month_crosses_year_boundary_without_gap() {
        let incidents = vec![
            incident((2020, 11, 1), Some(12), Borough::Bronx),
            incident((2021, 2, 1), Some(12), Borough::Bronx),
        ];
        let series = count_by_month(&incidents);
        let labels: Vec<String> = series.iter().map(|m| m.label()).collect();
        assert_eq!(labels, vec!["2020-11", "2020-12", "2021-01", "2021-02"]);
    }

    #[test]
    fn test_count_by_month_empty_input() {
        assert!(count_by_month(&[]).is_empty());
    }

    // --- Hourly -------------------------------------------------------------

    #[test]
    fn test_count_by_hour_always_24_bins() {
        let histogram = count_by_hour(&sample());
        assert_eq!(histogram.bins.len(), 24);
        assert_eq!(histogram.bins[0].hour, 0);
        assert_eq!(histogram.bins[23].hour, 23);
    }

    #[test]
    fn test_count_by_hour_excludes_untimed_and_reports_them() {
        let histogram = count_by_hour(&sample());
        let binned: u64 = histogram.bins.iter().map(|b| b.count).sum();
        assert_eq!(binned, 5);
        assert_eq!(histogram.untimed, 1);
        assert_eq!(binned + histogram.untimed, sample().len() as u64);
    }

    #[test]
    fn test_count_by_hour_bins_by_hour_component() {
        let histogram = count_by_hour(&sample());
        assert_eq!(histogram.bins[22].count, 2, "two incidents at 22:15");
        assert_eq!(histogram.bins[23].count, 1);
        assert_eq!(histogram.bins[12].count, 0);
    }

    // --- Borough ------------------------------------------------------------

    #[test]
    fn test_count_by_borough_follows_registry_order() {
        let rows = count_by_borough(&sample());
        // No Unknown rows in the sample, so exactly the five registry rows.
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].borough, Borough::Brooklyn);
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[4].borough, Borough::StatenIsland);
        assert_eq!(rows[4].count, 0, "zero-count boroughs still get a row");
    }

    #[test]
    fn test_count_by_borough_appends_unknown_only_when_present() {
        let mut incidents = sample();
        incidents.push(incident((2021, 7, 1), Some(3), Borough::Unknown));

        let rows = count_by_borough(&incidents);
        assert_eq!(rows.len(), 6);
        let unknown = rows.last().unwrap();
        assert_eq!(unknown.borough, Borough::Unknown);
        assert_eq!(unknown.count, 1);
        assert!(unknown.rate_per_100k.is_none(), "Unknown has no population basis");
    }

    #[test]
    fn test_count_by_borough_rates_use_registry_population() {
        let rows = count_by_borough(&sample());
        let brooklyn = &rows[0];
        let expected = 2.0 * 100_000.0 / 2_736_074.0;
        assert!((brooklyn.rate_per_100k.unwrap() - expected).abs() < 1e-9);
    }

    // --- Borough × year -----------------------------------------------------

    #[test]
    fn test_borough_year_table_shape() {
        let table = count_by_borough_year(&sample());
        assert_eq!(table.years, vec![2020, 2021]);
        assert_eq!(table.rows.len(), 5);
        for (_, cells) in &table.rows {
            assert_eq!(cells.len(), table.years.len());
        }
    }

    #[test]
    fn test_borough_year_table_cell_values() {
        let table = count_by_borough_year(&sample());
        let (borough, cells) = &table.rows[0];
        assert_eq!(*borough, Borough::Brooklyn);
        assert_eq!(cells, &vec![1, 1]);

        let bronx = table.rows.iter().find(|(b, _)| *b == Borough::Bronx).unwrap();
        assert_eq!(bronx.1, vec![2, 0]);
    }
}
