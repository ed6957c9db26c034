/// Test fixtures: representative payloads from the NYC Open Data portal.
///
/// These fixtures are structurally faithful but truncated to the minimum
/// needed to exercise the parsers. The CSV samples mirror the column set
/// of the real export:
///   INCIDENT_KEY,OCCUR_DATE,OCCUR_TIME,BORO,PRECINCT,LOCATION_DESC,...
///
/// Notes on the real export that the fixtures reproduce:
///   - OCCUR_DATE is MM/DD/YYYY, OCCUR_TIME is HH:MM:SS 24-hour.
///   - Free-text columns (LOCATION_DESC) are quoted and may contain
///     embedded commas.
///   - Older rows occasionally carry a blank or malformed time while the
///     date is fine.

/// Twelve well-formed rows spanning 2020-2021, all five boroughs,
/// clustered in the late-evening hours like the real distribution.
#[cfg(test)]
pub(crate) fn fixture_incident_csv() -> &'static str {
    "\
INCIDENT_KEY,OCCUR_DATE,OCCUR_TIME,BORO,PRECINCT,STATISTICAL_MURDER_FLAG
228798151,01/03/2021,22:10:00,BROOKLYN,73,false
229376995,01/15/2021,01:30:00,BRONX,42,false
230188089,02/07/2021,19:05:00,BRONX,44,true
232021745,04/01/2021,22:45:00,QUEENS,113,false
212997777,06/21/2020,00:15:00,BROOKLYN,67,false
213602949,07/04/2020,23:59:00,MANHATTAN,32,false
213602950,07/04/2020,22:10:00,BROOKLYN,75,true
215214539,08/13/2020,02:20:00,STATEN ISLAND,120,false
216111234,09/02/2020,15:40:00,BRONX,46,false
218330446,10/31/2020,22:05:00,MANHATTAN,25,false
219466325,11/25/2020,04:10:00,QUEENS,103,false
220455112,12/24/2020,21:00:00,BROOKLYN,79,false
"
}

/// Two rows whose LOCATION_DESC contains an embedded comma. A parser
/// that splits on commas instead of honoring quotes misreads BORO here.
#[cfg(test)]
pub(crate) fn fixture_quoted_field_csv() -> &'static str {
    "\
INCIDENT_KEY,OCCUR_DATE,OCCUR_TIME,BORO,LOCATION_DESC,PRECINCT
201575314,05/27/2019,19:48:00,BRONX,\"MULTI DWELL, PUBLIC HOUS\",40
205730059,09/08/2019,21:15:00,QUEENS,\"BAR, NIGHT CLUB\",110
"
}

/// Five rows with typical row-level damage: one unparseable date, one
/// blank time, one blank borough. The other two are clean.
#[cfg(test)]
pub(crate) fn fixture_damaged_rows_csv() -> &'static str {
    "\
INCIDENT_KEY,OCCUR_DATE,OCCUR_TIME,BORO,PRECINCT
190000001,03/12/2019,20:30:00,BROOKLYN,73
190000002,2019-13-45,12:00:00,BRONX,42
190000003,07/04/2019,,MANHATTAN,32
190000004,08/19/2019,23:10:00,,103
190000005,09/30/2019,18:55:00,QUEENS,113
"
}

/// Abbreviated Socrata views-endpoint metadata payload. The real
/// response carries dozens of fields; only the ones the parser reads
/// are reproduced, plus a few ignored siblings to make sure the serde
/// structs tolerate extra keys.
#[cfg(test)]
pub(crate) fn fixture_view_metadata_json() -> &'static str {
    r#"{
      "id": "833y-fsy8",
      "name": "NYPD Shooting Incident Data (Historic)",
      "description": "List of every shooting incident that occurred in NYC going back to 2006.",
      "attribution": "Police Department (NYPD)",
      "category": "Public Safety",
      "rowsUpdatedAt": 1714579200,
      "viewCount": 123456,
      "downloadCount": 65432
    }"#
}
