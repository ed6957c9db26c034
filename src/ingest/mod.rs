/// Data ingest: Socrata API access and CSV cleaning.

pub mod fixtures;
pub mod records;
pub mod socrata;
