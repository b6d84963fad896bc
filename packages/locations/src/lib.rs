#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Location summaries for the ParkWise ranking engine.
//!
//! A location summary is one row of the per-location ticket aggregate:
//! the location text, how many tickets were written there, the mean fine,
//! and how many distinct violation codes appeared. Summaries are read from
//! CSV, geocoded with the offline [`geocode::Geocoder`], and turned either
//! into ranking [`Candidate`]s or into a [`heatmap`] payload.

pub mod geocode;
pub mod heatmap;

use std::io::Read;
use std::path::Path;

use parkwise_ranking_models::Candidate;
use serde::{Deserialize, Serialize};

use geocode::Geocoder;

/// Errors from loading location summaries.
#[derive(Debug, thiserror::Error)]
pub enum LocationsError {
    /// CSV parsing error.
    #[error("CSV error in {path}: {source}")]
    Csv {
        /// Path to the CSV file.
        path: String,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// The file does not exist.
    #[error("Location summary file not found: {0}")]
    NotFound(String),
}

/// Aggregated ticket statistics for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSummary {
    /// Location text as written on the ticket.
    pub location: String,
    /// Number of tickets.
    pub violation_count: i64,
    /// Mean fine.
    pub avg_fine: f64,
    /// Distinct violation codes.
    pub violation_types: i64,
}

/// Raw CSV row. Every field is read as text and coerced, because exports
/// routinely carry blanks, `NaN`, or `12.0` in integer columns.
#[derive(Debug, Deserialize)]
struct SummaryRow {
    #[serde(default)]
    violation_location: Option<String>,
    #[serde(default)]
    violation_count: Option<String>,
    #[serde(default)]
    avg_fine: Option<String>,
    #[serde(default)]
    violation_types: Option<String>,
}

impl SummaryRow {
    fn into_summary(self) -> LocationSummary {
        LocationSummary {
            location: self.violation_location.unwrap_or_default(),
            violation_count: lenient_int(self.violation_count.as_deref()),
            avg_fine: lenient_float(self.avg_fine.as_deref()),
            violation_types: lenient_int(self.violation_types.as_deref()),
        }
    }
}

/// Reads location summaries from a CSV file.
///
/// # Errors
///
/// Returns [`LocationsError`] if the file is missing or its header row
/// cannot be read. Malformed data rows are skipped.
pub fn load_summaries(path: &Path) -> Result<Vec<LocationSummary>, LocationsError> {
    if !path.exists() {
        return Err(LocationsError::NotFound(path.display().to_string()));
    }

    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| LocationsError::Csv {
            path: path.display().to_string(),
            source: e,
        })?;

    let rows = read_rows(reader, &path.display().to_string())?;
    log::info!("Loaded {} location summaries from {}", rows.len(), path.display());
    Ok(rows)
}

/// Reads location summaries from any CSV source with a header row.
///
/// # Errors
///
/// Returns [`LocationsError::Csv`] if the header row cannot be read.
pub fn read_summaries(reader: impl Read) -> Result<Vec<LocationSummary>, LocationsError> {
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    read_rows(reader, "<reader>")
}

fn read_rows<R: Read>(
    mut reader: csv::Reader<R>,
    label: &str,
) -> Result<Vec<LocationSummary>, LocationsError> {
    reader.headers().map_err(|e| LocationsError::Csv {
        path: label.to_string(),
        source: e,
    })?;

    let mut rows = Vec::new();
    for result in reader.deserialize::<SummaryRow>() {
        match result {
            Ok(row) => rows.push(row.into_summary()),
            Err(e) => log::trace!("  skipping malformed row: {e}"),
        }
    }
    Ok(rows)
}

/// The `n` summaries with the most tickets, busiest first.
#[must_use]
pub fn top_by_count(rows: &[LocationSummary], n: usize) -> Vec<LocationSummary> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| b.violation_count.cmp(&a.violation_count));
    sorted.truncate(n);
    sorted
}

/// Geocodes summaries into ranking candidates.
pub fn to_candidates(rows: &[LocationSummary], geocoder: &mut Geocoder) -> Vec<Candidate> {
    rows.iter()
        .map(|row| {
            let (latitude, longitude) = geocoder.geocode(&row.location);
            Candidate {
                latitude,
                longitude,
                violation_count: row.violation_count,
                average_fine: row.avg_fine,
                violation_type_count: row.violation_types,
                location_label: Some(row.location.clone()),
            }
        })
        .collect()
}

/// Parses a float, treating blanks, garbage, and non-finite values as 0.
fn lenient_float(value: Option<&str>) -> f64 {
    value
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parses an integer the same way, truncating fractional input.
#[allow(clippy::cast_possible_truncation)]
fn lenient_int(value: Option<&str>) -> i64 {
    let Some(s) = value.map(str::trim) else {
        return 0;
    };
    if let Ok(v) = s.parse::<i64>() {
        return v;
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v.abs() < 9.2e18 => v.trunc() as i64,
        _ => 0,
    }
}
