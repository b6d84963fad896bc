//! Heatmap payload for the map overlay.

use serde::{Deserialize, Serialize};

use crate::LocationSummary;
use crate::geocode::Geocoder;

/// One weighted point of the heatmap layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapPoint {
    /// Location text.
    pub location: String,
    /// Ticket count.
    pub count: i64,
    /// Mean fine.
    pub avg_fine: f64,
    /// Distinct violation codes.
    pub violation_types: i64,
    /// `count / max_count`, capped at 1.
    pub intensity: f64,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

/// Geocodes every summary and weights it against the busiest location.
#[allow(clippy::cast_precision_loss)]
pub fn build_heatmap(rows: &[LocationSummary], geocoder: &mut Geocoder) -> Vec<HeatmapPoint> {
    let max_count = rows.iter().map(|r| r.violation_count).max().unwrap_or(0);
    let max_count = if max_count <= 0 { 1.0 } else { max_count as f64 };

    rows.iter()
        .map(|row| {
            let (lat, lng) = geocoder.geocode(&row.location);
            HeatmapPoint {
                location: row.location.clone(),
                count: row.violation_count,
                avg_fine: row.avg_fine,
                violation_types: row.violation_types,
                intensity: (row.violation_count as f64 / max_count).min(1.0),
                lat,
                lng,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(location: &str, violation_count: i64) -> LocationSummary {
        LocationSummary {
            location: location.to_string(),
            violation_count,
            avg_fine: 50.0,
            violation_types: 2,
        }
    }

    #[test]
    fn empty_rows_give_empty_payload() {
        assert!(build_heatmap(&[], &mut Geocoder::new()).is_empty());
    }

    #[test]
    fn intensity_is_relative_to_busiest() {
        let rows = vec![summary("100 N STATE ST", 40), summary("200 S CLARK ST", 10)];
        let points = build_heatmap(&rows, &mut Geocoder::new());

        assert_eq!(points.len(), 2);
        assert!((points[0].intensity - 1.0).abs() < f64::EPSILON);
        assert!((points[1].intensity - 0.25).abs() < f64::EPSILON);
        assert_eq!(points[1].count, 10);
    }

    #[test]
    fn zero_counts_do_not_divide_by_zero() {
        let rows = vec![summary("100 N STATE ST", 0)];
        let points = build_heatmap(&rows, &mut Geocoder::new());
        assert!(points[0].intensity.abs() < f64::EPSILON);
    }

    #[test]
    fn serializes_camel_case_field_names() {
        let rows = vec![summary("100 N STATE ST", 3)];
        let points = build_heatmap(&rows, &mut Geocoder::new());
        let json = serde_json::to_value(&points[0]).unwrap();
        assert_eq!(json["avgFine"], 50.0);
        assert_eq!(json["violationTypes"], 2);
        assert!(json["lat"].is_f64());
    }
}
