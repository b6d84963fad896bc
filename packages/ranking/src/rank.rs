//! Ordering of scored survivors and encoding of the returned slice.

use std::cmp::Ordering;

use parkwise_ranking_models::{RankedResult, RiskLevel};

use crate::buffer::WorkingRecord;

/// Lowest risk first, then nearest first.
///
/// Uses `total_cmp` so the order stays total even for NaN distances coming
/// from non-finite input coordinates.
#[must_use]
pub fn compare(a: &WorkingRecord, b: &WorkingRecord) -> Ordering {
    a.risk_score
        .total_cmp(&b.risk_score)
        .then_with(|| a.distance.total_cmp(&b.distance))
}

/// Sorts survivors in place. Unstable: records with equal score and equal
/// distance come out in no particular order.
pub fn sort(records: &mut [WorkingRecord]) {
    records.sort_unstable_by(compare);
}

/// Builds the output entry for one sorted record.
#[must_use]
pub fn encode(record: &WorkingRecord, location_label: Option<&str>) -> RankedResult {
    RankedResult {
        location_label: location_label.unwrap_or_default().to_string(),
        latitude: record.latitude,
        longitude: record.longitude,
        distance: record.distance,
        violation_count: record.violation_count,
        average_fine: record.average_fine,
        violation_type_count: record.violation_type_count,
        risk_score: record.risk_score,
        risk_level: RiskLevel::from_score(record.risk_score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::CandidateFields;

    fn record(source: usize, risk_score: f64, distance: f64) -> WorkingRecord {
        let fields = CandidateFields {
            latitude: 41.0,
            longitude: -87.0,
            violation_count: 5,
            average_fine: 40.0,
            violation_type_count: 2,
        };
        let mut record = WorkingRecord::new(source, &fields, distance);
        record.risk_score = risk_score;
        record
    }

    #[test]
    fn sorts_by_ascending_risk_then_distance() {
        let mut records = vec![
            record(0, 1.0, 0.1),
            record(1, 0.0, 0.9),
            record(2, 0.5, 0.2),
            record(3, 0.0, 0.3),
        ];
        sort(&mut records);
        let order: Vec<usize> = records.iter().map(|r| r.source).collect();
        assert_eq!(order, vec![3, 1, 2, 0]);
    }

    #[test]
    fn nan_distance_does_not_break_ordering() {
        let mut records = vec![
            record(0, 0.0, f64::NAN),
            record(1, 0.0, 0.5),
            record(2, 0.0, 0.1),
        ];
        sort(&mut records);
        assert_eq!(records[0].source, 2);
        assert_eq!(records[1].source, 1);
    }

    #[test]
    fn encode_copies_fields_and_classifies() {
        let result = encode(&record(0, 0.8, 0.25), Some("WELLS ST"));
        assert_eq!(result.location_label, "WELLS ST");
        assert_eq!(result.violation_count, 5);
        assert_eq!(result.violation_type_count, 2);
        assert!((result.distance - 0.25).abs() < f64::EPSILON);
        assert_eq!(result.risk_level, RiskLevel::High);
    }

    #[test]
    fn missing_label_encodes_empty() {
        let result = encode(&record(0, 0.1, 0.25), None);
        assert_eq!(result.location_label, "");
        assert_eq!(result.risk_level, RiskLevel::Low);
    }
}
