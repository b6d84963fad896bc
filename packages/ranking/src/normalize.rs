//! Min/max normalization of violation counts into risk scores.

use crate::buffer::WorkingRecord;

/// Spans smaller than this are treated as 1 to avoid dividing by ~0.
pub const MIN_SPAN: f64 = 1e-9;

/// Assigns every survivor `(count - min) / (max - min)`.
///
/// Two passes: the extremes must be known before any score is written.
/// When all counts are equal every score is `0.0`.
#[allow(clippy::cast_precision_loss)]
pub fn assign_risk_scores(records: &mut [WorkingRecord]) {
    let Some((min_count, max_count)) = count_bounds(records) else {
        return;
    };

    let mut span = max_count.abs_diff(min_count) as f64;
    if span < MIN_SPAN {
        span = 1.0;
    }

    for record in records {
        record.risk_score = record.violation_count.abs_diff(min_count) as f64 / span;
    }
}

fn count_bounds(records: &[WorkingRecord]) -> Option<(i64, i64)> {
    let first = records.first()?.violation_count;
    Some(
        records
            .iter()
            .fold((first, first), |(min, max), record| {
                (
                    min.min(record.violation_count),
                    max.max(record.violation_count),
                )
            }),
    )
}
