#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Radius filtering and risk ranking of parking violation locations.
//!
//! A [`RankingEngine`] is meant to sit on a hot path and be called many
//! times. Each [`RankingEngine::filter_rank`] call runs a fixed pipeline
//! over a working buffer that is reused across calls:
//!
//! 1. **Filter**: haversine distance from the query point, dropping every
//!    candidate farther than the radius (a candidate exactly on the radius
//!    is kept).
//! 2. **Normalize**: min/max scale each survivor's violation count into a
//!    `[0, 1]` risk score.
//! 3. **Rank**: sort by risk score ascending, then distance ascending.
//! 4. **Encode**: the first `limit` survivors become [`RankedResult`]s with
//!    a [`RiskLevel`](parkwise_ranking_models::RiskLevel).
//!
//! Note the ordering: the returned slice is the *least* risky part of the
//! neighborhood, nearest first within equal scores.
//!
//! The engine needs `&mut self` for a call, so sharing one between threads
//! requires wrapping it in a lock.
//!
//! # Usage
//!
//! ```rust
//! use parkwise_ranking::{GeoPoint, RankingEngine};
//! use parkwise_ranking_models::Candidate;
//!
//! let mut engine = RankingEngine::default();
//! let candidates = vec![
//!     Candidate::new(40.01, -73.0, 10, 50.0, 2, "A"),
//!     Candidate::new(41.0, -73.0, 5, 20.0, 1, "B"),
//!     Candidate::new(40.0, -73.01, 10, 50.0, 2, "C"),
//! ];
//!
//! let results = engine
//!     .filter_rank(GeoPoint::new(40.0, -73.0), 5.0, &candidates, 2)
//!     .unwrap();
//! assert_eq!(results.len(), 2);
//! assert_eq!(results[0].location_label, "C");
//! ```

pub mod buffer;
pub mod decode;
pub mod distance;
pub mod normalize;
pub mod rank;

use std::collections::TryReserveError;

pub use decode::{CandidateFields, CandidateRecord, DecodeError};
pub use distance::{EARTH_RADIUS_MILES, GeoPoint, distance_miles};
pub use parkwise_ranking_models::{
    Candidate, HotPathStats, RankedResult, RankingConfig, RiskLevel,
};

use buffer::{WorkingBuffer, WorkingRecord};

/// Errors that abort a ranking call. A failed call returns no results.
#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    /// A candidate could not be decoded.
    #[error("candidate {index}: {source}")]
    Decode {
        /// Position of the offending candidate in the input.
        index: usize,
        /// What was wrong with it.
        source: DecodeError,
    },

    /// The working buffer could not grow to hold every candidate.
    #[error("out of memory growing working buffer to {requested} slots")]
    AllocationFailure {
        /// Number of slots that were requested.
        requested: usize,
        /// Allocator error, or `None` if the size itself overflowed.
        source: Option<TryReserveError>,
    },
}

/// Filter/rank pipeline plus the working buffer it reuses across calls.
#[derive(Debug)]
pub struct RankingEngine {
    buffer: WorkingBuffer,
}

impl Default for RankingEngine {
    fn default() -> Self {
        Self::new(RankingConfig::default())
    }
}

impl RankingEngine {
    /// Creates an engine. The buffer is allocated lazily on the first
    /// non-empty call.
    #[must_use]
    pub const fn new(config: RankingConfig) -> Self {
        Self {
            buffer: WorkingBuffer::new(config.baseline_capacity),
        }
    }

    /// Filters `candidates` to those within `radius_miles` of `query`,
    /// scores them, and returns the first `max(1, limit)` by
    /// `(risk_score, distance)` ascending.
    ///
    /// Returns an empty list when there are no candidates or none are in
    /// range.
    ///
    /// # Errors
    ///
    /// * [`RankingError::AllocationFailure`] if the working buffer cannot
    ///   grow to `candidates.len()`; nothing is processed in that case.
    /// * [`RankingError::Decode`] on the first candidate that fails to
    ///   decode.
    pub fn filter_rank<C: CandidateRecord>(
        &mut self,
        query: GeoPoint,
        radius_miles: f64,
        candidates: &[C],
        limit: i64,
    ) -> Result<Vec<RankedResult>, RankingError> {
        let limit = effective_limit(limit);
        self.buffer.begin_call();

        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        self.buffer.ensure_capacity(candidates.len())?;

        let outcome = self.run_pipeline(query, radius_miles, candidates, limit);
        let released = self.buffer.release();

        match &outcome {
            Ok(results) => log::trace!(
                "filter_rank: {} candidates, {released} within {radius_miles} mi, returning {}",
                candidates.len(),
                results.len()
            ),
            Err(e) => log::debug!("filter_rank aborted after {released} survivors: {e}"),
        }

        outcome
    }

    /// Allocation counters for the working buffer.
    #[must_use]
    pub const fn hot_path_stats(&self) -> HotPathStats {
        self.buffer.stats()
    }

    fn run_pipeline<C: CandidateRecord>(
        &mut self,
        query: GeoPoint,
        radius_miles: f64,
        candidates: &[C],
        limit: usize,
    ) -> Result<Vec<RankedResult>, RankingError> {
        for (index, candidate) in candidates.iter().enumerate() {
            let fields = candidate
                .decode()
                .map_err(|source| RankingError::Decode { index, source })?;

            let distance = distance_miles(query, GeoPoint::new(fields.latitude, fields.longitude));
            if distance > radius_miles {
                continue;
            }

            self.buffer.push(WorkingRecord::new(index, &fields, distance));
        }

        let survivors = self.buffer.records_mut();
        if survivors.is_empty() {
            return Ok(Vec::new());
        }

        normalize::assign_risk_scores(survivors);
        rank::sort(survivors);

        Ok(survivors
            .iter()
            .take(limit)
            .map(|record| rank::encode(record, candidates[record.source].location_label()))
            .collect())
    }

    #[cfg(test)]
    fn held_records(&self) -> usize {
        self.buffer.len()
    }
}

/// Limits below 1 are treated as 1.
fn effective_limit(limit: i64) -> usize {
    usize::try_from(limit.max(1)).unwrap_or(usize::MAX)
}
