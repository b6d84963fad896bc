//! Reusable working buffer and its growth counters.
//!
//! The buffer is owned by a [`crate::RankingEngine`] and reused across
//! calls. Its logical capacity only grows: the first growth allocates the
//! configured baseline, every later growth doubles until the request fits.
//! Records are cleared at the end of every call so nothing from one call
//! (in particular the index of a candidate's label) survives into the next.

use parkwise_ranking_models::HotPathStats;

use crate::RankingError;
use crate::decode::CandidateFields;

/// One pooled slot of per-call computation state.
#[derive(Debug, Clone, Copy)]
pub struct WorkingRecord {
    /// Index of the originating candidate in the current call's input. Used
    /// to resolve the location label at encode time.
    pub source: usize,
    pub latitude: f64,
    pub longitude: f64,
    pub distance: f64,
    pub average_fine: f64,
    pub violation_count: i64,
    pub violation_type_count: i64,
    /// Zero until the normalizer has run.
    pub risk_score: f64,
}

impl WorkingRecord {
    #[must_use]
    pub const fn new(source: usize, fields: &CandidateFields, distance: f64) -> Self {
        Self {
            source,
            latitude: fields.latitude,
            longitude: fields.longitude,
            distance,
            average_fine: fields.average_fine,
            violation_count: fields.violation_count,
            violation_type_count: fields.violation_type_count,
            risk_score: 0.0,
        }
    }
}

/// Growable slot array with allocation accounting.
#[derive(Debug)]
pub struct WorkingBuffer {
    records: Vec<WorkingRecord>,
    capacity: usize,
    baseline_capacity: usize,
    allocations_last_call: u64,
    total_reallocations: u64,
}

impl WorkingBuffer {
    /// Creates an empty buffer. Nothing is allocated until the first
    /// [`Self::ensure_capacity`].
    #[must_use]
    pub const fn new(baseline_capacity: usize) -> Self {
        Self {
            records: Vec::new(),
            capacity: 0,
            baseline_capacity,
            allocations_last_call: 0,
            total_reallocations: 0,
        }
    }

    /// Resets the per-call allocation counter and drops anything a
    /// previous, unwound call may have left behind.
    pub fn begin_call(&mut self) {
        self.allocations_last_call = 0;
        self.records.clear();
    }

    /// Guarantees room for `needed` records.
    ///
    /// # Errors
    ///
    /// Returns [`RankingError::AllocationFailure`] if the doubled size
    /// overflows or the allocator refuses it. Capacity and counters are left
    /// unchanged in that case.
    pub fn ensure_capacity(&mut self, needed: usize) -> Result<(), RankingError> {
        if needed <= self.capacity {
            return Ok(());
        }

        let mut new_capacity = if self.capacity > 0 {
            self.capacity
        } else {
            self.baseline_capacity.max(1)
        };
        while new_capacity < needed {
            new_capacity = new_capacity
                .checked_mul(2)
                .ok_or(RankingError::AllocationFailure {
                    requested: needed,
                    source: None,
                })?;
        }

        self.records.clear();
        self.records
            .try_reserve_exact(new_capacity)
            .map_err(|e| RankingError::AllocationFailure {
                requested: new_capacity,
                source: Some(e),
            })?;

        log::debug!(
            "Grew working buffer from {} to {new_capacity} slots for {needed} candidates",
            self.capacity
        );

        self.capacity = new_capacity;
        self.allocations_last_call += 1;
        self.total_reallocations += 1;
        Ok(())
    }

    /// Appends a survivor. Callers reserve first, so this never reallocates.
    pub fn push(&mut self, record: WorkingRecord) {
        debug_assert!(self.records.len() < self.capacity);
        self.records.push(record);
    }

    /// Survivors written during the current call.
    pub fn records_mut(&mut self) -> &mut [WorkingRecord] {
        &mut self.records
    }

    /// Drops every record of the current call, returning how many were held.
    pub fn release(&mut self) -> usize {
        let held = self.records.len();
        self.records.clear();
        held
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub const fn stats(&self) -> HotPathStats {
        HotPathStats {
            allocations_last_call: self.allocations_last_call,
            total_reallocations: self.total_reallocations,
            buffer_capacity: self.capacity,
        }
    }
}
