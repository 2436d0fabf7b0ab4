//! Ordered capture of split records

use std::time::Duration;

use tracing::debug;

use crate::types::{Lane, LapRecord, RecordId};
use crate::{Result, TimingError};

/// Splits captured for one race, in capture order.
///
/// Record `n` (1-based) always sits at index `n - 1`, so lookups by
/// [`RecordId`] are O(1).
#[derive(Debug, Clone, Default)]
pub struct LapRecorder {
    records: Vec<LapRecord>,
    limit: Option<usize>,
}

impl LapRecorder {
    pub fn new(limit: Option<usize>) -> Self {
        Self { records: Vec::new(), limit }
    }

    /// Append a split at `raw_time` and return its id.
    pub(crate) fn record(&mut self, raw_time: Duration) -> Result<RecordId> {
        if let Some(limit) = self.limit.filter(|&limit| self.records.len() >= limit) {
            return Err(TimingError::LapLimitReached { limit });
        }
        let sequence = u32::try_from(self.records.len() + 1).unwrap_or(u32::MAX);
        let id = RecordId::new(sequence);
        self.records.push(LapRecord::new(id, raw_time));
        debug!("Recorded split {} at {:?}", id, raw_time);
        Ok(id)
    }

    /// Drop all records.
    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[LapRecord] {
        &self.records
    }

    /// The start marker, whose split anchors the winning-time offset.
    pub fn first(&self) -> Option<&LapRecord> {
        self.records.first()
    }

    pub fn get(&self, id: RecordId) -> Result<&LapRecord> {
        Self::index_of(id).and_then(|i| self.records.get(i)).ok_or(TimingError::UnknownRecord { id })
    }

    pub(crate) fn get_mut(&mut self, id: RecordId) -> Result<&mut LapRecord> {
        Self::index_of(id)
            .and_then(|i| self.records.get_mut(i))
            .ok_or(TimingError::UnknownRecord { id })
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut LapRecord> {
        self.records.iter_mut()
    }

    /// Record currently holding `lane`, if any.
    pub fn holder_of(&self, lane: Lane) -> Option<&LapRecord> {
        self.records.iter().find(|r| r.lane() == Some(lane))
    }

    pub(crate) fn holder_of_mut(&mut self, lane: Lane) -> Option<&mut LapRecord> {
        self.records.iter_mut().find(|r| r.lane() == Some(lane))
    }

    /// Id of the record after `id`, used to move lane-entry focus.
    pub fn next_after(&self, id: RecordId) -> Option<RecordId> {
        let next = RecordId::new(id.sequence().checked_add(1)?);
        self.get(next).ok().map(LapRecord::id)
    }

    fn index_of(id: RecordId) -> Option<usize> {
        usize::try_from(id.sequence()).ok()?.checked_sub(1)
    }
}
