// crates/gasledger-core/src/validation.rs

use std::collections::HashSet;

use crate::error::{ProcessError, Result};
use crate::segment::is_change_pair;
use crate::types::{OperationType, RawReading};

/// Checks the total-order invariant of an input stream before processing.
///
/// Readings must arrive ascending by `(recorded_at, id)`. Two readings may
/// share a `recorded_at` only as part of an atomic transaction: the
/// complementary storage-change pair, or the before/after instants of a
/// dumping transaction (both rows dumping-typed). Anything else means the
/// snapshot is disordered and segmentation would be silently wrong, so the
/// whole stream is rejected.
pub fn validate_sequence(readings: &[RawReading]) -> Result<()> {
    let mut seen_ids = HashSet::with_capacity(readings.len());
    for reading in readings {
        if !seen_ids.insert(reading.id) {
            return Err(ProcessError::DuplicateId { id: reading.id });
        }
    }

    for pair in readings.windows(2) {
        let (prev, current) = (&pair[0], &pair[1]);

        if current.recorded_at < prev.recorded_at {
            return Err(ProcessError::OutOfOrder {
                id: current.id,
                recorded_at: current.recorded_at,
                prev_id: prev.id,
                prev_recorded_at: prev.recorded_at,
            });
        }

        if current.recorded_at == prev.recorded_at && !sanctioned_tie(prev, current) {
            return Err(ProcessError::UnsanctionedTie {
                id: current.id,
                prev_id: prev.id,
                recorded_at: current.recorded_at,
            });
        }
    }

    Ok(())
}

fn sanctioned_tie(prev: &RawReading, current: &RawReading) -> bool {
    if is_change_pair(prev, current) {
        return true;
    }
    prev.operation_type == OperationType::Dumping
        && current.operation_type == OperationType::Dumping
}
