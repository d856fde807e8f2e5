// crates/gasledger-core/src/pipeline.rs

use chrono::{DateTime, Utc};

use crate::edit_window::is_editable;
use crate::error::Result;
use crate::types::{Caller, ProcessedRow, RawReading};
use crate::{flow, segment, validation};

/// Turns one customer's raw reading snapshot into the display-ready row
/// sequence: validate the ordering invariant, attach flow deltas, segment
/// into episodes, then stamp per-row editability for the caller.
///
/// Pure and deterministic for a fixed snapshot; every invocation owns its
/// input and output, so concurrent calls never share state.
pub fn process(
    readings: &[RawReading],
    caller: &Caller,
    now: DateTime<Utc>,
) -> Result<Vec<ProcessedRow>> {
    validation::validate_sequence(readings)?;

    let annotated = flow::annotate(readings);
    let mut rows = segment::segment(&annotated);

    for row in &mut rows {
        if let ProcessedRow::Reading(reading_row) = row {
            reading_row.is_editable = is_editable(&reading_row.annotated.reading, caller, now);
        }
    }

    Ok(rows)
}
