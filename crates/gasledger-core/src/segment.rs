// crates/gasledger-core/src/segment.rs

use chrono::{DateTime, Utc};

use crate::types::{
    remarks, AnnotatedReading, DumpingTotalRow, OperationType, ProcessedRow, RawReading,
    ReadingRow, SummaryRow,
};

/// Groups an annotated, time-ordered sequence into operational episodes.
///
/// One forward scan with lookahead. At every position the prioritized
/// patterns are tried in order: the paired storage-change event, the
/// four-reading dumping transaction, then the generic manual/stop or dumping
/// run. Atomic patterns win over run extension, so a pair or tagged quad is
/// never swallowed into a neighbouring run.
///
/// `is_editable` on the emitted reading rows is left `false` here; the
/// pipeline stamps it afterwards from the caller identity.
pub fn segment(readings: &[AnnotatedReading]) -> Vec<ProcessedRow> {
    let mut rows = Vec::with_capacity(readings.len() + readings.len() / 4 + 1);
    let mut i = 0;

    while i < readings.len() {
        if let Some((old_idx, new_idx)) = change_pair_at(readings, i) {
            emit_change_pair(&readings[old_idx], &readings[new_idx], &mut rows);
            i += 2;
            continue;
        }

        if dumping_quad_at(readings, i) {
            for reading in &readings[i..i + 4] {
                rows.push(data_row(reading, false, true));
            }
            i += 4;
            continue;
        }

        i = match readings[i].reading.operation_type {
            OperationType::Manual | OperationType::Stop => metering_run(readings, i, &mut rows),
            OperationType::Dumping => dumping_run(readings, i, &mut rows),
        };
    }

    rows
}

/// True when `a` and `b` are the complementary storage-change rows: identical
/// `recorded_at` and the old-out/new-in remark pair in either order. This is
/// the one place two readings legitimately share a timestamp outside a
/// dumping transaction.
pub(crate) fn is_change_pair(a: &RawReading, b: &RawReading) -> bool {
    a.recorded_at == b.recorded_at
        && ((a.has_remark(remarks::CHANGE_OLD_OUT) && b.has_remark(remarks::CHANGE_NEW_IN))
            || (a.has_remark(remarks::CHANGE_NEW_IN) && b.has_remark(remarks::CHANGE_OLD_OUT)))
}

/// Returns `(old_index, new_index)` when positions `i`, `i + 1` hold a
/// change pair, normalising away the physical insertion order.
fn change_pair_at(readings: &[AnnotatedReading], i: usize) -> Option<(usize, usize)> {
    let current = readings.get(i)?;
    let next = readings.get(i + 1)?;
    if !is_change_pair(&current.reading, &next.reading) {
        return None;
    }
    if current.reading.has_remark(remarks::CHANGE_OLD_OUT) {
        Some((i, i + 1))
    } else {
        Some((i + 1, i))
    }
}

const DUMPING_QUAD: [&str; 4] = [
    remarks::DUMPING_DEST_BEFORE,
    remarks::DUMPING_SOURCE_BEFORE,
    remarks::DUMPING_SOURCE_AFTER,
    remarks::DUMPING_DEST_AFTER,
];

/// True when positions `i..i + 4` hold the tagged dumping transaction in its
/// canonical order. A `Destination Before` reading without the full tail is
/// not an error; it falls through to the open-ended dumping-run rule.
fn dumping_quad_at(readings: &[AnnotatedReading], i: usize) -> bool {
    readings.len() >= i + 4
        && DUMPING_QUAD
            .iter()
            .zip(&readings[i..i + 4])
            .all(|(tag, reading)| reading.reading.has_remark(tag))
}

fn emit_change_pair(
    old: &AnnotatedReading,
    new: &AnnotatedReading,
    rows: &mut Vec<ProcessedRow>,
) {
    // The old-storage reading leads regardless of which row was inserted first.
    rows.push(data_row(old, true, false));
    rows.push(data_row(new, true, false));

    let total_flow = old
        .flow_meter
        .value()
        .into_iter()
        .chain(new.flow_meter.value())
        .sum();
    rows.push(ProcessedRow::ChangeSummary(SummaryRow {
        id: format!("summary_change_{}", old.reading.id),
        total_flow,
        duration: "00:00".to_string(),
        customer_code: old.reading.customer_code.clone(),
        recorded_at: old.reading.recorded_at,
    }));
}

/// Emits a maximal manual/stop run starting at `start` plus its boundary row,
/// returning the next scan position.
fn metering_run(
    readings: &[AnnotatedReading],
    start: usize,
    rows: &mut Vec<ProcessedRow>,
) -> usize {
    let storage = &readings[start].reading.storage_number;
    let mut end = start;

    // A stop reading is included and terminates the run immediately.
    while readings[end].reading.operation_type != OperationType::Stop {
        let Some(next) = readings.get(end + 1) else {
            break;
        };
        if next.reading.storage_number != *storage {
            break;
        }
        if next.reading.operation_type == OperationType::Dumping {
            break;
        }
        // Never extend over the first half of a storage-change pair; the pair
        // rule must see it at a scan position.
        if readings
            .get(end + 2)
            .is_some_and(|after| is_change_pair(&next.reading, &after.reading))
        {
            break;
        }
        end += 1;
    }

    for reading in &readings[start..=end] {
        rows.push(data_row(reading, false, false));
    }

    let first = &readings[start].reading;
    let last = &readings[end].reading;
    let total_flow = computable_total(&readings[start..=end]);
    let next = readings.get(end + 1).map(|r| &r.reading);
    // When the run hands over to a storage-change pair, the pair rule emits
    // the boundary row; emitting one here as well would double it.
    let next_starts_pair = change_pair_at(readings, end + 1).is_some();

    if last.operation_type == OperationType::Stop {
        rows.push(ProcessedRow::StopSummary(SummaryRow {
            id: format!("summary_stop_{}", last.id),
            total_flow,
            duration: format_elapsed(first.recorded_at, last.recorded_at),
            customer_code: last.customer_code.clone(),
            recorded_at: last.recorded_at,
        }));
    } else if next.is_some_and(|n| n.operation_type == OperationType::Dumping) {
        rows.push(ProcessedRow::DumpingTotal(DumpingTotalRow {
            id: format!("summary_total_{}", last.id),
            total_flow,
            duration: clock_time(last.recorded_at),
            customer_code: last.customer_code.clone(),
            recorded_at: last.recorded_at,
            storage_number: last.storage_number.clone(),
        }));
    } else if next.is_some_and(|n| n.storage_number != *storage) && !next_starts_pair {
        rows.push(ProcessedRow::ChangeSummary(SummaryRow {
            id: format!("summary_change_{}", last.id),
            total_flow,
            duration: format_elapsed(first.recorded_at, last.recorded_at),
            customer_code: last.customer_code.clone(),
            recorded_at: last.recorded_at,
        }));
    }

    end + 1
}

/// Emits a maximal open-ended dumping run starting at `start` plus its
/// summary, returning the next scan position. Dumping episodes never
/// accumulate a throughput total; only the wall-clock span is reported.
fn dumping_run(
    readings: &[AnnotatedReading],
    start: usize,
    rows: &mut Vec<ProcessedRow>,
) -> usize {
    let mut end = start;
    while let Some(next) = readings.get(end + 1) {
        if next.reading.operation_type != OperationType::Dumping {
            break;
        }
        // A tagged quad embedded in a longer run is consumed by the quad rule.
        if dumping_quad_at(readings, end + 1) {
            break;
        }
        end += 1;
    }

    for reading in &readings[start..=end] {
        rows.push(data_row(reading, false, true));
    }

    let first = &readings[start].reading;
    let last = &readings[end].reading;
    rows.push(ProcessedRow::DumpingSummary(SummaryRow {
        id: format!("summary_dumping_{}", last.id),
        total_flow: 0.0,
        duration: format_elapsed(first.recorded_at, last.recorded_at),
        customer_code: last.customer_code.clone(),
        recorded_at: last.recorded_at,
    }));

    end + 1
}

fn data_row(annotated: &AnnotatedReading, is_change: bool, is_dumping: bool) -> ProcessedRow {
    ProcessedRow::Reading(ReadingRow {
        annotated: annotated.clone(),
        is_editable: false,
        is_change,
        is_dumping,
    })
}

fn computable_total(run: &[AnnotatedReading]) -> f64 {
    run.iter().filter_map(|r| r.flow_meter.value()).sum()
}

/// Whole minutes between the two boundary timestamps, truncated, as
/// zero-padded `HH:mm`. Hours are not wrapped at 24.
fn format_elapsed(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let minutes = (end - start).num_minutes().max(0);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn clock_time(at: DateTime<Utc>) -> String {
    at.format("%H:%M").to_string()
}
