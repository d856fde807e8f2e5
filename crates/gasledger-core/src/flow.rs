// crates/gasledger-core/src/flow.rs

use crate::types::{AnnotatedReading, FlowMeter, OperationType, RawReading};

/// Attaches the per-interval flow-meter delta to every reading.
///
/// The rule is strictly left-to-right over the per-customer ordering: each
/// delta is taken against the immediate predecessor, so re-ordering the input
/// changes every subsequent value. A delta exists only when the predecessor
/// belongs to the same physical counter sequence: same storage, and either
/// the same operation type or the one sanctioned `manual` -> `stop`
/// transition. Negative diffs indicate counter rollover or a data correction
/// and are reported as not computable rather than as consumption.
pub fn annotate(readings: &[RawReading]) -> Vec<AnnotatedReading> {
    readings
        .iter()
        .enumerate()
        .map(|(i, reading)| AnnotatedReading {
            reading: reading.clone(),
            flow_meter: match i.checked_sub(1).map(|p| &readings[p]) {
                Some(prev) => delta(prev, reading),
                None => FlowMeter::NotComputable,
            },
        })
        .collect()
}

fn delta(prev: &RawReading, current: &RawReading) -> FlowMeter {
    if current.storage_number != prev.storage_number {
        return FlowMeter::NotComputable;
    }
    if current.operation_type != prev.operation_type && !is_stop_after_manual(prev, current) {
        return FlowMeter::NotComputable;
    }

    let diff = current.flow_turbine - prev.flow_turbine;
    if diff.is_finite() && diff >= 0.0 {
        FlowMeter::Computable(diff)
    } else {
        FlowMeter::NotComputable
    }
}

// A stop reading legitimately continues the counter sequence of the manual
// run it terminates; every other cross-type transition starts a new sequence.
fn is_stop_after_manual(prev: &RawReading, current: &RawReading) -> bool {
    prev.operation_type == OperationType::Manual && current.operation_type == OperationType::Stop
}
