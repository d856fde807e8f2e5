// crates/gasledger-core/src/operations.rs
//
// Pure constructors for the two atomic multi-row transactions. The store
// collaborator persists the returned rows all-or-nothing; the constructors
// only decide what the rows contain and in which insertion order they must
// land so the segmenter later recognises the patterns.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::types::{remarks, NewReading, OperationType, RawReading};

/// A storage swap as requested by an operator. Values not present here
/// (customer, temperature, outlet pressure, turbine counter) carry forward
/// from the last reading of the outgoing storage.
#[derive(Debug, Clone)]
pub struct StorageChange {
    pub old_storage_number: String,
    pub new_storage_number: String,
    pub old_storage_final_psi: f64,
    pub new_storage_initial_psi: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Builds the complementary change pair. Both rows share one `recorded_at`;
/// that shared timestamp is exactly what the segmenter keys on.
pub fn change_rows(
    change: &StorageChange,
    last: &RawReading,
    operator_id: Uuid,
) -> [NewReading; 2] {
    let base = NewReading {
        recorded_at: change.recorded_at,
        customer_code: last.customer_code.clone(),
        storage_number: String::new(),
        operator_id,
        operation_type: OperationType::Manual,
        psi: 0.0,
        temp: last.temp,
        psi_out: last.psi_out,
        flow_turbine: last.flow_turbine,
        fixed_storage_quantity: last.fixed_storage_quantity,
        remarks: None,
    };

    let old_out = NewReading {
        storage_number: change.old_storage_number.clone(),
        psi: change.old_storage_final_psi,
        remarks: Some(remarks::CHANGE_OLD_OUT.to_string()),
        ..base.clone()
    };
    let new_in = NewReading {
        storage_number: change.new_storage_number.clone(),
        psi: change.new_storage_initial_psi,
        remarks: Some(remarks::CHANGE_NEW_IN.to_string()),
        ..base
    };

    [old_out, new_in]
}

/// A gas transfer between two storage units, observed at its start and end.
#[derive(Debug, Clone)]
pub struct DumpingTransfer {
    pub customer_code: String,
    pub source_storage_number: String,
    pub destination_storage_number: String,
    pub source_psi_before: f64,
    pub source_psi_after: f64,
    pub destination_psi_before: f64,
    pub destination_psi_after: f64,
    pub source_temp_before: f64,
    pub source_temp_after: f64,
    pub destination_temp: f64,
    pub psi_out: f64,
    pub flow_turbine_before: f64,
    pub flow_turbine_after: f64,
    pub recorded_at_before: DateTime<Utc>,
    pub recorded_at_after: DateTime<Utc>,
}

/// Builds the four tagged dumping rows in the canonical order the segmenter
/// matches: destination-before, source-before, source-after,
/// destination-after. The two "before" rows share the start instant and the
/// two "after" rows the end instant.
pub fn dumping_rows(transfer: &DumpingTransfer, operator_id: Uuid) -> [NewReading; 4] {
    let row = |storage: &str,
               psi: f64,
               temp: f64,
               flow_turbine: f64,
               recorded_at: DateTime<Utc>,
               tag: &str| NewReading {
        recorded_at,
        customer_code: transfer.customer_code.clone(),
        storage_number: storage.to_string(),
        operator_id,
        operation_type: OperationType::Dumping,
        psi,
        temp,
        psi_out: transfer.psi_out,
        flow_turbine,
        fixed_storage_quantity: None,
        remarks: Some(tag.to_string()),
    };

    [
        row(
            &transfer.destination_storage_number,
            transfer.destination_psi_before,
            transfer.destination_temp,
            transfer.flow_turbine_before,
            transfer.recorded_at_before,
            remarks::DUMPING_DEST_BEFORE,
        ),
        row(
            &transfer.source_storage_number,
            transfer.source_psi_before,
            transfer.source_temp_before,
            transfer.flow_turbine_before,
            transfer.recorded_at_before,
            remarks::DUMPING_SOURCE_BEFORE,
        ),
        row(
            &transfer.source_storage_number,
            transfer.source_psi_after,
            transfer.source_temp_after,
            transfer.flow_turbine_after,
            transfer.recorded_at_after,
            remarks::DUMPING_SOURCE_AFTER,
        ),
        row(
            &transfer.destination_storage_number,
            transfer.destination_psi_after,
            transfer.destination_temp,
            transfer.flow_turbine_after,
            transfer.recorded_at_after,
            remarks::DUMPING_DEST_AFTER,
        ),
    ]
}
