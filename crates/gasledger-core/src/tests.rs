use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::edit_window::is_editable;
use crate::error::ProcessError;
use crate::operations::{change_rows, dumping_rows, DumpingTransfer, StorageChange};
use crate::pipeline::process;
use crate::types::{
    remarks, Caller, FlowMeter, OperationType, ProcessedRow, RawReading, Role,
};
use crate::{flow, segment, validation};

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, hour, minute, 0).unwrap()
}

fn operator() -> Uuid {
    Uuid::from_u128(0x11)
}

fn reading(id: i64, recorded_at: DateTime<Utc>, storage: &str, op: OperationType, turbine: f64) -> RawReading {
    RawReading {
        id,
        recorded_at,
        created_at: recorded_at,
        customer_code: "CUST-A".to_string(),
        storage_number: storage.to_string(),
        operator_id: operator(),
        operation_type: op,
        psi: 180.0,
        temp: 28.0,
        psi_out: 12.0,
        flow_turbine: turbine,
        fixed_storage_quantity: None,
        remarks: None,
    }
}

fn tagged(mut r: RawReading, tag: &str) -> RawReading {
    r.remarks = Some(tag.to_string());
    r
}

fn admin_caller() -> Caller {
    Caller {
        id: Uuid::from_u128(0xAD),
        role: Role::Admin,
    }
}

fn flows(readings: &[RawReading]) -> Vec<FlowMeter> {
    flow::annotate(readings).iter().map(|a| a.flow_meter).collect()
}

#[test]
fn first_reading_has_no_flow_delta() {
    let input = vec![reading(1, at(10, 0), "STG-1", OperationType::Manual, 100.0)];
    assert_eq!(flows(&input), vec![FlowMeter::NotComputable]);
}

#[test]
fn flow_delta_diffs_consecutive_turbine_counters() {
    let input = vec![
        reading(1, at(10, 0), "STG-1", OperationType::Manual, 100.0),
        reading(2, at(10, 30), "STG-1", OperationType::Manual, 150.0),
        reading(3, at(11, 0), "STG-1", OperationType::Stop, 170.0),
    ];
    assert_eq!(
        flows(&input),
        vec![
            FlowMeter::NotComputable,
            FlowMeter::Computable(50.0),
            // manual -> stop is the one sanctioned cross-type transition
            FlowMeter::Computable(20.0),
        ]
    );
}

#[test]
fn storage_swap_starts_a_new_counter_sequence() {
    let input = vec![
        reading(1, at(10, 0), "STG-1", OperationType::Manual, 100.0),
        reading(2, at(10, 30), "STG-2", OperationType::Manual, 150.0),
    ];
    assert_eq!(
        flows(&input),
        vec![FlowMeter::NotComputable, FlowMeter::NotComputable]
    );
}

#[test]
fn cross_type_transition_other_than_manual_stop_is_not_computable() {
    let input = vec![
        reading(1, at(10, 0), "STG-1", OperationType::Stop, 100.0),
        reading(2, at(10, 30), "STG-1", OperationType::Manual, 150.0),
        reading(3, at(11, 0), "STG-1", OperationType::Dumping, 180.0),
    ];
    assert_eq!(
        flows(&input),
        vec![
            FlowMeter::NotComputable,
            FlowMeter::NotComputable,
            FlowMeter::NotComputable,
        ]
    );
}

#[test]
fn negative_counter_diff_is_not_computable() {
    // Counter rollover or a data correction must never surface as consumption.
    let input = vec![
        reading(1, at(10, 0), "STG-1", OperationType::Manual, 500.0),
        reading(2, at(10, 30), "STG-1", OperationType::Manual, 120.0),
    ];
    assert_eq!(
        flows(&input),
        vec![FlowMeter::NotComputable, FlowMeter::NotComputable]
    );
}

#[test]
fn stop_terminated_run_emits_stop_summary() {
    let input = vec![
        reading(1, at(10, 0), "STG-1", OperationType::Manual, 100.0),
        reading(2, at(10, 30), "STG-1", OperationType::Manual, 150.0),
        reading(3, at(11, 0), "STG-1", OperationType::Stop, 170.0),
    ];
    let rows = process(&input, &admin_caller(), at(12, 0)).unwrap();

    assert_eq!(rows.len(), 4);
    assert_eq!(
        rows[0].as_reading().unwrap().annotated.flow_meter,
        FlowMeter::NotComputable
    );
    assert_eq!(
        rows[1].as_reading().unwrap().annotated.flow_meter,
        FlowMeter::Computable(50.0)
    );
    assert_eq!(
        rows[2].as_reading().unwrap().annotated.flow_meter,
        FlowMeter::Computable(20.0)
    );
    match &rows[3] {
        ProcessedRow::StopSummary(summary) => {
            assert_eq!(summary.total_flow, 70.0);
            assert_eq!(summary.duration, "01:00");
            assert_eq!(summary.recorded_at, at(11, 0));
            assert_eq!(summary.customer_code, "CUST-A");
        }
        other => panic!("expected stop summary, got {other:?}"),
    }
}

#[test]
fn lone_stop_reading_closes_its_own_episode() {
    let input = vec![reading(1, at(9, 15), "STG-1", OperationType::Stop, 340.0)];
    let rows = process(&input, &admin_caller(), at(10, 0)).unwrap();

    assert_eq!(rows.len(), 2);
    match &rows[1] {
        ProcessedRow::StopSummary(summary) => {
            assert_eq!(summary.total_flow, 0.0);
            assert_eq!(summary.duration, "00:00");
        }
        other => panic!("expected stop summary, got {other:?}"),
    }
}

#[test]
fn reversed_change_pair_is_reordered_old_storage_first() {
    let swap_at = at(14, 0);
    // Input arrives New-in before Old-out; the display order must not.
    let input = vec![
        reading(1, at(13, 0), "STG-1", OperationType::Manual, 100.0),
        tagged(
            reading(2, swap_at, "STG-2", OperationType::Manual, 0.0),
            remarks::CHANGE_NEW_IN,
        ),
        tagged(
            reading(3, swap_at, "STG-1", OperationType::Manual, 130.0),
            remarks::CHANGE_OLD_OUT,
        ),
    ];
    let rows = process(&input, &admin_caller(), at(15, 0)).unwrap();

    assert_eq!(rows.len(), 4);
    let old = rows[1].as_reading().unwrap();
    let new = rows[2].as_reading().unwrap();
    assert_eq!(old.annotated.reading.id, 3);
    assert!(old.is_change);
    assert_eq!(new.annotated.reading.id, 2);
    assert!(new.is_change);
    match &rows[3] {
        ProcessedRow::ChangeSummary(summary) => {
            assert_eq!(summary.recorded_at, swap_at);
            assert_eq!(summary.duration, "00:00");
        }
        other => panic!("expected change summary, got {other:?}"),
    }
}

#[test]
fn metering_run_before_dumping_emits_dumping_total() {
    let input = vec![
        reading(1, at(8, 0), "STG-1", OperationType::Manual, 100.0),
        reading(2, at(9, 0), "STG-1", OperationType::Manual, 160.0),
        reading(3, at(9, 30), "STG-2", OperationType::Dumping, 0.0),
    ];
    let rows = process(&input, &admin_caller(), at(10, 0)).unwrap();

    // run rows, DUMPING_TOTAL boundary, dumping row, dumping summary
    assert_eq!(rows.len(), 5);
    match &rows[2] {
        ProcessedRow::DumpingTotal(total) => {
            assert_eq!(total.total_flow, 60.0);
            assert_eq!(total.storage_number, "STG-1");
            // clock time of the run's end, not an elapsed span
            assert_eq!(total.duration, "09:00");
            assert_eq!(total.recorded_at, at(9, 0));
        }
        other => panic!("expected dumping total, got {other:?}"),
    }
    match &rows[4] {
        ProcessedRow::DumpingSummary(summary) => {
            assert_eq!(summary.total_flow, 0.0);
            assert_eq!(summary.duration, "00:00");
        }
        other => panic!("expected dumping summary, got {other:?}"),
    }
}

#[test]
fn storage_change_without_pair_remarks_emits_change_summary() {
    let input = vec![
        reading(1, at(8, 0), "STG-1", OperationType::Manual, 100.0),
        reading(2, at(9, 45), "STG-1", OperationType::Manual, 160.0),
        reading(3, at(10, 0), "STG-2", OperationType::Manual, 20.0),
    ];
    let rows = process(&input, &admin_caller(), at(11, 0)).unwrap();

    assert_eq!(rows.len(), 4);
    match &rows[2] {
        ProcessedRow::ChangeSummary(summary) => {
            assert_eq!(summary.total_flow, 60.0);
            assert_eq!(summary.duration, "01:45");
            assert_eq!(summary.recorded_at, at(9, 45));
        }
        other => panic!("expected change summary, got {other:?}"),
    }
}

#[test]
fn run_that_ends_the_stream_emits_no_summary() {
    let input = vec![
        reading(1, at(8, 0), "STG-1", OperationType::Manual, 100.0),
        reading(2, at(9, 0), "STG-1", OperationType::Manual, 160.0),
    ];
    let rows = process(&input, &admin_caller(), at(10, 0)).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.as_reading().is_some()));
}

#[test]
fn dumping_run_spans_readings_and_reports_wall_clock_only() {
    let input = vec![
        reading(1, at(7, 0), "STG-3", OperationType::Dumping, 10.0),
        reading(2, at(7, 20), "STG-3", OperationType::Dumping, 10.0),
        reading(3, at(8, 5), "STG-3", OperationType::Dumping, 10.0),
    ];
    let rows = process(&input, &admin_caller(), at(9, 0)).unwrap();

    assert_eq!(rows.len(), 4);
    assert!(rows[..3]
        .iter()
        .all(|r| r.as_reading().unwrap().is_dumping));
    match &rows[3] {
        ProcessedRow::DumpingSummary(summary) => {
            assert_eq!(summary.total_flow, 0.0);
            assert_eq!(summary.duration, "01:05");
            assert_eq!(summary.recorded_at, at(8, 5));
        }
        other => panic!("expected dumping summary, got {other:?}"),
    }
}

#[test]
fn tagged_dumping_quad_is_consumed_atomically() {
    let input = vec![
        tagged(
            reading(1, at(6, 0), "STG-2", OperationType::Dumping, 10.0),
            remarks::DUMPING_DEST_BEFORE,
        ),
        tagged(
            reading(2, at(6, 0), "STG-1", OperationType::Dumping, 10.0),
            remarks::DUMPING_SOURCE_BEFORE,
        ),
        tagged(
            reading(3, at(6, 40), "STG-1", OperationType::Dumping, 11.0),
            remarks::DUMPING_SOURCE_AFTER,
        ),
        tagged(
            reading(4, at(6, 40), "STG-2", OperationType::Dumping, 11.0),
            remarks::DUMPING_DEST_AFTER,
        ),
    ];
    let rows = process(&input, &admin_caller(), at(7, 0)).unwrap();

    // The quad emits its four marked rows and nothing else.
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| r.as_reading().unwrap().is_dumping));
}

#[test]
fn quad_embedded_in_longer_run_takes_precedence() {
    let mut input = vec![reading(1, at(5, 30), "STG-2", OperationType::Dumping, 9.0)];
    input.extend([
        tagged(
            reading(2, at(6, 0), "STG-2", OperationType::Dumping, 10.0),
            remarks::DUMPING_DEST_BEFORE,
        ),
        tagged(
            reading(3, at(6, 0), "STG-1", OperationType::Dumping, 10.0),
            remarks::DUMPING_SOURCE_BEFORE,
        ),
        tagged(
            reading(4, at(6, 40), "STG-1", OperationType::Dumping, 11.0),
            remarks::DUMPING_SOURCE_AFTER,
        ),
        tagged(
            reading(5, at(6, 40), "STG-2", OperationType::Dumping, 11.0),
            remarks::DUMPING_DEST_AFTER,
        ),
    ]);
    let rows = process(&input, &admin_caller(), at(7, 0)).unwrap();

    // Leading dumping reading closes as a run of one before the quad starts.
    assert_eq!(rows.len(), 6);
    assert!(matches!(rows[1], ProcessedRow::DumpingSummary(_)));
    assert!(rows[2..].iter().all(|r| r.as_reading().is_some()));
}

#[test]
fn incomplete_quad_falls_back_to_open_ended_run() {
    let input = vec![
        tagged(
            reading(1, at(6, 0), "STG-2", OperationType::Dumping, 10.0),
            remarks::DUMPING_DEST_BEFORE,
        ),
        reading(2, at(6, 30), "STG-2", OperationType::Dumping, 10.0),
    ];
    let rows = process(&input, &admin_caller(), at(7, 0)).unwrap();

    assert_eq!(rows.len(), 3);
    assert!(matches!(rows[2], ProcessedRow::DumpingSummary(_)));
}

#[test]
fn change_pair_interrupting_a_run_suppresses_the_run_summary() {
    let swap_at = at(12, 0);
    let input = vec![
        reading(1, at(10, 0), "STG-1", OperationType::Manual, 100.0),
        reading(2, at(11, 0), "STG-1", OperationType::Manual, 150.0),
        tagged(
            reading(3, swap_at, "STG-1", OperationType::Manual, 170.0),
            remarks::CHANGE_OLD_OUT,
        ),
        tagged(
            reading(4, swap_at, "STG-2", OperationType::Manual, 0.0),
            remarks::CHANGE_NEW_IN,
        ),
        reading(5, at(13, 0), "STG-2", OperationType::Manual, 40.0),
    ];
    let rows = process(&input, &admin_caller(), at(14, 0)).unwrap();

    // run rows 1-2 (no summary), pair rows, one change summary, trailing row
    assert_eq!(rows.len(), 6);
    assert!(rows[0].as_reading().is_some());
    assert!(rows[1].as_reading().is_some());
    assert_eq!(rows[2].as_reading().unwrap().annotated.reading.id, 3);
    assert_eq!(rows[3].as_reading().unwrap().annotated.reading.id, 4);
    assert!(matches!(rows[4], ProcessedRow::ChangeSummary(_)));
    assert!(rows[5].as_reading().is_some());
}

#[test]
fn duplicate_ids_are_rejected() {
    let input = vec![
        reading(7, at(10, 0), "STG-1", OperationType::Manual, 100.0),
        reading(7, at(10, 30), "STG-1", OperationType::Manual, 120.0),
    ];
    let err = validation::validate_sequence(&input).unwrap_err();
    assert!(matches!(err, ProcessError::DuplicateId { id: 7 }));
}

#[test]
fn decreasing_timestamps_are_rejected() {
    let input = vec![
        reading(1, at(10, 30), "STG-1", OperationType::Manual, 100.0),
        reading(2, at(10, 0), "STG-1", OperationType::Manual, 120.0),
    ];
    let err = validation::validate_sequence(&input).unwrap_err();
    assert!(matches!(err, ProcessError::OutOfOrder { id: 2, .. }));
}

#[test]
fn untagged_timestamp_tie_is_rejected() {
    let input = vec![
        reading(1, at(10, 0), "STG-1", OperationType::Manual, 100.0),
        reading(2, at(10, 0), "STG-1", OperationType::Manual, 120.0),
    ];
    let err = validation::validate_sequence(&input).unwrap_err();
    assert!(matches!(err, ProcessError::UnsanctionedTie { id: 2, prev_id: 1, .. }));
}

#[test]
fn malformed_sequence_aborts_processing() {
    let input = vec![
        reading(1, at(10, 30), "STG-1", OperationType::Manual, 100.0),
        reading(2, at(10, 0), "STG-1", OperationType::Manual, 120.0),
    ];
    assert!(process(&input, &admin_caller(), at(11, 0)).is_err());
}

#[test]
fn operator_edit_window_closes_after_two_hours() {
    let mut r = reading(1, at(9, 0), "STG-1", OperationType::Manual, 100.0);
    r.created_at = at(9, 0);
    let own = Caller {
        id: operator(),
        role: Role::Operator,
    };

    assert!(is_editable(&r, &own, at(10, 59)));
    assert!(is_editable(&r, &own, at(11, 0)));
    assert!(!is_editable(&r, &own, at(12, 0)));
    assert!(is_editable(&r, &admin_caller(), at(12, 0)));
}

#[test]
fn operator_cannot_edit_someone_elses_reading() {
    let r = reading(1, at(9, 0), "STG-1", OperationType::Manual, 100.0);
    let other = Caller {
        id: Uuid::from_u128(0x22),
        role: Role::Operator,
    };
    assert!(!is_editable(&r, &other, at(9, 5)));
}

#[test]
fn display_editability_matches_the_direct_decision() {
    let input = vec![
        reading(1, at(9, 0), "STG-1", OperationType::Manual, 100.0),
        reading(2, at(10, 30), "STG-1", OperationType::Manual, 150.0),
    ];
    let own = Caller {
        id: operator(),
        role: Role::Operator,
    };
    let now = at(12, 0);
    let rows = process(&input, &own, now).unwrap();

    for row in rows.iter().filter_map(|r| r.as_reading()) {
        assert_eq!(
            row.is_editable,
            is_editable(&row.annotated.reading, &own, now)
        );
    }
}

#[test]
fn reading_row_wire_shape_uses_camel_case_and_placeholder() {
    let input = vec![reading(9, at(10, 0), "STG-1", OperationType::Manual, 100.0)];
    let rows = process(&input, &admin_caller(), at(10, 5)).unwrap();
    let json = serde_json::to_value(&rows[0]).unwrap();

    assert_eq!(json["type"], "READING");
    assert_eq!(json["customerCode"], "CUST-A");
    assert_eq!(json["storageNumber"], "STG-1");
    assert_eq!(json["operationType"], "manual");
    assert_eq!(json["flowTurbine"], 100.0);
    assert_eq!(json["flowMeter"], "-");
    assert_eq!(json["isEditable"], true);
    assert_eq!(json["isChangeTrue"], false);
    assert_eq!(json["isDumpingTrue"], false);
}

#[test]
fn summary_rows_carry_no_operation_type() {
    let input = vec![
        reading(1, at(10, 0), "STG-1", OperationType::Manual, 100.0),
        reading(2, at(11, 0), "STG-1", OperationType::Stop, 170.0),
    ];
    let rows = process(&input, &admin_caller(), at(12, 0)).unwrap();
    let json = serde_json::to_value(&rows[2]).unwrap();

    assert_eq!(json["type"], "STOP_SUMMARY");
    assert!(json.get("operationType").is_none());
    assert_eq!(json["id"], "summary_stop_2");
    assert_eq!(json["totalFlow"], 70.0);
}

#[test]
fn elapsed_durations_exceeding_a_day_do_not_wrap() {
    let input = vec![
        reading(1, at(0, 0), "STG-1", OperationType::Manual, 0.0),
        RawReading {
            recorded_at: at(0, 0) + Duration::hours(26) + Duration::minutes(30),
            ..reading(2, at(0, 0), "STG-1", OperationType::Stop, 70.0)
        },
    ];
    let rows = process(&input, &admin_caller(), at(12, 0) + Duration::days(2)).unwrap();
    match &rows[2] {
        ProcessedRow::StopSummary(summary) => assert_eq!(summary.duration, "26:30"),
        other => panic!("expected stop summary, got {other:?}"),
    }
}

#[test]
fn change_rows_share_one_timestamp_and_carry_forward_counters() {
    let last = reading(10, at(13, 0), "STG-1", OperationType::Manual, 420.0);
    let change = StorageChange {
        old_storage_number: "STG-1".to_string(),
        new_storage_number: "STG-2".to_string(),
        old_storage_final_psi: 40.0,
        new_storage_initial_psi: 210.0,
        recorded_at: at(14, 0),
    };
    let [old_out, new_in] = change_rows(&change, &last, operator());

    assert_eq!(old_out.recorded_at, new_in.recorded_at);
    assert_eq!(old_out.storage_number, "STG-1");
    assert_eq!(old_out.psi, 40.0);
    assert_eq!(old_out.remarks.as_deref(), Some(remarks::CHANGE_OLD_OUT));
    assert_eq!(new_in.storage_number, "STG-2");
    assert_eq!(new_in.psi, 210.0);
    assert_eq!(new_in.remarks.as_deref(), Some(remarks::CHANGE_NEW_IN));
    assert_eq!(old_out.flow_turbine, 420.0);
    assert_eq!(new_in.flow_turbine, 420.0);
    assert_eq!(old_out.customer_code, "CUST-A");
}

#[test]
fn dumping_rows_come_out_in_canonical_segmenter_order() {
    let transfer = DumpingTransfer {
        customer_code: "CUST-A".to_string(),
        source_storage_number: "STG-1".to_string(),
        destination_storage_number: "STG-2".to_string(),
        source_psi_before: 200.0,
        source_psi_after: 60.0,
        destination_psi_before: 30.0,
        destination_psi_after: 170.0,
        source_temp_before: 29.0,
        source_temp_after: 26.0,
        destination_temp: 27.0,
        psi_out: 12.0,
        flow_turbine_before: 88.0,
        flow_turbine_after: 91.0,
        recorded_at_before: at(6, 0),
        recorded_at_after: at(6, 40),
    };
    let rows = dumping_rows(&transfer, operator());

    let tags: Vec<_> = rows.iter().map(|r| r.remarks.as_deref().unwrap()).collect();
    assert_eq!(
        tags,
        vec![
            remarks::DUMPING_DEST_BEFORE,
            remarks::DUMPING_SOURCE_BEFORE,
            remarks::DUMPING_SOURCE_AFTER,
            remarks::DUMPING_DEST_AFTER,
        ]
    );
    assert!(rows
        .iter()
        .all(|r| r.operation_type == OperationType::Dumping));
    assert_eq!(rows[0].recorded_at, rows[1].recorded_at);
    assert_eq!(rows[2].recorded_at, rows[3].recorded_at);
    assert_eq!(rows[1].storage_number, "STG-1");
    assert_eq!(rows[3].storage_number, "STG-2");
    assert_eq!(rows[0].flow_turbine, 88.0);
    assert_eq!(rows[3].flow_turbine, 91.0);
}

#[test]
fn constructed_dumping_rows_round_trip_through_the_segmenter() {
    let transfer = DumpingTransfer {
        customer_code: "CUST-A".to_string(),
        source_storage_number: "STG-1".to_string(),
        destination_storage_number: "STG-2".to_string(),
        source_psi_before: 200.0,
        source_psi_after: 60.0,
        destination_psi_before: 30.0,
        destination_psi_after: 170.0,
        source_temp_before: 29.0,
        source_temp_after: 26.0,
        destination_temp: 27.0,
        psi_out: 12.0,
        flow_turbine_before: 88.0,
        flow_turbine_after: 91.0,
        recorded_at_before: at(6, 0),
        recorded_at_after: at(6, 40),
    };
    let new_rows = dumping_rows(&transfer, operator());

    // Persist-shape the rows the way the store would.
    let stored: Vec<RawReading> = new_rows
        .iter()
        .enumerate()
        .map(|(idx, row)| RawReading {
            id: idx as i64 + 1,
            recorded_at: row.recorded_at,
            created_at: row.recorded_at,
            customer_code: row.customer_code.clone(),
            storage_number: row.storage_number.clone(),
            operator_id: row.operator_id,
            operation_type: row.operation_type,
            psi: row.psi,
            temp: row.temp,
            psi_out: row.psi_out,
            flow_turbine: row.flow_turbine,
            fixed_storage_quantity: row.fixed_storage_quantity,
            remarks: row.remarks.clone(),
        })
        .collect();

    let rows = process(&stored, &admin_caller(), at(7, 0)).unwrap();
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| r.as_reading().unwrap().is_dumping));
}

#[test]
fn annotation_is_strictly_left_to_right() {
    let input = vec![
        reading(1, at(10, 0), "STG-1", OperationType::Manual, 100.0),
        reading(2, at(10, 30), "STG-1", OperationType::Manual, 150.0),
        reading(3, at(11, 0), "STG-1", OperationType::Manual, 140.0),
        reading(4, at(11, 30), "STG-1", OperationType::Manual, 200.0),
    ];
    // The rollover at index 2 resets only its own delta; index 3 diffs
    // against the corrected counter.
    assert_eq!(
        flows(&input),
        vec![
            FlowMeter::NotComputable,
            FlowMeter::Computable(50.0),
            FlowMeter::NotComputable,
            FlowMeter::Computable(60.0),
        ]
    );
}

#[test]
fn empty_snapshot_processes_to_empty_output() {
    let rows = process(&[], &admin_caller(), at(10, 0)).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn segmenter_alone_leaves_editability_unset() {
    let annotated = flow::annotate(&[reading(1, at(10, 0), "STG-1", OperationType::Manual, 1.0)]);
    let rows = segment::segment(&annotated);
    assert!(!rows[0].as_reading().unwrap().is_editable);
}
