// crates/gasledger-core/src/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

/// Remark strings with structural meaning to the segmenter. A reading carrying
/// one of these belongs to an atomic multi-row transaction, not an ordinary run.
pub mod remarks {
    pub const CHANGE_OLD_OUT: &str = "Change: Old Storage Out";
    pub const CHANGE_NEW_IN: &str = "Change: New Storage In";
    pub const DUMPING_DEST_BEFORE: &str = "Dumping: Destination Before";
    pub const DUMPING_SOURCE_BEFORE: &str = "Dumping: Source Before";
    pub const DUMPING_SOURCE_AFTER: &str = "Dumping: Source After";
    pub const DUMPING_DEST_AFTER: &str = "Dumping: Destination After";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Manual,
    Dumping,
    Stop,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Manual => "manual",
            OperationType::Dumping => "dumping",
            OperationType::Stop => "stop",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "manual" => Some(OperationType::Manual),
            "dumping" => Some(OperationType::Dumping),
            "stop" => Some(OperationType::Stop),
            _ => None,
        }
    }
}

/// One operator-submitted observation, exactly as the store returns it.
/// `recorded_at` is the operational time of the observation; `created_at` is
/// the persistence time and participates only in edit-window arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReading {
    pub id: i64,
    pub recorded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub customer_code: String,
    pub storage_number: String,
    pub operator_id: Uuid,
    pub operation_type: OperationType,
    pub psi: f64,
    pub temp: f64,
    pub psi_out: f64,
    /// Monotonically increasing device counter, not a rate.
    pub flow_turbine: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_storage_quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl RawReading {
    pub fn has_remark(&self, tag: &str) -> bool {
        self.remarks.as_deref() == Some(tag)
    }
}

/// A reading to be inserted. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReading {
    pub recorded_at: DateTime<Utc>,
    pub customer_code: String,
    pub storage_number: String,
    pub operator_id: Uuid,
    pub operation_type: OperationType,
    pub psi: f64,
    pub temp: f64,
    pub psi_out: f64,
    pub flow_turbine: f64,
    pub fixed_storage_quantity: Option<f64>,
    pub remarks: Option<String>,
}

/// Per-interval consumption derived from two consecutive turbine counters.
/// `NotComputable` is an expected value, never an error and never a zero; it
/// goes over the wire as the `"-"` placeholder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlowMeter {
    Computable(f64),
    NotComputable,
}

impl FlowMeter {
    pub fn value(&self) -> Option<f64> {
        match self {
            FlowMeter::Computable(v) => Some(*v),
            FlowMeter::NotComputable => None,
        }
    }
}

impl Serialize for FlowMeter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FlowMeter::Computable(v) => serializer.serialize_f64(*v),
            FlowMeter::NotComputable => serializer.serialize_str("-"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedReading {
    #[serde(flatten)]
    pub reading: RawReading,
    pub flow_meter: FlowMeter,
}

/// A display row holding an original reading plus its per-request annotations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingRow {
    #[serde(flatten)]
    pub annotated: AnnotatedReading,
    pub is_editable: bool,
    /// Marks carried on the wire under the names the frontend already consumes.
    #[serde(rename = "isChangeTrue")]
    pub is_change: bool,
    #[serde(rename = "isDumpingTrue")]
    pub is_dumping: bool,
}

/// Synthetic boundary row closing a change or stop episode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub id: String,
    pub total_flow: f64,
    /// Elapsed wall time of the closed episode, zero-padded `HH:mm`.
    pub duration: String,
    pub customer_code: String,
    pub recorded_at: DateTime<Utc>,
}

/// Synthetic row emitted when a metering run hands over to a dumping run;
/// carries the pre-dumping cumulative total and the storage being vacated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DumpingTotalRow {
    pub id: String,
    pub total_flow: f64,
    /// Clock time at which the metering run ended, `HH:mm` (not an elapsed span).
    pub duration: String,
    pub customer_code: String,
    pub recorded_at: DateTime<Utc>,
    pub storage_number: String,
}

/// The display-ready row sequence: original readings interleaved with
/// synthetic episode boundaries. Summary rows carry no `operationType`, so
/// feeding the output back through the segmenter never re-segments them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessedRow {
    Reading(ReadingRow),
    ChangeSummary(SummaryRow),
    StopSummary(SummaryRow),
    DumpingTotal(DumpingTotalRow),
    DumpingSummary(SummaryRow),
}

impl ProcessedRow {
    pub fn as_reading(&self) -> Option<&ReadingRow> {
        match self {
            ProcessedRow::Reading(row) => Some(row),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Operator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Operator => "operator",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "operator" => Some(Role::Operator),
            _ => None,
        }
    }
}

/// The resolved caller identity supplied by the identity collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: Uuid,
    pub role: Role,
}
