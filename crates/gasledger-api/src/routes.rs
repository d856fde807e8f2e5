use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gasledger_core::{
    change_rows, dumping_rows, is_editable, process, Caller, DumpingTransfer, NewReading,
    OperationType, ProcessError, ProcessedRow, RawReading, StorageChange,
};
use gasledger_repository::{ReadingPatch, RepositoryError};

use crate::state::AppState;

pub enum ApiError {
    Status(StatusCode, String),
    Repository(RepositoryError),
    Process(ProcessError),
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        ApiError::Status(StatusCode::BAD_REQUEST, message.into())
    }

    fn forbidden() -> Self {
        ApiError::Status(
            StatusCode::FORBIDDEN,
            "reading is outside your edit window".to_string(),
        )
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        ApiError::Repository(err)
    }
}

impl From<ProcessError> for ApiError {
    fn from(err: ProcessError) -> Self {
        ApiError::Process(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Status(status, message) => (status, message),
            ApiError::Repository(err) => match &err {
                RepositoryError::ReadingNotFound(_) | RepositoryError::StorageEmpty(_) => {
                    (StatusCode::NOT_FOUND, err.to_string())
                }
                RepositoryError::UnknownToken => (StatusCode::UNAUTHORIZED, err.to_string()),
                _ => {
                    tracing::error!("repository failure: {err}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal error".to_string(),
                    )
                }
            },
            ApiError::Process(err) => {
                // A malformed stream means the stored snapshot itself violates
                // the ordering invariant; surface it as a server-side fault.
                tracing::error!("stream processing failed: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };
        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}

async fn caller_from(headers: &HeaderMap, state: &AppState) -> Result<Caller, ApiError> {
    let token = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| {
            ApiError::Status(
                StatusCode::UNAUTHORIZED,
                "missing bearer token".to_string(),
            )
        })?;
    Ok(state.identity.resolve(token).await?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub customer: String,
    pub sort_order: Option<String>,
}

/// `GET /readings?customer=CODE` returns the display-ready annotated sequence.
pub async fn list_readings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
    headers: HeaderMap,
) -> Result<Json<Vec<ProcessedRow>>, ApiError> {
    let caller = caller_from(&headers, &state).await?;
    let readings = state.store.readings_for_customer(&params.customer).await?;

    let mut rows = process(&readings, &caller, Utc::now())?;
    if params.sort_order.as_deref() == Some("desc") {
        rows.reverse();
    }
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReadingRequest {
    pub customer_code: String,
    pub storage_number: String,
    pub recorded_at: DateTime<Utc>,
    pub operation_type: Option<OperationType>,
    pub psi: f64,
    pub temp: f64,
    pub psi_out: f64,
    pub flow_turbine: f64,
    pub fixed_storage_quantity: Option<f64>,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResponse {
    pub readings: Vec<RawReading>,
}

/// `POST /readings` records a single metering observation (`manual`, or
/// `stop` to terminate the running episode). Dumping rows only exist as part
/// of the atomic transfer operation.
pub async fn create_reading(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<CreateReadingRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let caller = caller_from(&headers, &state).await?;

    let operation_type = request.operation_type.unwrap_or(OperationType::Manual);
    if operation_type == OperationType::Dumping {
        return Err(ApiError::bad_request(
            "dumping readings are created via the dumping operation",
        ));
    }

    let reading = NewReading {
        recorded_at: request.recorded_at,
        customer_code: request.customer_code,
        storage_number: request.storage_number,
        operator_id: caller.id,
        operation_type,
        psi: request.psi,
        temp: request.temp,
        psi_out: request.psi_out,
        flow_turbine: request.flow_turbine,
        fixed_storage_quantity: request.fixed_storage_quantity,
        remarks: request.remarks,
    };
    let stored = state.store.insert_reading(&reading).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            readings: vec![stored],
        }),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRequest {
    pub old_storage_number: String,
    pub new_storage_number: String,
    pub old_storage_final_psi: f64,
    pub new_storage_initial_psi: f64,
    pub recorded_at: DateTime<Utc>,
}

/// `POST /readings/change` records a storage swap as the complementary
/// row pair, inserted all-or-nothing.
pub async fn create_change(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<ChangeRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let caller = caller_from(&headers, &state).await?;

    let last = state
        .store
        .last_reading_for_storage(&request.old_storage_number)
        .await?;
    let change = StorageChange {
        old_storage_number: request.old_storage_number,
        new_storage_number: request.new_storage_number,
        old_storage_final_psi: request.old_storage_final_psi,
        new_storage_initial_psi: request.new_storage_initial_psi,
        recorded_at: request.recorded_at,
    };
    let rows = change_rows(&change, &last, caller.id);
    let stored = state.store.insert_atomic(&rows).await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { readings: stored })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DumpingRequest {
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

/// `POST /readings/dumping` records a gas transfer as the four tagged rows,
/// inserted all-or-nothing.
pub async fn create_dumping(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<DumpingRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let caller = caller_from(&headers, &state).await?;

    if request.recorded_at_after < request.recorded_at_before {
        return Err(ApiError::bad_request(
            "dumping end precedes its start",
        ));
    }

    let transfer = DumpingTransfer {
        customer_code: request.customer_code,
        source_storage_number: request.source_storage_number,
        destination_storage_number: request.destination_storage_number,
        source_psi_before: request.source_psi_before,
        source_psi_after: request.source_psi_after,
        destination_psi_before: request.destination_psi_before,
        destination_psi_after: request.destination_psi_after,
        source_temp_before: request.source_temp_before,
        source_temp_after: request.source_temp_after,
        destination_temp: request.destination_temp,
        psi_out: request.psi_out,
        flow_turbine_before: request.flow_turbine_before,
        flow_turbine_after: request.flow_turbine_after,
        recorded_at_before: request.recorded_at_before,
        recorded_at_after: request.recorded_at_after,
    };
    let rows = dumping_rows(&transfer, caller.id);
    let stored = state.store.insert_atomic(&rows).await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { readings: stored })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReadingRequest {
    pub psi: Option<f64>,
    pub temp: Option<f64>,
    pub psi_out: Option<f64>,
    pub flow_turbine: Option<f64>,
    pub remarks: Option<String>,
}

/// `PUT /readings/{id}`, gated by the same edit-window decision that the
/// display annotates rows with.
pub async fn update_reading(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(request): Json<UpdateReadingRequest>,
) -> Result<Json<RawReading>, ApiError> {
    let caller = caller_from(&headers, &state).await?;
    let reading = state.store.fetch_reading(id).await?;

    if !is_editable(&reading, &caller, Utc::now()) {
        return Err(ApiError::forbidden());
    }

    let patch = ReadingPatch {
        psi: request.psi,
        temp: request.temp,
        psi_out: request.psi_out,
        flow_turbine: request.flow_turbine,
        remarks: request.remarks,
    };
    let updated = state.store.update_reading(id, &patch).await?;
    Ok(Json(updated))
}

/// `DELETE /readings/{id}`, same gate as update.
pub async fn delete_reading(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let caller = caller_from(&headers, &state).await?;
    let reading = state.store.fetch_reading(id).await?;

    if !is_editable(&reading, &caller, Utc::now()) {
        return Err(ApiError::forbidden());
    }

    state.store.delete_reading(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
