//! Postgres-backed collaborators for the reading ledger: the ordered reading
//! store (with atomic multi-row insert for change/dumping transactions) and
//! the caller-identity lookup.

use async_trait::async_trait;
use sqlx::migrate::MigrateError;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};
use thiserror::Error;
use uuid::Uuid;

use gasledger_core::{Caller, NewReading, OperationType, RawReading, Role};

pub mod seed;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] MigrateError),

    #[error("reading {0} not found")]
    ReadingNotFound(i64),

    #[error("no readings recorded for storage '{0}'")]
    StorageEmpty(String),

    #[error("unknown api token")]
    UnknownToken,

    #[error("invalid operation_type value '{0}' in row")]
    InvalidOperationType(String),

    #[error("invalid role value '{0}' for operator")]
    InvalidRole(String),
}

/// The fields a caller may change on an existing reading. `None` leaves the
/// stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ReadingPatch {
    pub psi: Option<f64>,
    pub temp: Option<f64>,
    pub psi_out: Option<f64>,
    pub flow_turbine: Option<f64>,
    pub remarks: Option<String>,
}

/// The data-access collaborator: hands out per-customer snapshots in the
/// processor's required `(recorded_at, id)` ascending order and persists
/// multi-row transactions all-or-nothing.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    async fn readings_for_customer(
        &self,
        customer_code: &str,
    ) -> Result<Vec<RawReading>, RepositoryError>;

    async fn fetch_reading(&self, id: i64) -> Result<RawReading, RepositoryError>;

    async fn last_reading_for_storage(
        &self,
        storage_number: &str,
    ) -> Result<RawReading, RepositoryError>;

    async fn insert_reading(&self, reading: &NewReading) -> Result<RawReading, RepositoryError>;

    /// Inserts every row in one database transaction. Either all rows land,
    /// in slice order, or none do.
    async fn insert_atomic(
        &self,
        readings: &[NewReading],
    ) -> Result<Vec<RawReading>, RepositoryError>;

    async fn update_reading(
        &self,
        id: i64,
        patch: &ReadingPatch,
    ) -> Result<RawReading, RepositoryError>;

    async fn delete_reading(&self, id: i64) -> Result<(), RepositoryError>;
}

/// The caller-identity collaborator. Resolution is a lookup, not an
/// authenticator; token issuance lives outside this system.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve(&self, api_token: &str) -> Result<Caller, RepositoryError>;
}

#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
    ) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

const READING_COLUMNS: &str = "id, recorded_at, created_at, customer_code, storage_number, \
     operator_id, operation_type, psi, temp, psi_out, flow_turbine, \
     fixed_storage_quantity, remarks";

fn map_reading(row: &PgRow) -> Result<RawReading, RepositoryError> {
    let operation_str: String = row.try_get("operation_type")?;
    let operation_type = OperationType::parse(&operation_str)
        .ok_or(RepositoryError::InvalidOperationType(operation_str))?;

    Ok(RawReading {
        id: row.try_get("id")?,
        recorded_at: row.try_get("recorded_at")?,
        created_at: row.try_get("created_at")?,
        customer_code: row.try_get("customer_code")?,
        storage_number: row.try_get("storage_number")?,
        operator_id: row.try_get("operator_id")?,
        operation_type,
        psi: row.try_get("psi")?,
        temp: row.try_get("temp")?,
        psi_out: row.try_get("psi_out")?,
        flow_turbine: row.try_get("flow_turbine")?,
        fixed_storage_quantity: row.try_get("fixed_storage_quantity")?,
        remarks: row.try_get("remarks")?,
    })
}

async fn insert_one(
    tx: &mut Transaction<'_, Postgres>,
    reading: &NewReading,
) -> Result<RawReading, RepositoryError> {
    let row = sqlx::query(&format!(
        r#"
        INSERT INTO readings (
            recorded_at,
            customer_code,
            storage_number,
            operator_id,
            operation_type,
            psi,
            temp,
            psi_out,
            flow_turbine,
            fixed_storage_quantity,
            remarks
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING {READING_COLUMNS}
        "#
    ))
    .bind(reading.recorded_at)
    .bind(&reading.customer_code)
    .bind(&reading.storage_number)
    .bind(reading.operator_id)
    .bind(reading.operation_type.as_str())
    .bind(reading.psi)
    .bind(reading.temp)
    .bind(reading.psi_out)
    .bind(reading.flow_turbine)
    .bind(reading.fixed_storage_quantity)
    .bind(&reading.remarks)
    .fetch_one(&mut **tx)
    .await?;

    map_reading(&row)
}

#[async_trait]
impl ReadingStore for PostgresRepository {
    async fn readings_for_customer(
        &self,
        customer_code: &str,
    ) -> Result<Vec<RawReading>, RepositoryError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {READING_COLUMNS}
            FROM readings
            WHERE customer_code = $1
            ORDER BY recorded_at ASC, id ASC
            "#
        ))
        .bind(customer_code)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_reading).collect()
    }

    async fn fetch_reading(&self, id: i64) -> Result<RawReading, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {READING_COLUMNS} FROM readings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => map_reading(&row),
            None => Err(RepositoryError::ReadingNotFound(id)),
        }
    }

    async fn last_reading_for_storage(
        &self,
        storage_number: &str,
    ) -> Result<RawReading, RepositoryError> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {READING_COLUMNS}
            FROM readings
            WHERE storage_number = $1
            ORDER BY recorded_at DESC, id DESC
            LIMIT 1
            "#
        ))
        .bind(storage_number)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => map_reading(&row),
            None => Err(RepositoryError::StorageEmpty(storage_number.to_string())),
        }
    }

    async fn insert_reading(&self, reading: &NewReading) -> Result<RawReading, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let stored = insert_one(&mut tx, reading).await?;
        tx.commit().await?;
        Ok(stored)
    }

    async fn insert_atomic(
        &self,
        readings: &[NewReading],
    ) -> Result<Vec<RawReading>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut stored = Vec::with_capacity(readings.len());
        for reading in readings {
            stored.push(insert_one(&mut tx, reading).await?);
        }
        tx.commit().await?;
        Ok(stored)
    }

    async fn update_reading(
        &self,
        id: i64,
        patch: &ReadingPatch,
    ) -> Result<RawReading, RepositoryError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE readings SET
                psi = COALESCE($2, psi),
                temp = COALESCE($3, temp),
                psi_out = COALESCE($4, psi_out),
                flow_turbine = COALESCE($5, flow_turbine),
                remarks = COALESCE($6, remarks)
            WHERE id = $1
            RETURNING {READING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.psi)
        .bind(patch.temp)
        .bind(patch.psi_out)
        .bind(patch.flow_turbine)
        .bind(&patch.remarks)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => map_reading(&row),
            None => Err(RepositoryError::ReadingNotFound(id)),
        }
    }

    async fn delete_reading(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM readings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::ReadingNotFound(id));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for PostgresRepository {
    async fn resolve(&self, api_token: &str) -> Result<Caller, RepositoryError> {
        let row = sqlx::query("SELECT id, role FROM operators WHERE api_token = $1")
            .bind(api_token)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Err(RepositoryError::UnknownToken);
        };

        let id: Uuid = row.try_get("id")?;
        let role_str: String = row.try_get("role")?;
        let role = Role::parse(&role_str).ok_or(RepositoryError::InvalidRole(role_str))?;

        Ok(Caller { id, role })
    }
}
