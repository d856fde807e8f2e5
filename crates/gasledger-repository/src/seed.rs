// crates/gasledger-repository/src/seed.rs

use sqlx::postgres::PgQueryResult;
use tracing::info;
use uuid::Uuid;

use crate::RepositoryError;
use crate::PostgresRepository;

struct OperatorSeed {
    username: &'static str,
    role: &'static str,
    api_token: &'static str,
}

// Bootstrap identities for a fresh install; tokens are meant to be rotated
// immediately after first login.
const OPERATORS: &[OperatorSeed] = &[
    OperatorSeed {
        username: "admin",
        role: "admin",
        api_token: "dev-admin-token",
    },
    OperatorSeed {
        username: "field-operator",
        role: "operator",
        api_token: "dev-operator-token",
    },
];

pub async fn run(repository: &PostgresRepository) -> Result<(), RepositoryError> {
    for operator in OPERATORS {
        let result: PgQueryResult = sqlx::query(
            r#"
            INSERT INTO operators (id, username, role, api_token)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (username)
            DO UPDATE SET role = EXCLUDED.role
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(operator.username)
        .bind(operator.role)
        .bind(operator.api_token)
        .execute(repository.pool())
        .await?;

        if result.rows_affected() > 0 {
            info!(username = operator.username, "Seeded operator");
        }
    }
    Ok(())
}
