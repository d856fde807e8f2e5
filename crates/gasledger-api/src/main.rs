use std::sync::Arc;

use anyhow::Result;
use gasledger_api::{router, AppState};
use gasledger_repository::PostgresRepository;
use tokio::net::TcpListener;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL not set");

    let repository = Arc::new(PostgresRepository::connect(&database_url, 5).await?);
    repository.run_migrations().await?;

    let state = Arc::new(AppState::new(repository.clone(), repository));

    let listener = TcpListener::bind((std::net::Ipv4Addr::UNSPECIFIED, 3000)).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state).into_make_service()).await?;

    Ok(())
}
