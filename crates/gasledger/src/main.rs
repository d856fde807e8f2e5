use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gasledger_repository::{seed, PostgresRepository};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Gasledger admin CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run database migrations
    Migrate,
    /// Seed bootstrap operators (optionally running migrations)
    DbSeed(DbSeedArgs),
}

#[derive(Args, Debug, Default)]
struct DbSeedArgs {
    /// Skip running migrations before seeding
    #[arg(long)]
    skip_migrations: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Migrate => {
            let repository = connect().await?;
            repository.run_migrations().await?;
            info!("Database migrations applied");
            Ok(())
        }
        Command::DbSeed(args) => {
            let repository = connect().await?;
            if args.skip_migrations {
                warn!("Skipping migrations before seeding");
            } else {
                repository.run_migrations().await?;
            }
            seed::run(&repository).await?;
            info!("Bootstrap operators seeded");
            Ok(())
        }
    }
}

async fn connect() -> Result<PostgresRepository> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .or_else(|_| std::env::var("GASLEDGER_DATABASE_URL"))
        .context("DATABASE_URL (or GASLEDGER_DATABASE_URL) must be set")?;
    PostgresRepository::connect(&database_url, 5)
        .await
        .context("failed to connect to Postgres")
}
