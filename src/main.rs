use std::sync::Arc;

use anyhow::{Context, Result};
use bank_accounts::{
    account::{
        controller::AccountController,
        repository::{AccountRepository, AccountStore},
        service::AccountService,
    },
    auth::{PasswordCodec, TokenIssuer},
    config::Config,
    db::Database,
    server::Server,
};
use clap::Parser;
use tokio::sync::oneshot;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Bank account service")]
struct Cli {
    /// Seed the database with a demo account
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let database = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    database
        .init_schema()
        .await
        .context("Failed to create accounts table")?;
    database.log_pool_stats();
    info!("Connected to the database");

    let codec = PasswordCodec::new(config.bcrypt_cost)?;
    let repository = Arc::new(AccountRepository::new(database.pool.clone(), codec));

    if cli.seed {
        let account = repository
            .create("John", "Doe", "password")
            .await
            .context("Failed to seed account")?;
        info!(number = account.number, "Seeded demo account");
    }

    let tokens = TokenIssuer::new(
        config.jwt_secret.as_bytes(),
        chrono::Duration::hours(config.token_ttl_hours),
    );
    let controller = Arc::new(AccountController::new(AccountService::new(repository, tokens)));
    let server = Server::new(controller);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = shutdown_tx.send(());
            }
            Err(e) => error!("failed to listen for shutdown signal: {e}"),
        }
    });

    server.start(config.listen_addr, shutdown_rx).await?;
    database.pool.close().await;
    info!("Goodbye");
    Ok(())
}
