use sqlx::AnyPool;
use tracing::info;

use crate::error::CustomError;

const POSTGRES_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS accounts (
        id BIGSERIAL PRIMARY KEY,
        first_name VARCHAR(255) NOT NULL,
        last_name VARCHAR(255) NOT NULL,
        encrypted_password VARCHAR(255) NOT NULL,
        number BIGINT NOT NULL UNIQUE,
        balance BIGINT NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL
    )"#;

// AUTOINCREMENT keeps SQLite from handing out a deleted rowid again.
const SQLITE_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS accounts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        encrypted_password TEXT NOT NULL,
        number BIGINT NOT NULL UNIQUE,
        balance BIGINT NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL
    )"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    pub fn from_url(url: &str) -> Result<Self, CustomError> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(Backend::Postgres)
        } else if url.starts_with("sqlite:") {
            Ok(Backend::Sqlite)
        } else {
            Err(CustomError::ConfigError(
                "DATABASE_URL".to_string(),
                "expected a postgres:// or sqlite: url".to_string(),
            ))
        }
    }
}

pub struct Database {
    pub pool: AnyPool,
    backend: Backend,
}

impl Database {
    pub async fn connect(url: &str) -> Result<Self, CustomError> {
        let backend = Backend::from_url(url)?;
        sqlx::any::install_default_drivers();
        let pool = sqlx::any::AnyPoolOptions::new()
            .max_connections(10)
            .idle_timeout(std::time::Duration::from_secs(30))
            .connect(url)
            .await
            .map_err(CustomError::DBError)?;
        info!(?backend, "database pool ready");
        Ok(Database { pool, backend })
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub async fn init_schema(&self) -> Result<(), CustomError> {
        let ddl = match self.backend {
            Backend::Postgres => POSTGRES_SCHEMA,
            Backend::Sqlite => SQLITE_SCHEMA,
        };
        sqlx::query(ddl)
            .execute(&self.pool)
            .await
            .map_err(CustomError::DBError)?;
        Ok(())
    }

    pub fn log_pool_stats(&self) {
        let size = self.pool.size();
        let idle = self.pool.num_idle() as u32;
        tracing::debug!(total = size, idle, active = size.saturating_sub(idle), "db pool stats");
    }
}
