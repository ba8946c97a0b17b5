//! PostgreSQL client implementation
//!
//! Pooled connections via `deadpool-postgres`, with the statement timeout set
//! on every checkout and driver errors classified into [`StoreError`].

use crate::config::PostgreSQLConfig;
use crate::domain::{AgendaError, Result, StoreError};
use deadpool_postgres::{Manager, ManagerConfig, Pool, PoolError, RecyclingMethod};
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::config::SslMode;
use tokio_postgres::error::SqlState;
use tokio_postgres::types::ToSql;
use tokio_postgres::{NoTls, Row};

pub(crate) type StoreResult<T> = std::result::Result<T, StoreError>;

/// PostgreSQL client for Agenda
pub struct PostgreSQLClient {
    pool: Pool,
    config: PostgreSQLConfig,
}

impl PostgreSQLClient {
    /// Create a new PostgreSQL client
    ///
    /// The pool connects lazily, so this succeeds without a reachable server.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the connection string cannot be
    /// parsed or the TLS connector cannot be built.
    pub fn new(config: PostgreSQLConfig) -> Result<Self> {
        let mut pg_config: tokio_postgres::Config = config
            .connection_string
            .expose_secret()
            .as_str()
            .parse()
            .map_err(|e| {
                AgendaError::Configuration(format!("Invalid PostgreSQL connection string: {e}"))
            })?;

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let manager = match config.ssl_mode.as_str() {
            "disable" => {
                pg_config.ssl_mode(SslMode::Disable);
                Manager::from_config(pg_config, NoTls, manager_config)
            }
            mode => {
                pg_config.ssl_mode(if mode == "require" {
                    SslMode::Require
                } else {
                    SslMode::Prefer
                });
                let connector = native_tls::TlsConnector::builder().build().map_err(|e| {
                    AgendaError::Configuration(format!("Failed to build TLS connector: {e}"))
                })?;
                Manager::from_config(
                    pg_config,
                    postgres_native_tls::MakeTlsConnector::new(connector),
                    manager_config,
                )
            }
        };

        let timeout = Duration::from_secs(config.connection_timeout_seconds);
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .wait_timeout(Some(timeout))
            .create_timeout(Some(timeout))
            .recycle_timeout(Some(timeout))
            .runtime(deadpool_postgres::Runtime::Tokio1)
            .build()
            .map_err(|e| {
                AgendaError::Configuration(format!("Failed to create connection pool: {e}"))
            })?;

        Ok(Self { pool, config })
    }

    /// Checks out a connection and runs `SELECT 1`
    pub async fn test_connection(&self) -> StoreResult<()> {
        self.query("SELECT 1", &[]).await?;
        tracing::info!(server = %self.connection_string_safe(), "PostgreSQL connection test successful");
        Ok(())
    }

    /// Creates the patient and appointment tables if they do not exist
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        let client = self.checkout().await?;
        client
            .batch_execute(include_str!("../../../migrations/001_schedule_schema.sql"))
            .await
            .map_err(classify)?;
        tracing::info!("PostgreSQL schedule schema ready");
        Ok(())
    }

    async fn checkout(&self) -> StoreResult<deadpool_postgres::Object> {
        let client = self.pool.get().await.map_err(|e| match e {
            PoolError::Timeout(_) => {
                StoreError::Timeout(format!("Timed out waiting for a connection: {e}"))
            }
            PoolError::Backend(err) => classify(err),
            other => StoreError::ConnectionFailed(other.to_string()),
        })?;

        client
            .batch_execute(&format!(
                "SET statement_timeout = {}",
                self.config.statement_timeout_seconds * 1000
            ))
            .await
            .map_err(classify)?;

        Ok(client)
    }

    /// Runs a query and returns its rows
    pub async fn query(
        &self,
        query: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> StoreResult<Vec<Row>> {
        let client = self.checkout().await?;
        client.query(query, params).await.map_err(classify)
    }

    /// Runs a statement and returns the number of affected rows
    pub async fn execute(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> StoreResult<u64> {
        let client = self.checkout().await?;
        client.execute(statement, params).await.map_err(classify)
    }

    /// Connection target with credentials removed
    pub fn connection_string_safe(&self) -> String {
        redact(self.config.connection_string.expose_secret().as_str())
    }

    /// Pool statistics
    pub fn pool_status(&self) -> deadpool_postgres::Status {
        self.pool.status()
    }
}

fn redact(connection_string: &str) -> String {
    match connection_string.rsplit_once('@') {
        Some((_, host)) => format!("postgresql://***@{host}"),
        None => "postgresql://***".to_string(),
    }
}

/// Classifies a driver error by SQLSTATE
pub(crate) fn classify(err: tokio_postgres::Error) -> StoreError {
    let message = err
        .as_db_error()
        .map(|db| db.message().to_string())
        .unwrap_or_else(|| err.to_string());

    match err.code() {
        Some(code) => classify_state(code, message),
        None => StoreError::ConnectionFailed(message),
    }
}

fn classify_state(code: &SqlState, message: String) -> StoreError {
    if *code == SqlState::UNIQUE_VIOLATION
        || *code == SqlState::FOREIGN_KEY_VIOLATION
        || *code == SqlState::CHECK_VIOLATION
        || *code == SqlState::NOT_NULL_VIOLATION
    {
        StoreError::ConstraintViolation(message)
    } else if *code == SqlState::INSUFFICIENT_PRIVILEGE {
        StoreError::PermissionDenied(message)
    } else if *code == SqlState::QUERY_CANCELED {
        StoreError::Timeout(message)
    } else {
        StoreError::QueryFailed(message)
    }
}
