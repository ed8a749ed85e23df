//! Warehouse connection and bulk-insert operations.
//!
//! One pool per run, built from the warehouse credential file. The
//! credential file's `role` and `schema` are applied as session settings
//! on every new connection; `warehouse` is recorded as the connection's
//! application name.

use std::time::Duration;

use gaload_core::WarehouseCredentials;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use thiserror::Error;

pub mod insert;

pub use insert::{insert_rows, write_run_log, QualifiedTable, RunLogEntry};

const DEFAULT_MAX_CONNECTIONS: u32 = 4;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PORT: u16 = 5432;

/// Pool sizing knobs, read from env with defaults. A one-shot load needs
/// few connections; the knobs exist for operators running large batches.
#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            max_connections: read_u32("GALOAD_DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS),
            acquire_timeout_secs: read_u64(
                "GALOAD_DB_ACQUIRE_TIMEOUT_SECS",
                DEFAULT_ACQUIRE_TIMEOUT_SECS,
            ),
        }
    }
}

/// Errors raised while connecting to or writing into the warehouse.
#[derive(Debug, Error)]
pub enum DbError {
    /// An identifier (table, column, role, schema) contains a double quote
    /// and cannot be safely quoted.
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// A row's value count disagrees with the column list.
    #[error("row shape mismatch: {0}")]
    Mismatch(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Doubles-quotes an identifier for safe interpolation into SQL.
///
/// # Errors
///
/// Returns [`DbError::InvalidIdentifier`] if the identifier is empty or
/// contains a double quote. Identifier text is otherwise preserved
/// verbatim, so dimension names like `ga:pagePath` are legal column names.
pub fn quote_ident(ident: &str) -> Result<String, DbError> {
    if ident.is_empty() || ident.contains('"') {
        return Err(DbError::InvalidIdentifier(ident.to_string()));
    }
    Ok(format!("\"{ident}\""))
}

/// Connects a pool to the warehouse described by `creds`.
///
/// `account` is the host, optionally `host:port`. Each new connection runs
/// `SET ROLE` and `SET search_path` from the credential file before use,
/// so unqualified statements resolve inside the configured schema.
///
/// # Errors
///
/// Returns [`DbError::InvalidIdentifier`] if `role` or `schema` cannot be
/// quoted, or [`DbError::Sqlx`] if the connection fails (bad credentials,
/// unreachable host).
pub async fn connect(creds: &WarehouseCredentials, config: PoolConfig) -> Result<PgPool, DbError> {
    let (host, port) = split_host_port(&creds.account);

    let options = PgConnectOptions::new()
        .host(host)
        .port(port)
        .username(&creds.user)
        .password(&creds.password)
        .database(&creds.database)
        .application_name(&creds.warehouse);

    let set_role = format!("SET ROLE {}", quote_ident(&creds.role)?);
    let set_search_path = format!("SET search_path TO {}", quote_ident(&creds.schema)?);

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .after_connect(move |conn, _meta| {
            let set_role = set_role.clone();
            let set_search_path = set_search_path.clone();
            Box::pin(async move {
                sqlx::query(&set_role).execute(&mut *conn).await?;
                sqlx::query(&set_search_path).execute(&mut *conn).await?;
                Ok(())
            })
        })
        .connect_with(options)
        .await?;

    tracing::info!(
        host = %creds.account,
        database = %creds.database,
        schema = %creds.schema,
        "connected to warehouse"
    );
    Ok(pool)
}

fn split_host_port(account: &str) -> (&str, u16) {
    match account.rsplit_once(':') {
        Some((host, port)) => match port.parse::<u16>() {
            Ok(port) => (host, port),
            Err(_) => (account, DEFAULT_PORT),
        },
        None => (account, DEFAULT_PORT),
    }
}

fn read_u32(var: &str, default: u32) -> u32 {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(default)
}

fn read_u64(var: &str, default: u64) -> u64 {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}
