//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL. It follows the
//! Repository pattern to provide clean abstractions over database operations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Commands   │  (crate::commands - one unit of work per invocation)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - queries & mutations)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │   Models    │  (db::models - database records & report rows)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │  PostgreSQL │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`handlers`]: Repository implementations
//! - [`models`]: Database record structures matching table schemas
//! - [`schema`]: Table definitions and the drop/recreate migration step
//! - [`errors`]: Database-specific error types
//!
//! # Connections
//!
//! Every invocation of the tool opens exactly one connection with [`connect`], performs its unit
//! of work and exits. There is no pool: repositories borrow the connection (or a transaction
//! started on it) for the duration of the call.
//!
//! ```ignore
//! let mut conn = agentctl::db::connect(&config.database).await?;
//! let mut repo = BaseModels::new(&mut conn);
//! repo.delete(1).await?;
//! ```

pub mod errors;
pub mod handlers;
pub mod models;
pub mod schema;

use std::str::FromStr;

use log::LevelFilter;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::ConnectOptions;
use tracing::{debug, instrument};

use crate::config::DatabaseConfig;
use errors::{DbError, Result};

/// Open the single connection used by one command.
#[instrument(skip_all, err)]
pub async fn connect(config: &DatabaseConfig) -> Result<PgConnection> {
    let options = PgConnectOptions::from_str(&config.url)
        .map_err(|e| DbError::Other(anyhow::anyhow!("Invalid database URL: {}", e)))?
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, config.slow_statement_threshold());

    let conn = options.connect().await?;
    debug!(
        host = options.get_host(),
        database = options.get_database().unwrap_or_default(),
        "connected"
    );
    Ok(conn)
}
