//! Database pool with split reader/writer connections in WAL mode.
//!
//! SQLite allows only one writer at a time, so conversation and message
//! inserts go through a single-connection writer pool while history reads
//! fan out over a multi-connection reader pool.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

const READER_CONNECTIONS: u32 = 8;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Split read/write pool for SQLite with WAL mode.
///
/// - `reader`: Multi-connection pool for concurrent SELECT queries.
/// - `writer`: Single-connection pool for serialized INSERT/UPDATE/DELETE.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open both pools and bring the schema up to date.
    ///
    /// Migrations run on the writer before the reader pool is opened.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let base_opts = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT)
            .create_if_missing(true);

        let read_opts = base_opts.clone().read_only(true);

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(base_opts)
            .await?;

        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(READER_CONNECTIONS)
            .connect_with(read_opts)
            .await?;

        tracing::debug!(url = database_url, "Database pool ready");
        Ok(Self { reader, writer })
    }

    /// Close both pools, waiting for in-flight queries to finish.
    pub async fn close(&self) {
        self.reader.close().await;
        self.writer.close().await;
    }
}
