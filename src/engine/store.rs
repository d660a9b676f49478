//! # engine::store
//!
//! The **Quote Store** — appends one row to the `quotation` table under its
//! own deadline.
//!
//! Every call opens a fresh `SqliteConnection`, takes the write lock with
//! `BEGIN IMMEDIATE` and stages the insert.  Only staging is raced against
//! the deadline; SQLite's own `busy_timeout` is set to the same budget so a
//! blocked handle gives up on its own instead of outliving the request.  A
//! staged row that misses the deadline is never committed: its connection is
//! dropped and SQLite rolls the transaction back.
//!
//! The `COMMIT` itself is not raced.  Once it has been issued its outcome is
//! what gets reported, so the call can run over the deadline by the length of
//! one commit on a lock it already holds.

use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
use sqlx::{Connection, SqliteConnection};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::models::Quote;

const INSERT_QUOTE: &str = r#"
    INSERT INTO quotation
      (code, codein, name, high, low, var_bid, pct_change, bid, ask, timestamp, create_date)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

/// Lock wait allowed to the start-up migration.
const MIGRATION_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Primary result code of `SQLITE_BUSY`.
const SQLITE_BUSY: i32 = 5;

pub struct QuoteStore {
    options: SqliteConnectOptions,
    deadline: Duration,
}

impl QuoteStore {
    pub fn new(options: SqliteConnectOptions, deadline: Duration) -> Self {
        let options = options
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(deadline);

        Self { options, deadline }
    }

    /// Build a store from a `sqlite://` URL such as `sqlite://cotacao.db`.
    pub fn from_url(database_url: &str, deadline: Duration) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?;
        Ok(Self::new(options, deadline))
    }

    /// Create the `quotation` table if it is missing.  Runs once at start-up,
    /// outside any request deadline.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        let options = self.options.clone().busy_timeout(MIGRATION_BUSY_TIMEOUT);
        let mut conn = SqliteConnection::connect_with(&options)
            .await
            .context("Failed to open SQLite database")?;

        sqlx::query(include_str!("../../migrations/001_init.sql"))
            .execute(&mut conn)
            .await
            .context("Failed to run migration 001_init.sql")?;

        conn.close().await.context("Failed to close SQLite connection")?;

        info!("✅ SQLite schema ready");
        Ok(())
    }

    /// Insert `quote` as a new row and stamp it with the generated id.
    ///
    /// On error `quote.id` is left untouched and no row is committed.
    pub async fn persist(&self, quote: &mut Quote) -> Result<i64, StoreError> {
        let started = Instant::now();

        let (conn, id) = tokio::time::timeout(self.deadline, self.stage(quote))
            .await
            .map_err(|_| StoreError::Timeout(self.deadline))?
            .map_err(|e| {
                if is_busy(&e) {
                    StoreError::Timeout(self.deadline)
                } else {
                    StoreError::Storage(e)
                }
            })?;

        let id = self.commit(conn, id).await?;

        quote.id = id;
        debug!(id, elapsed = ?started.elapsed(), "Quote persisted");
        Ok(id)
    }

    /// Open a connection, take the write lock and insert without committing.
    async fn stage(&self, quote: &Quote) -> Result<(SqliteConnection, i64), sqlx::Error> {
        let mut conn = SqliteConnection::connect_with(&self.options).await?;

        sqlx::query("BEGIN IMMEDIATE").execute(&mut conn).await?;
        let id = sqlx::query(INSERT_QUOTE)
            .bind(&quote.code)
            .bind(&quote.codein)
            .bind(&quote.name)
            .bind(&quote.high)
            .bind(&quote.low)
            .bind(&quote.var_bid)
            .bind(&quote.pct_change)
            .bind(&quote.bid)
            .bind(&quote.ask)
            .bind(&quote.timestamp)
            .bind(&quote.create_date)
            .execute(&mut conn)
            .await?
            .last_insert_rowid();

        Ok((conn, id))
    }

    async fn commit(&self, mut conn: SqliteConnection, id: i64) -> Result<i64, sqlx::Error> {
        sqlx::query("COMMIT").execute(&mut conn).await?;

        // The row is durable at this point; a failed close must not turn it
        // into a reported failure.
        if let Err(e) = conn.close().await {
            warn!(error = %e, id, "SQLite connection did not close cleanly");
        }
        Ok(id)
    }
}

fn is_busy(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db
            .code()
            .and_then(|code| code.parse::<i32>().ok())
            .is_some_and(|code| code & 0xff == SQLITE_BUSY),
        _ => false,
    }
}
