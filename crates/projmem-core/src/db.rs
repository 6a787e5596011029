//! PostgreSQL connection handling.
//!
//! One invocation uses exactly one connection: open it, run the operation,
//! close it. There is no pool and no shared state between invocations.

use sqlx::postgres::PgConnection;
use sqlx::Connection;
use tracing::debug;

use crate::error::{Error, Result};

/// A single open connection to the memory store.
pub struct Database {
    pub(crate) conn: PgConnection,
}

impl Database {
    /// Connect to the store at `url`.
    ///
    /// Failures here are [`Error::Connection`]: the store is unreachable,
    /// the credentials are bad, or the database does not exist.
    pub async fn connect(url: &str) -> Result<Self> {
        let conn = PgConnection::connect(url).await.map_err(Error::Connection)?;
        debug!("Connected to database");
        Ok(Self { conn })
    }

    /// Cleanly close the connection.
    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        Ok(())
    }
}
