//! Database connection management with pragma configuration.
//!
//! This module handles opening the SQLite database backing all generation
//! stores, applying required pragmas (WAL mode for concurrent resolution
//! tasks), and bootstrapping the schema.

use super::schema;
use crate::Error;
use std::path::Path;
use tokio_rusqlite::Connection;

/// Handle to the store database.
///
/// Wraps a tokio-rusqlite Connection that runs database operations on a
/// background thread. One database holds every generation's store.
#[derive(Clone, Debug)]
pub struct StoreDb {
    pub(crate) conn: Connection,
}

impl StoreDb {
    /// Open a database at the specified path.
    ///
    /// Creates the file if it doesn't exist, applies performance pragmas,
    /// and brings the schema up to date.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let conn = Connection::open(path).await.map_err(|e| Error::Store(e.into()))?;
        Self::init(conn).await
    }

    /// Open an in-memory database for testing, with the same pragma
    /// configuration as file-based databases.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory().await.map_err(|e| Error::Store(e.into()))?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, Error> {
        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode=WAL;
                 PRAGMA synchronous=NORMAL;
                 PRAGMA temp_store=MEMORY;
                 PRAGMA foreign_keys=ON;",
            )?;
            Ok(())
        })
        .await
        .map_err(Error::Store)?;

        schema::apply(&conn).await?;

        Ok(Self { conn })
    }
}
