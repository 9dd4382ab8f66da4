//! Schema bootstrap.
//!
//! The whole schema ships as a single batch; `PRAGMA user_version` stamps
//! which batch a database file was written with. A file stamped by a
//! newer build is refused rather than reinterpreted.

use super::Error;
use tokio_rusqlite::Connection;

const SCHEMA_VERSION: i64 = 1;
const SCHEMA: &str = include_str!("../../sql/schema.sql");

/// Bring a freshly opened database up to the current schema.
///
/// A no-op when the file is already at [`SCHEMA_VERSION`].
pub async fn apply(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        let stamped: i64 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .map_err(Error::from)?;

        if stamped > SCHEMA_VERSION {
            return Err(Error::MigrationFailed(format!(
                "database is at schema version {stamped}, this build supports up to {SCHEMA_VERSION}"
            )));
        }

        if stamped < SCHEMA_VERSION {
            conn.execute_batch(SCHEMA)?;
            conn.pragma_update(None, "user_version", SCHEMA_VERSION).map_err(Error::from)?;
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn stamped_version(conn: &Connection) -> i64 {
        conn.call(|conn| conn.query_row("PRAGMA user_version", [], |row| row.get(0)))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_apply_creates_tables_and_stamps_version() {
        let conn = Connection::open_in_memory().await.unwrap();
        apply(&conn).await.unwrap();

        let has_entries: bool = conn
            .call(|conn| {
                conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='entries')",
                    [],
                    |row| row.get(0),
                )
            })
            .await
            .unwrap();

        assert!(has_entries);
        assert_eq!(stamped_version(&conn).await, SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_apply_is_a_noop_on_current_version() {
        let conn = Connection::open_in_memory().await.unwrap();
        apply(&conn).await.unwrap();
        apply(&conn).await.unwrap();

        assert_eq!(stamped_version(&conn).await, SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_apply_refuses_newer_database() {
        let conn = Connection::open_in_memory().await.unwrap();
        conn.call(|conn| conn.pragma_update(None, "user_version", 99_i64))
            .await
            .unwrap();

        let result = apply(&conn).await;
        assert!(matches!(result, Err(Error::MigrationFailed(_))));
    }
}
