//! Store catalog operations: one named store per cache generation.
//!
//! The catalog is what the activation sweep walks: it can enumerate every
//! generation store that exists and delete the ones that are no longer
//! current.

use super::connection::StoreDb;
use super::entries::GenerationStore;
use crate::Error;
use tokio_rusqlite::params;

/// The catalog surface an activation sweep walks.
///
/// [`StoreDb`] is the production implementation; the trait exists so
/// sweep callers can be exercised against catalogs whose deletes fail.
#[async_trait::async_trait]
pub trait StoreCatalog: Send + Sync {
    /// Every store name currently present, in creation order.
    async fn list_store_names(&self) -> Result<Vec<String>, Error>;

    /// Delete the named store; true if one was removed.
    async fn delete_store(&self, name: &str) -> Result<bool, Error>;
}

#[async_trait::async_trait]
impl StoreCatalog for StoreDb {
    async fn list_store_names(&self) -> Result<Vec<String>, Error> {
        StoreDb::list_store_names(self).await
    }

    async fn delete_store(&self, name: &str) -> Result<bool, Error> {
        StoreDb::delete_store(self, name).await
    }
}

impl StoreDb {
    /// Create-or-open the named generation store.
    ///
    /// Opening is idempotent: an existing store is left untouched.
    pub async fn open_store(&self, name: &str) -> Result<GenerationStore, Error> {
        let owned = name.to_string();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT OR IGNORE INTO stores (name, created_at) VALUES (?1, ?2)",
                    params![owned, chrono::Utc::now().to_rfc3339()],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)?;

        Ok(GenerationStore::new(self.clone(), name.to_string()))
    }

    /// List every store name currently present, in creation order.
    pub async fn list_store_names(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT name FROM stores ORDER BY created_at, name")?;
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete the named store and all of its entries.
    ///
    /// Returns true if a store was removed, false if none existed by that
    /// name. Entries go with it via ON DELETE CASCADE.
    pub async fn delete_store(&self, name: &str) -> Result<bool, Error> {
        let owned = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let deleted = conn.execute("DELETE FROM stores WHERE name = ?1", params![owned])?;
                Ok(deleted > 0)
            })
            .await
            .map_err(Error::from)
    }
}
