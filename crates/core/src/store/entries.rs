//! Entry operations on a single generation store.
//!
//! A [`GenerationStore`] maps request keys (normalized URLs; only GET is
//! handled) to buffered responses. Within one store there is at most one
//! response per key at any time; writes overwrite.

use super::connection::StoreDb;
use crate::response::{CachedResponse, ResponseKind};
use crate::Error;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// Handle to one generation's key→response mapping.
#[derive(Clone, Debug)]
pub struct GenerationStore {
    db: StoreDb,
    name: String,
}

impl GenerationStore {
    pub(crate) fn new(db: StoreDb, name: String) -> Self {
        Self { db, name }
    }

    /// The generation token this store belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up the response stored under a key.
    pub async fn get(&self, key: &str) -> Result<Option<CachedResponse>, Error> {
        let store_name = self.name.clone();
        let key = key.to_string();
        self.db
            .conn
            .call(move |conn| -> Result<Option<CachedResponse>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT status, kind, content_type, headers_json, body
                     FROM entries WHERE store_name = ?1 AND key = ?2",
                )?;

                let result = stmt.query_row(params![store_name, key], |row| {
                    let status: i64 = row.get(0)?;
                    let kind: String = row.get(1)?;
                    let content_type: Option<String> = row.get(2)?;
                    let headers_json: Option<String> = row.get(3)?;
                    let body: Vec<u8> = row.get(4)?;
                    Ok((status, kind, content_type, headers_json, body))
                });

                match result {
                    Ok((status, kind, content_type, headers_json, body)) => {
                        let headers = match headers_json.as_deref() {
                            None => Vec::new(),
                            Some(json) => match serde_json::from_str(json) {
                                Ok(headers) => headers,
                                Err(e) => {
                                    // The entry is still servable without them.
                                    tracing::warn!(%key, reason = %e, "dropping undecodable stored headers");
                                    Vec::new()
                                }
                            },
                        };
                        Ok(Some(CachedResponse {
                            status: status as u16,
                            kind: ResponseKind::parse(&kind),
                            content_type,
                            headers,
                            body: body.into(),
                        }))
                    }
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Store a response under a key.
    ///
    /// Uses UPSERT semantics: inserts if the key doesn't exist, replaces
    /// the entry if it does. Idempotent for identical content.
    pub async fn put(&self, key: &str, response: &CachedResponse) -> Result<(), Error> {
        let store_name = self.name.clone();
        let key = key.to_string();
        let response = response.clone();
        self.db
            .conn
            .call(move |conn| -> Result<(), Error> {
                let headers_json = if response.headers.is_empty() {
                    None
                } else {
                    Some(
                        serde_json::to_string(&response.headers)
                            .map_err(|e| Error::from(rusqlite::Error::ToSqlConversionFailure(Box::new(e))))?,
                    )
                };
                conn.execute(
                    "INSERT INTO entries (
                        store_name, key, status, kind, content_type, headers_json, body, stored_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                    ON CONFLICT(store_name, key) DO UPDATE SET
                        status = excluded.status,
                        kind = excluded.kind,
                        content_type = excluded.content_type,
                        headers_json = excluded.headers_json,
                        body = excluded.body,
                        stored_at = excluded.stored_at",
                    params![
                        store_name,
                        key,
                        response.status as i64,
                        response.kind.as_str(),
                        response.content_type,
                        headers_json,
                        response.body.as_ref(),
                        chrono::Utc::now().to_rfc3339(),
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Whether a key has a stored response.
    pub async fn contains(&self, key: &str) -> Result<bool, Error> {
        let store_name = self.name.clone();
        let key = key.to_string();
        self.db
            .conn
            .call(move |conn| -> Result<bool, Error> {
                let exists: bool = conn
                    .query_row(
                        "SELECT EXISTS(SELECT 1 FROM entries WHERE store_name = ?1 AND key = ?2)",
                        params![store_name, key],
                        |row| row.get(0),
                    )
                    .map_err(Error::from)?;
                Ok(exists)
            })
            .await
            .map_err(Error::from)
    }

    /// Number of entries in this store.
    pub async fn len(&self) -> Result<u64, Error> {
        let store_name = self.name.clone();
        self.db
            .conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM entries WHERE store_name = ?1",
                    params![store_name],
                    |row| row.get(0),
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
