//! SQLite-backed persistence substrate for cache generations.
//!
//! One database holds every generation: a catalog of named stores plus a
//! keyed entry table. The substrate provides:
//!
//! - Create-or-open of named stores (one per cache generation)
//! - Key→response entries with overwrite-on-write semantics
//! - Enumeration and deletion of whole stores for the activation sweep
//! - WAL mode for concurrent resolution tasks
//! - Schema bootstrap on open, stamped with `PRAGMA user_version`

pub mod catalog;
pub mod connection;
pub mod entries;
pub mod schema;

pub use crate::Error;

pub use catalog::StoreCatalog;
pub use connection::StoreDb;
pub use entries::GenerationStore;
