//! Core types and shared functionality for swcache.
//!
//! This crate provides:
//! - The SQLite-backed store substrate (one named store per cache generation)
//! - The buffered response model and cacheability rules
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod response;
pub mod store;

pub use config::{AppConfig, InstallMode, NavigationPolicy};
pub use error::Error;
pub use response::{CachedResponse, ResponseKind};
pub use store::{GenerationStore, StoreCatalog, StoreDb};
