//! Network transport for swcache.
//!
//! This crate provides the async fetch capability the cache controller
//! consumes: the [`Transport`] trait, its reqwest-backed implementation,
//! and URL canonicalization (canonical URL strings double as store keys).

pub mod fetch;

pub use fetch::{FetchConfig, HttpTransport, Transport, UrlError, canonicalize};
