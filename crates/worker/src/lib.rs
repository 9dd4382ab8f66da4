//! Offline-asset cache controller.
//!
//! Four collaborating components, each a pure reaction to one lifecycle
//! trigger:
//!
//! - [`GenerationManager`] owns the current generation token and store.
//! - [`Installer`] populates a new generation's store from the manifest.
//! - [`Resolver`] decides cache vs. network vs. fallback for every
//!   intercepted request.
//! - [`Reaper`] deletes superseded generation stores on activation.
//!
//! [`Controller`] wires them to the install/activate/fetch event cycle.

pub mod generation;
pub mod install;
pub mod lifecycle;
pub mod manifest;
pub mod reap;
pub mod resolve;

#[cfg(test)]
pub(crate) mod testing;

pub use generation::GenerationManager;
pub use install::{InstallReport, Installer};
pub use lifecycle::{ClientControl, Controller, EventOutcome, LifecycleEvent, NoopClients};
pub use manifest::Manifest;
pub use reap::{Reaper, SweepReport};
pub use resolve::{InterceptedRequest, RequestKind, Resolved, Resolver, Source};
