//! # Ma'a yegue Infrastructure
//!
//! Impure adapters around the core services.
//!
//! This crate contains:
//! - Configuration loading (environment, `.env`, TOML/JSON files)
//! - Tracing subscriber setup
//! - Background sync triggers (periodic scheduler, connectivity watcher)
//!
//! ## Architecture
//! - Depends on `maayegue-core`, `maayegue-domain` and `maayegue-common`
//! - Contains all code that touches the environment, the filesystem or
//!   long-running tasks

pub mod config;
pub mod observability;
pub mod scheduling;

// Re-export commonly used items
pub use observability::init_tracing;
pub use scheduling::{ConnectivityWatcher, SchedulerError, SchedulerResult, SyncScheduler};
