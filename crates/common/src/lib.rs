//! Modular common utilities shared across Ma'a yegue crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: errors and error classification
//! - `runtime`: async infrastructure (sync queue, clocks)
//! - `observability`: tracing (pulled in by `runtime`)
//! - `test-utils`: testing helpers for downstream crates

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
#[macro_use]
pub mod error;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod sync;

#[cfg(feature = "runtime")]
pub mod time;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(feature = "test-utils")]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use error::{CommonError, ErrorClassification, ErrorSeverity};
#[cfg(feature = "runtime")]
pub use sync::{QueueError, QueueMetricsSnapshot, QueueResult, SyncQueue, SyncTask};
#[cfg(feature = "runtime")]
pub use time::{Clock, MockClock, SystemClock};
