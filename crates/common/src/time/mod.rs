//! Time abstractions
//!
//! - **Clock abstractions**: [`SystemClock`] for production and [`MockClock`]
//!   for tests, behind the [`Clock`] trait that every cooldown and cache TTL
//!   in the workspace reads
//!
//! ```rust
//! use std::time::Duration;
//!
//! use maayegue_common::time::{Clock, MockClock};
//!
//! let clock = MockClock::new();
//! let sent_at = clock.now();
//! clock.advance(Duration::from_secs(45));
//! assert_eq!(clock.since(sent_at), Duration::from_secs(45));
//! ```

pub mod clock;

pub use clock::{Clock, MockClock, SystemClock};
