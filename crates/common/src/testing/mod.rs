//! Test support for downstream crates
//!
//! - **[`async_utils`]**: bounded waits for async conditions in tests
//! - Clock abstractions re-exported from [`crate::time`]

pub mod async_utils;

pub use async_utils::{poll_until, timeout_ok};
pub use crate::time::{Clock, MockClock, SystemClock};
