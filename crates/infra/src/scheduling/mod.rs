//! Background sync triggers
//!
//! - [`SyncScheduler`] runs an automatic sync on a fixed interval while the
//!   device is online
//! - [`ConnectivityWatcher`] runs one when connectivity comes back
//!
//! Both only enqueue work on the shared [`maayegue_core::SyncService`]; its
//! queue keeps the actual sync single-flight.

pub mod connectivity;
pub mod error;
pub mod sync_scheduler;

pub use connectivity::ConnectivityWatcher;
pub use error::{SchedulerError, SchedulerResult};
pub use sync_scheduler::{SyncScheduler, SyncSchedulerConfig};
