//! Background content reconciliation
//!
//! [`SyncService`] turns sync requests into tasks on a single-flight
//! [`maayegue_common::SyncQueue`]; the actual reconciliation lives behind the
//! [`ports::ContentReconciler`] port.

pub mod ports;
mod service;

pub use service::SyncService;
