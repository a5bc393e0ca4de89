//! # Ma'a yegue Domain
//!
//! Business domain types for the Ma'a yegue client core.
//!
//! This crate contains:
//! - Session and user types (`SessionUser`, `SessionState`, `UserRole`)
//! - Navigation types (`RouteRequirements`, `AccessDecision`)
//! - User-facing notices
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Route paths and other constants
//!
//! ## Architecture
//! - No dependencies on other Ma'a yegue crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
