//! Navigation access control
//!
//! - [`AccessGate`]: ordered guard chain evaluated per navigation
//! - [`RoleResolver`]: authoritative role lookups with a TTL cache
//! - [`post_login_redirect`]: role dashboard routing after sign-in
//! - [`VerificationFlow`]: resend cooldown and verification polling

mod gate;
pub mod ports;
mod redirect;
mod roles;
mod verification;

pub use gate::{AccessGate, GateStage, NavigationSession};
pub use redirect::{post_login_redirect, welcome_message};
pub use roles::RoleResolver;
pub use verification::{ResendOutcome, VerificationFlow};
