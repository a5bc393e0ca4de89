//! # Ma'a yegue Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for the auth provider, the role store, content
//!   reconciliation and user notices
//! - The session store and its auth-state listener
//! - The access gate chain, post-login redirect and email verification flow
//! - The background sync service
//!
//! ## Architecture Principles
//! - Only depends on `maayegue-common` and `maayegue-domain`
//! - No HTTP, document store or UI code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod access;
pub mod auth;
pub mod notify;
pub mod session;
pub mod sync;

// Re-export specific items to avoid ambiguity
pub use access::ports::RoleRepository;
pub use access::{
    post_login_redirect, welcome_message, AccessGate, GateStage, NavigationSession, ResendOutcome,
    RoleResolver, VerificationFlow,
};
pub use auth::ports::AuthProvider;
pub use notify::{Notifier, TracingNotifier};
pub use session::{SessionListener, SessionStore};
pub use sync::ports::ContentReconciler;
pub use sync::SyncService;
