//! Shared test helpers for `maayegue-core` integration tests.
//!
//! Lightweight in-memory mocks for every core port so tests can focus on
//! behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod mocks;

use maayegue_domain::{SessionUser, UserRole};

/// Verified user with the given role
pub fn verified(id: &str, role: UserRole) -> SessionUser {
    SessionUser::new(id, format!("{id}@example.cm"), role).with_email_verified(true)
}

/// Unverified user with the given role
pub fn unverified(id: &str, role: UserRole) -> SessionUser {
    SessionUser::new(id, format!("{id}@example.cm"), role)
}
