//! Session state as published by the session store

use serde::{Deserialize, Serialize};

use super::user::{SessionUser, UserRole};

/// Snapshot of who is signed in
///
/// `loading` is true only until the initial session resolution finishes; it
/// never returns to true afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub user: Option<SessionUser>,
    pub loading: bool,
}

impl SessionState {
    /// Initial state before the auth provider has answered
    pub const fn loading() -> Self {
        Self { user: None, loading: true }
    }

    /// Settled state for the given user (or lack of one)
    pub const fn resolved(user: Option<SessionUser>) -> Self {
        Self { user, loading: false }
    }

    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Role cached on the session user, if any
    pub fn role(&self) -> Option<UserRole> {
        self.user.as_ref().map(|user| user.role)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::loading()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticated_follows_user_presence() {
        assert!(!SessionState::loading().is_authenticated());
        assert!(!SessionState::resolved(None).is_authenticated());

        let user = SessionUser::new("u-1", "a@example.cm", UserRole::Admin);
        let state = SessionState::resolved(Some(user));
        assert!(state.is_authenticated());
        assert!(!state.loading);
        assert_eq!(state.role(), Some(UserRole::Admin));
    }

    #[test]
    fn test_default_is_loading() {
        assert!(SessionState::default().loading);
    }
}
