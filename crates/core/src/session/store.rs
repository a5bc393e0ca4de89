use std::sync::Arc;

use maayegue_domain::{Result, SessionState, SessionUser};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::auth::ports::AuthProvider;

/// Injected owner of the current session
///
/// Backed by a Tokio `watch` channel: readers get cheap snapshots or a
/// receiver that wakes on every change. Clones share the same session.
///
/// The store starts in the loading state. [`apply_auth_change`] is the only
/// mutation path and always clears `loading`, so once cleared it never comes
/// back.
///
/// [`apply_auth_change`]: SessionStore::apply_auth_change
#[derive(Debug, Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionState::loading());
        Self { tx: Arc::new(tx) }
    }

    /// Current state
    pub fn snapshot(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    /// Signed-in user, if any
    pub fn current_user(&self) -> Option<SessionUser> {
        self.tx.borrow().user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.tx.borrow().loading
    }

    /// Receiver that observes every subsequent change
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    /// Replace the signed-in user and mark the session resolved
    pub fn apply_auth_change(&self, user: Option<SessionUser>) {
        debug!(
            user_id = user.as_ref().map(|u| u.id.as_str()),
            role = user.as_ref().map(|u| u.role.as_str()),
            "Applying auth state change"
        );
        self.tx.send_replace(SessionState::resolved(user));
    }

    /// Ask the provider who is signed in and settle the session.
    ///
    /// A provider failure is logged and the session continues
    /// unauthenticated.
    #[instrument(skip_all)]
    pub async fn resolve_initial(&self, provider: &dyn AuthProvider) -> Option<SessionUser> {
        let user = match provider.current_user().await {
            Ok(user) => user,
            Err(err) => {
                warn!(error = %err, "Session resolution failed; continuing unauthenticated");
                None
            }
        };
        info!(authenticated = user.is_some(), "Initial session resolved");
        self.apply_auth_change(user.clone());
        user
    }

    /// Sign out with the provider and clear the local session.
    ///
    /// The local session is cleared even when the provider call fails; the
    /// provider error is still returned.
    #[instrument(skip_all)]
    pub async fn sign_out(&self, provider: &dyn AuthProvider) -> Result<()> {
        let result = provider.sign_out().await;
        if let Err(err) = &result {
            warn!(error = %err, "Provider sign-out failed; clearing local session anyway");
        }
        self.apply_auth_change(None);
        info!("Signed out");
        result
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use maayegue_domain::UserRole;

    use super::*;

    #[test]
    fn test_starts_loading_and_unauthenticated() {
        let store = SessionStore::new();
        let state = store.snapshot();
        assert!(state.loading);
        assert!(!state.is_authenticated());
    }

    #[test]
    fn test_apply_auth_change_clears_loading_for_good() {
        let store = SessionStore::new();
        let user = SessionUser::new("u-1", "fouda@example.cm", UserRole::Learner);

        store.apply_auth_change(Some(user.clone()));
        assert!(!store.is_loading());
        assert_eq!(store.current_user(), Some(user));

        store.apply_auth_change(None);
        let state = store.snapshot();
        assert!(!state.loading);
        assert!(!state.is_authenticated());
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();

        let clone = store.clone();
        clone.apply_auth_change(Some(SessionUser::new("u-2", "b@example.cm", UserRole::Admin)));

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().role(), Some(UserRole::Admin));
    }
}
