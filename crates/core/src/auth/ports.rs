//! Port interfaces for the authentication provider
//!
//! The provider owns credentials and the signed-in identity. Core code only
//! reads the resulting [`SessionUser`] and asks for a few side effects.

use async_trait::async_trait;
use maayegue_domain::{Result, SessionUser};

/// Trait for the hosted authentication service
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// User signed in on this device, if any
    async fn current_user(&self) -> Result<Option<SessionUser>>;

    /// Refresh the signed-in user from the provider (picks up a freshly
    /// verified email address)
    async fn reload_session(&self) -> Result<Option<SessionUser>>;

    /// Send another verification email to `user`
    async fn resend_verification_email(&self, user: &SessionUser) -> Result<()>;

    /// Whether `user` has a second authentication factor enrolled
    async fn has_second_factor(&self, user: &SessionUser) -> Result<bool>;

    /// End the provider session
    async fn sign_out(&self) -> Result<()>;
}
