//! Port interfaces for role lookups

use async_trait::async_trait;
use maayegue_domain::Result;

/// Backing store holding the authoritative role of each user
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Raw role string stored for `user_id`. Parsing (including legacy
    /// aliases) happens in the caller.
    async fn get_user_role(&self, user_id: &str) -> Result<String>;
}
