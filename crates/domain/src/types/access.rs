//! Navigation requirements and gate outcomes

use serde::{Deserialize, Serialize};

use super::user::UserRole;
use crate::impl_domain_status_conversions;

/// Requirements a route declares to the access gate
///
/// The default requires only an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteRequirements {
    /// Roles allowed on the route; `None` admits every role
    pub allowed_roles: Option<Vec<UserRole>>,
    /// Send visitors to registration instead of rendering the route
    pub block_visitors: bool,
    /// Non-visitors must have a verified email address
    pub require_verified_email: bool,
    /// Teachers and admins must have a second factor enrolled
    pub require_two_factor: bool,
}

impl RouteRequirements {
    pub fn authenticated() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn allow_roles(mut self, roles: impl IntoIterator<Item = UserRole>) -> Self {
        self.allowed_roles = Some(roles.into_iter().collect());
        self
    }

    #[must_use]
    pub fn block_visitors(mut self) -> Self {
        self.block_visitors = true;
        self
    }

    #[must_use]
    pub fn require_verified_email(mut self) -> Self {
        self.require_verified_email = true;
        self
    }

    #[must_use]
    pub fn require_two_factor(mut self) -> Self {
        self.require_two_factor = true;
        self
    }

    /// Whether the role passes the `allowed_roles` filter
    pub fn admits(&self, role: UserRole) -> bool {
        self.allowed_roles.as_ref().map_or(true, |roles| roles.contains(&role))
    }
}

/// Screen rendered in place of the requested route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterstitialKind {
    VerifyEmail,
    TwoFactorSetup,
}

impl_domain_status_conversions!(InterstitialKind {
    VerifyEmail => "verify_email",
    TwoFactorSetup => "two_factor_setup",
});

/// Outcome of evaluating the gate chain for one navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum AccessDecision {
    /// Session still resolving; render a placeholder
    Loading,
    RedirectTo(String),
    RenderInterstitial(InterstitialKind),
    Allow,
}

impl AccessDecision {
    pub fn redirect(path: impl Into<String>) -> Self {
        Self::RedirectTo(path.into())
    }

    pub const fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Redirect target, if this decision is a redirect
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::RedirectTo(path) => Some(path),
            _ => None,
        }
    }
}
