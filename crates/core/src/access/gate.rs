use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use maayegue_domain::constants::{LOGIN_PATH, NOTICE_TWO_FACTOR_MS, REGISTER_PATH};
use maayegue_domain::{
    dashboard_path, AccessDecision, InterstitialKind, Notice, RouteRequirements, SessionState,
    SessionUser, UserRole,
};
use tracing::{debug, instrument, warn};

use super::roles::RoleResolver;
use crate::auth::ports::AuthProvider;
use crate::notify::Notifier;
use crate::session::SessionStore;

const GUEST_RESTRICTED_MESSAGE: &str = "Créez un compte pour accéder à cette fonctionnalité";

/// One link of the gate chain, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateStage {
    SessionLoading,
    Unauthenticated,
    RoleCheck,
    GuestRestriction,
    EmailVerification,
    TwoFactor,
}

impl GateStage {
    /// Fixed evaluation order. The first stage that stops decides.
    pub const CHAIN: [GateStage; 6] = [
        Self::SessionLoading,
        Self::Unauthenticated,
        Self::RoleCheck,
        Self::GuestRestriction,
        Self::EmailVerification,
        Self::TwoFactor,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::SessionLoading => "session_loading",
            Self::Unauthenticated => "unauthenticated",
            Self::RoleCheck => "role_check",
            Self::GuestRestriction => "guest_restriction",
            Self::EmailVerification => "email_verification",
            Self::TwoFactor => "two_factor",
        }
    }
}

/// One-time notices a navigation session can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnceNotice {
    GuestRestricted,
    TwoFactorRequired(UserRole),
}

enum StageOutcome {
    Pass,
    Stop(AccessDecision, Option<OnceNotice>),
}

/// A single navigation attempt
///
/// Holds the generation it was started with and the one-time notice flags.
/// Re-evaluating the same session (after a session change, for example)
/// never repeats a notice it already emitted.
#[derive(Debug)]
pub struct NavigationSession {
    generation: u64,
    guest_notice_shown: AtomicBool,
    two_factor_notice_shown: AtomicBool,
}

impl NavigationSession {
    fn new(generation: u64) -> Self {
        Self {
            generation,
            guest_notice_shown: AtomicBool::new(false),
            two_factor_notice_shown: AtomicBool::new(false),
        }
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Claim the right to show `notice`; true only the first time.
    fn claim(&self, notice: OnceNotice) -> bool {
        let flag = match notice {
            OnceNotice::GuestRestricted => &self.guest_notice_shown,
            OnceNotice::TwoFactorRequired(_) => &self.two_factor_notice_shown,
        };
        !flag.swap(true, Ordering::SeqCst)
    }
}

/// Ordered navigation guards turning session state into a routing decision
///
/// ## Chain
///
/// 1. Session still loading: [`AccessDecision::Loading`]
/// 2. No user: redirect to `/login`
/// 3. Route restricts roles and the effective role is not allowed: redirect
///    to that role's dashboard
/// 4. Route blocks visitors and the user is a visitor: redirect to
///    `/register` with a one-time notice
/// 5. Route needs a verified email, user is not a visitor and is unverified:
///    verify-email interstitial
/// 6. Route needs a second factor, user is a teacher or admin without one:
///    two-factor setup interstitial with a one-time notice
/// 7. Allow
///
/// ## Generations
///
/// Each [`start_navigation`](AccessGate::start_navigation) bumps a counter.
/// An evaluation whose navigation was superseded while it awaited the role
/// store or the auth provider returns `None`, and the renderer drops it.
pub struct AccessGate {
    store: SessionStore,
    roles: Arc<RoleResolver>,
    auth: Arc<dyn AuthProvider>,
    notifier: Arc<dyn Notifier>,
    generation: AtomicU64,
}

impl AccessGate {
    pub fn new(
        store: SessionStore,
        roles: Arc<RoleResolver>,
        auth: Arc<dyn AuthProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { store, roles, auth, notifier, generation: AtomicU64::new(0) }
    }

    /// Begin a navigation attempt, superseding every earlier one
    pub fn start_navigation(&self) -> NavigationSession {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, "Navigation started");
        NavigationSession::new(generation)
    }

    /// Whether `session` is still the latest navigation
    pub fn is_current(&self, session: &NavigationSession) -> bool {
        self.generation.load(Ordering::SeqCst) == session.generation
    }

    /// Run the chain against the current session state.
    ///
    /// Returns `None` when `session` has been superseded by the time the
    /// decision is ready.
    #[instrument(skip_all, fields(generation = session.generation))]
    pub async fn evaluate(
        &self,
        session: &NavigationSession,
        requirements: &RouteRequirements,
    ) -> Option<AccessDecision> {
        let state = self.store.snapshot();
        let role = match &state.user {
            Some(user) if needs_role(requirements) => Some(self.roles.effective_role(user).await),
            Some(user) => Some(user.role),
            None => None,
        };

        let mut outcome = (AccessDecision::Allow, None);
        for stage in GateStage::CHAIN {
            if let StageOutcome::Stop(decision, notice) =
                self.check(stage, &state, role, requirements).await
            {
                debug!(stage = stage.name(), ?decision, "Gate stage stopped navigation");
                outcome = (decision, notice);
                break;
            }
        }

        if !self.is_current(session) {
            debug!("Navigation superseded; discarding decision");
            return None;
        }

        let (decision, notice) = outcome;
        if let Some(notice) = notice {
            if session.claim(notice) {
                self.notifier.notify(render_notice(notice));
            }
        }
        Some(decision)
    }

    async fn check(
        &self,
        stage: GateStage,
        state: &SessionState,
        role: Option<UserRole>,
        requirements: &RouteRequirements,
    ) -> StageOutcome {
        if stage == GateStage::SessionLoading {
            return if state.loading {
                StageOutcome::Stop(AccessDecision::Loading, None)
            } else {
                StageOutcome::Pass
            };
        }

        let (Some(user), Some(role)) = (&state.user, role) else {
            return StageOutcome::Stop(AccessDecision::redirect(LOGIN_PATH), None);
        };

        match stage {
            GateStage::SessionLoading | GateStage::Unauthenticated => StageOutcome::Pass,
            GateStage::RoleCheck if !requirements.admits(role) => {
                StageOutcome::Stop(AccessDecision::redirect(dashboard_path(role)), None)
            }
            GateStage::GuestRestriction
                if requirements.block_visitors && role == UserRole::Visitor =>
            {
                StageOutcome::Stop(
                    AccessDecision::redirect(REGISTER_PATH),
                    Some(OnceNotice::GuestRestricted),
                )
            }
            GateStage::EmailVerification
                if requirements.require_verified_email
                    && role != UserRole::Visitor
                    && !user.email_verified =>
            {
                StageOutcome::Stop(
                    AccessDecision::RenderInterstitial(InterstitialKind::VerifyEmail),
                    None,
                )
            }
            GateStage::TwoFactor if requirements.require_two_factor && role.is_privileged() => {
                if self.has_second_factor(user).await {
                    StageOutcome::Pass
                } else {
                    StageOutcome::Stop(
                        AccessDecision::RenderInterstitial(InterstitialKind::TwoFactorSetup),
                        Some(OnceNotice::TwoFactorRequired(role)),
                    )
                }
            }
            _ => StageOutcome::Pass,
        }
    }

    /// A session already flagged as enrolled skips the provider. Otherwise the
    /// provider decides, and a failed check counts as enrolled so an outage
    /// does not lock staff out.
    async fn has_second_factor(&self, user: &SessionUser) -> bool {
        if user.two_factor_enabled {
            debug!(user_id = %user.id, "Second factor enrolled per session");
            return true;
        }
        match self.auth.has_second_factor(user).await {
            Ok(enrolled) => enrolled,
            Err(err) => {
                warn!(user_id = %user.id, error = %err, "Second factor check failed; allowing");
                true
            }
        }
    }
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}

const fn needs_role(requirements: &RouteRequirements) -> bool {
    requirements.allowed_roles.is_some()
        || requirements.block_visitors
        || requirements.require_verified_email
        || requirements.require_two_factor
}

fn render_notice(notice: OnceNotice) -> Notice {
    match notice {
        OnceNotice::GuestRestricted => Notice::error(GUEST_RESTRICTED_MESSAGE),
        OnceNotice::TwoFactorRequired(role) => {
            let audience = if role == UserRole::Admin { "administrateurs" } else { "enseignants" };
            Notice::error(format!(
                "L'authentification à deux facteurs est obligatoire pour les {audience}"
            ))
            .with_duration(Duration::from_millis(NOTICE_TWO_FACTOR_MS))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_order() {
        assert_eq!(GateStage::CHAIN[0], GateStage::SessionLoading);
        assert_eq!(GateStage::CHAIN[5], GateStage::TwoFactor);
        assert_eq!(GateStage::RoleCheck.name(), "role_check");
    }

    #[test]
    fn test_navigation_session_claims_each_notice_once() {
        let session = NavigationSession::new(1);
        assert!(session.claim(OnceNotice::GuestRestricted));
        assert!(!session.claim(OnceNotice::GuestRestricted));
        assert!(session.claim(OnceNotice::TwoFactorRequired(UserRole::Teacher)));
    }

    #[test]
    fn test_only_bare_routes_skip_role_lookup() {
        assert!(!needs_role(&RouteRequirements::authenticated()));
        assert!(needs_role(&RouteRequirements::authenticated().block_visitors()));
        assert!(needs_role(&RouteRequirements::default().allow_roles([UserRole::Admin])));
    }

    #[test]
    fn test_two_factor_notice_names_audience() {
        let notice = render_notice(OnceNotice::TwoFactorRequired(UserRole::Admin));
        assert!(notice.message.ends_with("administrateurs"));
        assert_eq!(notice.duration, Duration::from_millis(6000));
    }
}
