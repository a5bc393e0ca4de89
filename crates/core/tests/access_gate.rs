//! Integration tests for the access gate chain and post-login redirect
//!
//! Drives the gate through a real `SessionStore` with mocked auth provider,
//! role store and notifier.

mod support;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use maayegue_core::{post_login_redirect, AccessGate, RoleResolver, SessionStore};
use maayegue_domain::{
    AccessDecision, InterstitialKind, MaayegueError, NoticeLevel, RouteRequirements, SessionState,
    UserRole,
};
use support::mocks::{
    BlockingRoleRepository, MockAuthProvider, MockRoleRepository, RecordingNotifier,
};
use support::{unverified, verified};

struct Harness {
    store: SessionStore,
    auth: Arc<MockAuthProvider>,
    roles: Arc<MockRoleRepository>,
    notifier: Arc<RecordingNotifier>,
    gate: AccessGate,
}

fn harness(roles: Arc<MockRoleRepository>) -> Harness {
    let store = SessionStore::new();
    let auth = MockAuthProvider::new();
    let notifier = RecordingNotifier::new();
    let resolver = Arc::new(RoleResolver::new(roles.clone(), Duration::from_secs(300)));
    let gate = AccessGate::new(store.clone(), resolver, auth.clone(), notifier.clone());
    Harness { store, auth, roles, notifier, gate }
}

async fn decide(h: &Harness, requirements: &RouteRequirements) -> AccessDecision {
    let session = h.gate.start_navigation();
    h.gate.evaluate(&session, requirements).await.expect("navigation is current")
}

fn every_requirement_combination() -> Vec<RouteRequirements> {
    let mut all = Vec::new();
    for roles in [None, Some(vec![UserRole::Admin])] {
        for mask in 0..8_u8 {
            all.push(RouteRequirements {
                allowed_roles: roles.clone(),
                block_visitors: mask & 1 != 0,
                require_verified_email: mask & 2 != 0,
                require_two_factor: mask & 4 != 0,
            });
        }
    }
    all
}

#[tokio::test]
async fn test_loading_session_renders_placeholder() {
    let h = harness(MockRoleRepository::new());
    assert_eq!(decide(&h, &RouteRequirements::authenticated()).await, AccessDecision::Loading);
}

#[tokio::test]
async fn test_signed_out_user_goes_to_login_for_any_route() {
    let h = harness(MockRoleRepository::new());
    h.store.apply_auth_change(None);

    for requirements in every_requirement_combination() {
        assert_eq!(
            decide(&h, &requirements).await,
            AccessDecision::redirect("/login"),
            "requirements: {requirements:?}"
        );
    }
    assert_eq!(h.notifier.count(), 0);
}

#[tokio::test]
async fn test_teacher_on_admin_route_goes_to_teacher_dashboard() {
    let h = harness(MockRoleRepository::new().with_role("t-1", "teacher"));
    h.store.apply_auth_change(Some(verified("t-1", UserRole::Teacher)));

    let admin_only = RouteRequirements::authenticated().allow_roles([UserRole::Admin]);
    assert_eq!(decide(&h, &admin_only).await, AccessDecision::redirect("/dashboard/teacher"));
}

#[tokio::test]
async fn test_store_role_overrides_stale_session_role() {
    let h = harness(MockRoleRepository::new().with_role("u-1", "admin"));
    h.store.apply_auth_change(Some(verified("u-1", UserRole::Learner)));

    let admin_only = RouteRequirements::authenticated().allow_roles([UserRole::Admin]);
    assert_eq!(decide(&h, &admin_only).await, AccessDecision::Allow);
}

#[tokio::test]
async fn test_role_store_outage_falls_back_to_session_role() {
    let h = harness(MockRoleRepository::new().with_role("u-1", "admin"));
    h.roles.set_offline(true);
    h.store.apply_auth_change(Some(verified("u-1", UserRole::Learner)));

    let admin_only = RouteRequirements::authenticated().allow_roles([UserRole::Admin]);
    assert_eq!(decide(&h, &admin_only).await, AccessDecision::redirect("/dashboard/apprenant"));
}

#[tokio::test]
async fn test_bare_route_skips_role_store() {
    let h = harness(MockRoleRepository::new().with_role("u-1", "admin"));
    h.store.apply_auth_change(Some(unverified("u-1", UserRole::Learner)));

    assert_eq!(decide(&h, &RouteRequirements::authenticated()).await, AccessDecision::Allow);
    assert_eq!(h.roles.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_visitor_on_restricted_route_goes_to_register_with_one_notice() {
    let h = harness(MockRoleRepository::new().with_role("v-1", "guest"));
    h.store.apply_auth_change(Some(unverified("v-1", UserRole::Visitor)));
    let requirements = RouteRequirements::authenticated().block_visitors();

    let session = h.gate.start_navigation();
    for _ in 0..3 {
        let decision = h.gate.evaluate(&session, &requirements).await;
        assert_eq!(decision, Some(AccessDecision::redirect("/register")));
    }

    let notices = h.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].message, "Créez un compte pour accéder à cette fonctionnalité");

    // A new navigation session may show it again.
    decide(&h, &requirements).await;
    assert_eq!(h.notifier.count(), 2);
}

#[tokio::test]
async fn test_unverified_learner_sees_verify_interstitial() {
    let h = harness(MockRoleRepository::new().with_role("l-1", "apprenant"));
    h.store.apply_auth_change(Some(unverified("l-1", UserRole::Learner)));

    let requirements = RouteRequirements::authenticated().require_verified_email();
    assert_eq!(
        decide(&h, &requirements).await,
        AccessDecision::RenderInterstitial(InterstitialKind::VerifyEmail)
    );
}

#[tokio::test]
async fn test_unverified_visitor_is_exempt_from_verification() {
    let h = harness(MockRoleRepository::new().with_role("v-1", "visitor"));
    h.store.apply_auth_change(Some(unverified("v-1", UserRole::Visitor)));

    let requirements = RouteRequirements::authenticated().require_verified_email();
    assert_eq!(decide(&h, &requirements).await, AccessDecision::Allow);
}

#[tokio::test]
async fn test_stages_short_circuit_in_order() {
    let h = harness(MockRoleRepository::new().with_role("v-1", "visitor"));
    h.store.apply_auth_change(Some(unverified("v-1", UserRole::Visitor)));

    // Role check comes before the guest restriction.
    let requirements = RouteRequirements::authenticated()
        .allow_roles([UserRole::Learner])
        .block_visitors()
        .require_verified_email();
    assert_eq!(decide(&h, &requirements).await, AccessDecision::redirect("/dashboard/guest"));
    assert_eq!(h.notifier.count(), 0);
}

#[tokio::test]
async fn test_admin_without_second_factor_sees_setup_interstitial() {
    let h = harness(MockRoleRepository::new().with_role("a-1", "admin"));
    h.store.apply_auth_change(Some(verified("a-1", UserRole::Admin)));
    h.auth.set_second_factor(Ok(false));
    let requirements = RouteRequirements::authenticated().require_two_factor();

    let session = h.gate.start_navigation();
    for _ in 0..2 {
        assert_eq!(
            h.gate.evaluate(&session, &requirements).await,
            Some(AccessDecision::RenderInterstitial(InterstitialKind::TwoFactorSetup))
        );
    }

    let messages = h.notifier.messages();
    assert_eq!(
        messages,
        vec!["L'authentification à deux facteurs est obligatoire pour les administrateurs"]
    );
}

#[tokio::test]
async fn test_second_factor_rules_skip_learners_and_allow_on_errors() {
    let h = harness(
        MockRoleRepository::new().with_role("l-1", "learner").with_role("t-1", "teacher"),
    );
    let requirements = RouteRequirements::authenticated().require_two_factor();

    h.store.apply_auth_change(Some(verified("l-1", UserRole::Learner)));
    h.auth.set_second_factor(Ok(false));
    assert_eq!(decide(&h, &requirements).await, AccessDecision::Allow);
    assert_eq!(h.auth.second_factor_calls.load(Ordering::SeqCst), 0);

    h.store.apply_auth_change(Some(verified("t-1", UserRole::Teacher)));
    h.auth.set_second_factor(Err(MaayegueError::Network("mfa service down".into())));
    assert_eq!(decide(&h, &requirements).await, AccessDecision::Allow);

    h.auth.set_second_factor(Ok(true));
    assert_eq!(decide(&h, &requirements).await, AccessDecision::Allow);
}

#[tokio::test]
async fn test_superseded_navigation_is_discarded() {
    let h = harness(MockRoleRepository::new().with_role("v-1", "visitor"));
    h.store.apply_auth_change(Some(unverified("v-1", UserRole::Visitor)));
    let requirements = RouteRequirements::authenticated().block_visitors();

    let stale = h.gate.start_navigation();
    let fresh = h.gate.start_navigation();

    assert!(!h.gate.is_current(&stale));
    assert_eq!(h.gate.evaluate(&stale, &requirements).await, None);
    assert_eq!(h.notifier.count(), 0);

    assert_eq!(
        h.gate.evaluate(&fresh, &requirements).await,
        Some(AccessDecision::redirect("/register"))
    );
    assert!(fresh.generation() > stale.generation());
}

#[tokio::test]
async fn test_navigation_superseded_during_role_lookup_is_discarded() {
    let store = SessionStore::new();
    let notifier = RecordingNotifier::new();
    let roles = BlockingRoleRepository::new("visitor");
    let resolver = Arc::new(RoleResolver::new(roles.clone(), Duration::from_secs(300)));
    let gate = AccessGate::new(store.clone(), resolver, MockAuthProvider::new(), notifier.clone());
    store.apply_auth_change(Some(unverified("v-1", UserRole::Visitor)));
    let requirements = RouteRequirements::authenticated().block_visitors();

    let first = gate.start_navigation();
    let (decision, ()) = tokio::join!(gate.evaluate(&first, &requirements), async {
        roles.wait_entered().await;
        gate.start_navigation();
        roles.release();
    });

    assert_eq!(decision, None);
    assert_eq!(roles.calls.load(Ordering::SeqCst), 1);
    assert_eq!(notifier.count(), 0);
}

#[tokio::test]
async fn test_session_two_factor_flag_skips_provider_check() {
    let h = harness(MockRoleRepository::new().with_role("t-1", "teacher"));
    h.store.apply_auth_change(Some(verified("t-1", UserRole::Teacher).with_two_factor(true)));
    h.auth.set_second_factor(Ok(false));
    let requirements = RouteRequirements::authenticated().require_two_factor();

    assert_eq!(decide(&h, &requirements).await, AccessDecision::Allow);
    assert_eq!(h.auth.second_factor_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.notifier.count(), 0);
}

#[tokio::test]
async fn test_identical_state_yields_identical_decision() {
    let h = harness(MockRoleRepository::new().with_role("t-1", "teacher").with_role("v-1", "guest"));

    for user in [unverified("t-1", UserRole::Teacher), verified("v-1", UserRole::Visitor)] {
        h.store.apply_auth_change(Some(user));
        for requirements in every_requirement_combination() {
            let first = decide(&h, &requirements).await;
            let second = decide(&h, &requirements).await;
            assert_eq!(first, second, "requirements: {requirements:?}");
        }
    }
}

#[tokio::test]
async fn test_post_login_redirect_routes_by_store_role_and_greets() {
    let roles = MockRoleRepository::new().with_role("u-1", "teacher");
    let resolver = RoleResolver::new(roles, Duration::from_secs(300));
    let notifier = RecordingNotifier::new();

    let loading = post_login_redirect(&SessionState::loading(), &resolver, notifier.as_ref()).await;
    assert_eq!(loading, AccessDecision::Loading);

    let signed_out =
        post_login_redirect(&SessionState::resolved(None), &resolver, notifier.as_ref()).await;
    assert_eq!(signed_out, AccessDecision::redirect("/login"));
    assert_eq!(notifier.count(), 0);

    let state = SessionState::resolved(Some(verified("u-1", UserRole::Learner)));
    let decision = post_login_redirect(&state, &resolver, notifier.as_ref()).await;
    assert_eq!(decision, AccessDecision::redirect("/dashboard/teacher"));
    assert_eq!(notifier.messages(), vec!["Bienvenue dans l'espace enseignant"]);
}

#[tokio::test]
async fn test_post_login_redirect_falls_back_to_session_role() {
    let roles = MockRoleRepository::new();
    roles.set_offline(true);
    let resolver = RoleResolver::new(roles, Duration::from_secs(300));
    let notifier = RecordingNotifier::new();

    let state = SessionState::resolved(Some(verified("u-2", UserRole::Visitor)));
    let decision = post_login_redirect(&state, &resolver, notifier.as_ref()).await;

    assert_eq!(decision, AccessDecision::redirect("/dashboard/guest"));
    assert_eq!(notifier.notices()[0].level, NoticeLevel::Success);
}
