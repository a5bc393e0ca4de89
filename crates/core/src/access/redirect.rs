use maayegue_domain::constants::LOGIN_PATH;
use maayegue_domain::{dashboard_path, AccessDecision, Notice, SessionState, UserRole};
use tracing::{debug, instrument};

use super::roles::RoleResolver;
use crate::notify::Notifier;

/// Greeting shown when a user lands on their dashboard after signing in
pub const fn welcome_message(role: UserRole) -> &'static str {
    match role {
        UserRole::Admin => "Bienvenue dans l'interface d'administration",
        UserRole::Teacher => "Bienvenue dans l'espace enseignant",
        UserRole::Learner => "Bienvenue dans votre espace d'apprentissage",
        UserRole::Visitor => "Bienvenue sur Ma'a yegue",
    }
}

/// Where to send a user right after sign-in.
///
/// Resolves the authoritative role (falling back to the session copy),
/// greets the user and redirects to the role's dashboard.
#[instrument(skip_all)]
pub async fn post_login_redirect(
    state: &SessionState,
    roles: &RoleResolver,
    notifier: &dyn Notifier,
) -> AccessDecision {
    if state.loading {
        return AccessDecision::Loading;
    }
    let Some(user) = &state.user else {
        return AccessDecision::redirect(LOGIN_PATH);
    };

    let role = roles.effective_role(user).await;
    debug!(user_id = %user.id, %role, "Redirecting to role dashboard");
    notifier.notify(Notice::success(welcome_message(role)));
    AccessDecision::redirect(dashboard_path(role))
}
