use std::sync::Arc;
use std::time::{Duration, Instant};

use maayegue_common::{Clock, SystemClock};
use maayegue_domain::{AccessConfig, Notice};
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::auth::ports::AuthProvider;
use crate::notify::Notifier;
use crate::session::SessionStore;

const SENT_MESSAGE: &str = "Email de vérification envoyé ! Vérifiez votre boîte de réception.";
const SEND_FAILED_MESSAGE: &str = "Erreur lors de l'envoi de l'email de vérification";
const REFRESH_FAILED_MESSAGE: &str = "Impossible de vérifier le statut de votre email";

/// Result of a resend request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResendOutcome {
    /// The provider accepted the request
    Sent,
    /// Too soon after the previous send; nothing was sent
    CoolingDown { remaining_secs: u64 },
    /// A send is already in progress
    InFlight,
    /// The provider call failed
    Failed(String),
    /// No signed-in user
    NoUser,
}

#[derive(Debug, Default)]
struct ResendState {
    last_sent_at: Option<Instant>,
    in_flight: bool,
}

/// Clears the in-flight flag even if the send future is dropped.
struct InFlightGuard<'a>(&'a Mutex<ResendState>);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.lock().in_flight = false;
    }
}

/// Email verification screen logic: rate-limited resend and status refresh
pub struct VerificationFlow {
    auth: Arc<dyn AuthProvider>,
    store: SessionStore,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    cooldown: Duration,
    poll_interval: Duration,
    state: Mutex<ResendState>,
}

impl VerificationFlow {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        store: SessionStore,
        notifier: Arc<dyn Notifier>,
        config: &AccessConfig,
    ) -> Self {
        Self {
            auth,
            store,
            notifier,
            clock: Arc::new(SystemClock),
            cooldown: config.resend_cooldown(),
            poll_interval: config.verification_poll_interval(),
            state: Mutex::new(ResendState::default()),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Time left before another resend is allowed, if any
    pub fn remaining_cooldown(&self) -> Option<Duration> {
        let last = self.state.lock().last_sent_at?;
        let remaining = self.cooldown.saturating_sub(self.clock.since(last));
        (!remaining.is_zero()).then_some(remaining)
    }

    /// Ask the provider to send the verification email again.
    ///
    /// The cooldown starts when the request goes out, whether or not it
    /// succeeds.
    #[instrument(skip(self))]
    pub async fn resend(&self) -> ResendOutcome {
        let Some(user) = self.store.current_user() else {
            return ResendOutcome::NoUser;
        };

        {
            let mut state = self.state.lock();
            if state.in_flight {
                return ResendOutcome::InFlight;
            }
            if let Some(last) = state.last_sent_at {
                let elapsed = self.clock.since(last);
                if elapsed < self.cooldown {
                    let remaining_secs = ceil_secs(self.cooldown - elapsed);
                    drop(state);
                    debug!(remaining_secs, "Resend refused during cooldown");
                    self.notifier.notify(Notice::error(format!(
                        "Veuillez attendre {remaining_secs} secondes avant de renvoyer l'email"
                    )));
                    return ResendOutcome::CoolingDown { remaining_secs };
                }
            }
            state.last_sent_at = Some(self.clock.now());
            state.in_flight = true;
        }

        let result = {
            let _guard = InFlightGuard(&self.state);
            self.auth.resend_verification_email(&user).await
        };

        match result {
            Ok(()) => {
                info!(user_id = %user.id, "Verification email sent");
                self.notifier.notify(Notice::success(SENT_MESSAGE));
                ResendOutcome::Sent
            }
            Err(err) => {
                warn!(user_id = %user.id, error = %err, "Verification email send failed");
                self.notifier.notify(Notice::error(SEND_FAILED_MESSAGE));
                ResendOutcome::Failed(err.to_string())
            }
        }
    }

    /// Reload the session from the provider and report whether the email is
    /// now verified.
    ///
    /// A failed reload is reported to the user.
    #[instrument(skip(self))]
    pub async fn refresh_status(&self) -> bool {
        self.reload(true).await
    }

    /// Refresh every `interval` until the email is verified (true) or the
    /// user is signed out (false).
    ///
    /// Background reloads never notify; a failure is logged and retried on
    /// the next tick.
    pub async fn poll_until_verified(&self, interval: Duration) -> bool {
        loop {
            tokio::time::sleep(interval).await;
            if self.reload(false).await {
                info!("Email verified");
                return true;
            }
            if !self.store.snapshot().is_authenticated() {
                debug!("Signed out while waiting for verification");
                return false;
            }
        }
    }

    async fn reload(&self, notify_failure: bool) -> bool {
        match self.auth.reload_session().await {
            Ok(user) => {
                let verified = user.as_ref().is_some_and(|u| u.email_verified);
                self.store.apply_auth_change(user);
                debug!(verified, "Session reloaded");
                verified
            }
            Err(err) if notify_failure => {
                warn!(error = %err, "Session reload failed");
                self.notifier.notify(Notice::error(REFRESH_FAILED_MESSAGE));
                false
            }
            Err(err) => {
                debug!(error = %err, "Background session reload failed");
                false
            }
        }
    }

    /// [`poll_until_verified`](Self::poll_until_verified) with the configured
    /// interval
    pub async fn poll(&self) -> bool {
        self.poll_until_verified(self.poll_interval).await
    }
}

impl std::fmt::Debug for VerificationFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationFlow")
            .field("cooldown", &self.cooldown)
            .field("poll_interval", &self.poll_interval)
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}
