//! In-memory port mocks

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use maayegue_core::{AuthProvider, ContentReconciler, Notifier, RoleRepository};
use maayegue_domain::{MaayegueError, Notice, Result, SessionUser, SyncKind};
use parking_lot::Mutex;
use tokio::sync::Notify;

/// Scriptable auth provider that counts its side effects
#[derive(Default)]
pub struct MockAuthProvider {
    current: Mutex<Option<SessionUser>>,
    reload: Mutex<Option<Result<Option<SessionUser>>>>,
    fail_current: Mutex<bool>,
    fail_resend: Mutex<bool>,
    second_factor: Mutex<Option<Result<bool>>>,
    pub resend_calls: AtomicUsize,
    pub reload_calls: AtomicUsize,
    pub second_factor_calls: AtomicUsize,
    pub sign_out_calls: AtomicUsize,
}

impl MockAuthProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn signed_in(user: SessionUser) -> Arc<Self> {
        let provider = Self::default();
        *provider.current.lock() = Some(user);
        Arc::new(provider)
    }

    pub fn fail_current_user(&self) {
        *self.fail_current.lock() = true;
    }

    pub fn fail_resend(&self, fail: bool) {
        *self.fail_resend.lock() = fail;
    }

    /// Result returned by every following `reload_session`
    pub fn set_reload(&self, result: Result<Option<SessionUser>>) {
        *self.reload.lock() = Some(result);
    }

    /// Result returned by every following `has_second_factor`
    pub fn set_second_factor(&self, result: Result<bool>) {
        *self.second_factor.lock() = Some(result);
    }

    pub fn resends(&self) -> usize {
        self.resend_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn current_user(&self) -> Result<Option<SessionUser>> {
        if *self.fail_current.lock() {
            return Err(MaayegueError::Network("auth provider unreachable".into()));
        }
        Ok(self.current.lock().clone())
    }

    async fn reload_session(&self) -> Result<Option<SessionUser>> {
        self.reload_calls.fetch_add(1, Ordering::SeqCst);
        match self.reload.lock().clone() {
            Some(result) => result,
            None => Ok(self.current.lock().clone()),
        }
    }

    async fn resend_verification_email(&self, _user: &SessionUser) -> Result<()> {
        self.resend_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_resend.lock() {
            return Err(MaayegueError::Auth("too-many-requests".into()));
        }
        Ok(())
    }

    async fn has_second_factor(&self, user: &SessionUser) -> Result<bool> {
        self.second_factor_calls.fetch_add(1, Ordering::SeqCst);
        match self.second_factor.lock().clone() {
            Some(result) => result,
            None => Ok(user.two_factor_enabled),
        }
    }

    async fn sign_out(&self) -> Result<()> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        *self.current.lock() = None;
        Ok(())
    }
}

/// Role store keyed by user id; unknown ids fail like a missing document
#[derive(Default)]
pub struct MockRoleRepository {
    roles: Mutex<HashMap<String, String>>,
    offline: Mutex<bool>,
    pub calls: AtomicUsize,
}

impl MockRoleRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_role(self: Arc<Self>, user_id: &str, role: &str) -> Arc<Self> {
        self.roles.lock().insert(user_id.to_string(), role.to_string());
        self
    }

    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock() = offline;
    }
}

#[async_trait]
impl RoleRepository for MockRoleRepository {
    async fn get_user_role(&self, user_id: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if *self.offline.lock() {
            return Err(MaayegueError::Network("document store offline".into()));
        }
        self.roles
            .lock()
            .get(user_id)
            .cloned()
            .ok_or_else(|| MaayegueError::NotFound(format!("user {user_id}")))
    }
}

/// Role store whose lookups park until the test releases them
pub struct BlockingRoleRepository {
    role: String,
    entered: Notify,
    release: Notify,
    pub calls: AtomicUsize,
}

impl BlockingRoleRepository {
    pub fn new(role: &str) -> Arc<Self> {
        Arc::new(Self {
            role: role.to_string(),
            entered: Notify::new(),
            release: Notify::new(),
            calls: AtomicUsize::new(0),
        })
    }

    /// Resolves once a lookup is waiting
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    /// Let the waiting lookup return
    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl RoleRepository for BlockingRoleRepository {
    async fn get_user_role(&self, _user_id: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(self.role.clone())
    }
}

/// Notifier that keeps every notice
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notices.lock().iter().map(|n| n.message.clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.notices.lock().len()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

/// Reconciler that records the order of calls and can fail on demand
#[derive(Default)]
pub struct RecordingReconciler {
    log: Mutex<Vec<String>>,
    failing: Mutex<Vec<SyncKind>>,
}

impl RecordingReconciler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail(&self, kind: SyncKind) {
        self.failing.lock().push(kind);
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().clone()
    }

    fn record(&self, kind: SyncKind, entry: String) -> Result<usize> {
        self.log.lock().push(entry);
        if self.failing.lock().contains(&kind) {
            return Err(MaayegueError::Network(format!("{kind} reconciliation failed")));
        }
        Ok(1)
    }
}

#[async_trait]
impl ContentReconciler for RecordingReconciler {
    async fn sync_dictionary(&self) -> Result<usize> {
        self.record(SyncKind::Dictionary, "dictionary".into())
    }

    async fn sync_lessons(&self) -> Result<usize> {
        self.record(SyncKind::Lessons, "lessons".into())
    }

    async fn sync_progress(&self, user_id: &str) -> Result<usize> {
        self.record(SyncKind::Progress, format!("progress:{user_id}"))
    }
}
