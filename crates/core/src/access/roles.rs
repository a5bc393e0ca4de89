use std::sync::Arc;
use std::time::{Duration, Instant};

use maayegue_common::{Clock, SystemClock};
use maayegue_domain::constants::ROLE_CACHE_MAX_CAPACITY;
use maayegue_domain::{AccessConfig, SessionUser, UserRole};
use moka::sync::Cache;
use tracing::{debug, warn};

use super::ports::RoleRepository;

#[derive(Debug, Clone, Copy)]
struct CachedRole {
    role: UserRole,
    fetched_at: Instant,
}

/// Resolves the role a user actually has
///
/// The session copy of the role can be stale (a promotion happens in the
/// backing store, not in the session). When a [`RoleRepository`] is
/// configured, lookups go to the store and are cached per user for `ttl`,
/// with at most `max_capacity` users cached. Only successful lookups are
/// cached; a failed lookup falls back to the role cached on the session user.
///
/// Expiry is checked against the injected [`Clock`] as well as by the cache
/// itself, since the cache evicts on real time only.
pub struct RoleResolver {
    repository: Option<Arc<dyn RoleRepository>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    cache: Cache<String, CachedRole>,
}

impl RoleResolver {
    /// Resolver backed by `repository` with the given cache lifetime
    pub fn new(repository: Arc<dyn RoleRepository>, ttl: Duration) -> Self {
        Self::with_capacity(repository, ttl, ROLE_CACHE_MAX_CAPACITY)
    }

    /// Resolver backed by `repository` caching at most `max_capacity` users
    pub fn with_capacity(
        repository: Arc<dyn RoleRepository>,
        ttl: Duration,
        max_capacity: u64,
    ) -> Self {
        Self {
            repository: Some(repository),
            clock: Arc::new(SystemClock),
            ttl,
            cache: build_cache(ttl, max_capacity),
        }
    }

    /// Resolver that trusts the session copy of the role
    pub fn session_only() -> Self {
        Self {
            repository: None,
            clock: Arc::new(SystemClock),
            ttl: Duration::ZERO,
            cache: build_cache(Duration::ZERO, 0),
        }
    }

    /// Build from configuration; store lookups are skipped when
    /// `verify_role_with_store` is off.
    pub fn from_config(repository: Arc<dyn RoleRepository>, config: &AccessConfig) -> Self {
        if config.verify_role_with_store {
            debug!(
                ttl_seconds = config.role_cache_ttl_seconds,
                max_capacity = config.role_cache_max_capacity,
                "Role cache configuration loaded"
            );
            Self::with_capacity(
                repository,
                config.role_cache_ttl(),
                config.role_cache_max_capacity,
            )
        } else {
            Self::session_only()
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Effective role of `user`
    pub async fn effective_role(&self, user: &SessionUser) -> UserRole {
        let Some(repository) = &self.repository else {
            return user.role;
        };

        if let Some(role) = self.cached(&user.id) {
            debug!(user_id = %user.id, "Role cache hit");
            return role;
        }

        match repository.get_user_role(&user.id).await {
            Ok(raw) => {
                let role = UserRole::try_parse(&raw).unwrap_or_else(|| {
                    debug!(user_id = %user.id, raw_role = %raw, "Unknown stored role; using learner");
                    UserRole::Learner
                });
                if role != user.role {
                    debug!(
                        user_id = %user.id,
                        session_role = %user.role,
                        stored_role = %role,
                        "Stored role differs from session"
                    );
                }
                self.cache.insert(user.id.clone(), CachedRole { role, fetched_at: self.clock.now() });
                role
            }
            Err(err) => {
                warn!(user_id = %user.id, error = %err, "Role lookup failed; using session role");
                user.role
            }
        }
    }

    /// Drop the cached role of one user (after a role change, for example)
    pub fn invalidate(&self, user_id: &str) {
        self.cache.invalidate(user_id);
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    /// Number of cached users, after pending evictions have run
    pub fn cached_entries(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    fn cached(&self, user_id: &str) -> Option<UserRole> {
        let entry = self.cache.get(user_id)?;
        if self.clock.since(entry.fetched_at) < self.ttl {
            Some(entry.role)
        } else {
            self.cache.invalidate(user_id);
            None
        }
    }
}

fn build_cache(ttl: Duration, max_capacity: u64) -> Cache<String, CachedRole> {
    let builder = Cache::builder().max_capacity(max_capacity);
    if ttl.is_zero() {
        builder.build()
    } else {
        builder.time_to_live(ttl).build()
    }
}

impl std::fmt::Debug for RoleResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleResolver")
            .field("store_backed", &self.repository.is_some())
            .field("ttl", &self.ttl)
            .field("cached_users", &self.cache.entry_count())
            .finish()
    }
}
