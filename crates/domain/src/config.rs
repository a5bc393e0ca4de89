//! Application configuration
//!
//! Every field has a default so a partial file (or none at all) still yields
//! a usable configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_LOG_FILTER, RESEND_COOLDOWN_SECS, ROLE_CACHE_MAX_CAPACITY, ROLE_CACHE_TTL_SECS,
    SYNC_INTERVAL_SECS, VERIFICATION_POLL_SECS,
};

/// Root configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sync: SyncConfig,
    pub access: AccessConfig,
    pub logging: LoggingConfig,
}

/// Background sync triggers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Period of the automatic sync while online
    pub interval_seconds: u64,
    pub enabled: bool,
    /// Run an automatic sync when connectivity comes back
    pub sync_on_reconnect: bool,
}

impl SyncConfig {
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { interval_seconds: SYNC_INTERVAL_SECS, enabled: true, sync_on_reconnect: true }
    }
}

/// Access gate and email verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    pub resend_cooldown_seconds: u64,
    pub verification_poll_seconds: u64,
    /// How long an authoritative role lookup is trusted
    pub role_cache_ttl_seconds: u64,
    /// Upper bound on users with a cached role
    pub role_cache_max_capacity: u64,
    /// Re-check roles against the backing store instead of trusting the
    /// session copy
    pub verify_role_with_store: bool,
}

impl AccessConfig {
    pub const fn resend_cooldown(&self) -> Duration {
        Duration::from_secs(self.resend_cooldown_seconds)
    }

    pub const fn verification_poll_interval(&self) -> Duration {
        Duration::from_secs(self.verification_poll_seconds)
    }

    pub const fn role_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.role_cache_ttl_seconds)
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            resend_cooldown_seconds: RESEND_COOLDOWN_SECS,
            verification_poll_seconds: VERIFICATION_POLL_SECS,
            role_cache_ttl_seconds: ROLE_CACHE_TTL_SECS,
            role_cache_max_capacity: ROLE_CACHE_MAX_CAPACITY,
            verify_role_with_store: true,
        }
    }
}

/// Tracing subscriber settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: DEFAULT_LOG_FILTER.to_string(), json: false }
    }
}
