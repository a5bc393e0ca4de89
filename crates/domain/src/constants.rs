//! Application constants
//!
//! Route paths and default timings shared by the access gate, the
//! verification flow and the sync triggers.

// Route paths
pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const VISITOR_DASHBOARD_PATH: &str = "/dashboard/guest";
pub const LEARNER_DASHBOARD_PATH: &str = "/dashboard/apprenant";
pub const TEACHER_DASHBOARD_PATH: &str = "/dashboard/teacher";
pub const ADMIN_DASHBOARD_PATH: &str = "/dashboard/admin";

// Verification
pub const RESEND_COOLDOWN_SECS: u64 = 60;
pub const VERIFICATION_POLL_SECS: u64 = 5;

// Role lookups
pub const ROLE_CACHE_TTL_SECS: u64 = 300;
pub const ROLE_CACHE_MAX_CAPACITY: u64 = 1000;

// Background sync
pub const SYNC_INTERVAL_SECS: u64 = 300;

// Notice display durations
pub const NOTICE_SUCCESS_MS: u64 = 3000;
pub const NOTICE_ERROR_MS: u64 = 4000;
pub const NOTICE_INFO_MS: u64 = 4000;
pub const NOTICE_TWO_FACTOR_MS: u64 = 6000;

// Logging
pub const DEFAULT_LOG_FILTER: &str = "info";
