//! User and role types
//!
//! A `SessionUser` is the authenticated user as the client sees it: the auth
//! provider's identity merged with the profile document kept in the backing
//! store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{
    ADMIN_DASHBOARD_PATH, LEARNER_DASHBOARD_PATH, TEACHER_DASHBOARD_PATH, VISITOR_DASHBOARD_PATH,
};

/// Access level of a user
///
/// Stored role strings are parsed leniently with [`UserRole::parse`]: legacy
/// aliases map onto the four roles and anything unrecognized becomes
/// `Learner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserRole {
    Visitor,
    Learner,
    Teacher,
    Admin,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [Self::Visitor, Self::Learner, Self::Teacher, Self::Admin];

    /// Strict lookup of a stored role string, including legacy aliases.
    /// Returns `None` for strings that name no known role.
    pub fn try_parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "visitor" | "guest" => Some(Self::Visitor),
            "learner" | "apprenant" | "student" | "family_member" => Some(Self::Learner),
            "teacher" => Some(Self::Teacher),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Lenient parse: unknown strings resolve to `Learner`
    pub fn parse(raw: &str) -> Self {
        Self::try_parse(raw).unwrap_or(Self::Learner)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Visitor => "visitor",
            Self::Learner => "learner",
            Self::Teacher => "teacher",
            Self::Admin => "admin",
        }
    }

    /// Roles whose sensitive routes can demand a second factor
    pub const fn is_privileged(self) -> bool {
        matches!(self, Self::Teacher | Self::Admin)
    }

    /// Landing path for this role, see [`dashboard_path`]
    pub const fn dashboard_path(self) -> &'static str {
        dashboard_path(self)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for UserRole {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for UserRole {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

/// Role to landing-path mapping used by every redirect in the gate chain.
pub const fn dashboard_path(role: UserRole) -> &'static str {
    match role {
        UserRole::Visitor => VISITOR_DASHBOARD_PATH,
        UserRole::Learner => LEARNER_DASHBOARD_PATH,
        UserRole::Teacher => TEACHER_DASHBOARD_PATH,
        UserRole::Admin => ADMIN_DASHBOARD_PATH,
    }
}

/// Interface language preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceLanguage {
    #[default]
    Fr,
    En,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// Learning preferences stored on the profile document
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub language: InterfaceLanguage,
    pub target_languages: Vec<String>,
    pub notifications_enabled: bool,
    pub theme: Theme,
    pub daily_goal_minutes: u32,
}

/// Progress counters stored on the profile document
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserStats {
    pub lessons_completed: u32,
    pub words_learned: u32,
    pub total_time_minutes: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub badges_earned: u32,
    pub level: u32,
    pub xp: u64,
}

/// Authenticated user as held in the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub display_name: String,
    /// Role as cached in the session; may be stale relative to the backing
    /// store
    pub role: UserRole,
    pub email_verified: bool,
    #[serde(default)]
    pub two_factor_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
    #[serde(default)]
    pub preferences: Option<UserPreferences>,
    #[serde(default)]
    pub stats: Option<UserStats>,
}

impl SessionUser {
    /// New unverified user without profile extras. The display name defaults
    /// to the local part of the email address.
    pub fn new(id: impl Into<String>, email: impl Into<String>, role: UserRole) -> Self {
        let email = email.into();
        let display_name = email.split('@').next().unwrap_or_default().to_string();
        let now = Utc::now();
        Self {
            id: id.into(),
            email,
            display_name,
            role,
            email_verified: false,
            two_factor_enabled: false,
            created_at: now,
            last_login_at: now,
            preferences: None,
            stats: None,
        }
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    #[must_use]
    pub fn with_email_verified(mut self, verified: bool) -> Self {
        self.email_verified = verified;
        self
    }

    #[must_use]
    pub fn with_two_factor(mut self, enabled: bool) -> Self {
        self.two_factor_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }
}
