//! Domain types and models

pub mod access;
pub mod notice;
pub mod session;
pub mod sync;
pub mod user;

pub use access::{AccessDecision, InterstitialKind, RouteRequirements};
pub use notice::{Notice, NoticeLevel};
pub use session::SessionState;
pub use sync::{Connectivity, SyncKind};
pub use user::{
    dashboard_path, InterfaceLanguage, SessionUser, Theme, UserPreferences, UserRole, UserStats,
};
