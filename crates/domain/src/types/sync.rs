//! Background sync vocabulary

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Kind of reconciliation a sync task performs. Used as the task label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncKind {
    Dictionary,
    Lessons,
    Progress,
}

impl_domain_status_conversions!(SyncKind {
    Dictionary => "dictionary",
    Lessons => "lessons",
    Progress => "progress",
});

/// Network reachability as reported by the host shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    #[default]
    Online,
    Offline,
}

impl_domain_status_conversions!(Connectivity {
    Online => "online",
    Offline => "offline",
});

impl Connectivity {
    pub const fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}
