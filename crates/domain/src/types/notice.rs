//! Transient user-facing messages

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{NOTICE_ERROR_MS, NOTICE_INFO_MS, NOTICE_SUCCESS_MS};
use crate::impl_domain_status_conversions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

impl_domain_status_conversions!(NoticeLevel {
    Success => "success",
    Error => "error",
    Info => "info",
});

/// Toast-style message shown for `duration`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub duration: Duration,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message, Duration::from_millis(NOTICE_SUCCESS_MS))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message, Duration::from_millis(NOTICE_ERROR_MS))
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message, Duration::from_millis(NOTICE_INFO_MS))
    }

    pub fn new(level: NoticeLevel, message: impl Into<String>, duration: Duration) -> Self {
        Self { level, message: message.into(), duration }
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}
