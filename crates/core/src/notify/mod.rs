//! User-facing notices
//!
//! Gate stages and flows report to the user through [`Notifier`]; how a
//! notice is shown (toast, banner, log line) is up to the host shell.

use maayegue_domain::{Notice, NoticeLevel};
use tracing::{info, warn};

/// Sink for transient user-facing messages
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Notifier that only writes notices to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => warn!(level = %notice.level, message = %notice.message, "Notice"),
            NoticeLevel::Success | NoticeLevel::Info => {
                info!(level = %notice.level, message = %notice.message, "Notice");
            }
        }
    }
}
