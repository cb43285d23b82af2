//! Transient status notifications
//!
//! At most one notification is visible. Showing a new one replaces the
//! current one and its expiry; there is no queue.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

use crate::scheduler::TimerHandle;

pub const PROCESSING_TEXT: &str = "Processing your request...";
pub const RECEIVED_TEXT: &str = "Response received";
pub const LISTENING_TEXT: &str = "Listening...";
pub const STOPPED_TEXT: &str = "Voice input stopped";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusIcon {
    Processing,
    Received,
    Listening,
    Stopped,
    Info,
}

impl StatusIcon {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusIcon::Processing => "spinner",
            StatusIcon::Received => "check",
            StatusIcon::Listening => "microphone",
            StatusIcon::Stopped => "stop",
            StatusIcon::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusNotification {
    pub text: String,
    pub icon: StatusIcon,
    pub expires_at: Instant,
}

#[derive(Debug)]
pub struct StatusNotifier {
    ttl: Duration,
    current: Option<StatusNotification>,
    hide_timer: Option<TimerHandle>,
}

impl StatusNotifier {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            current: None,
            hide_timer: None,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Replace the visible notification. Returns the hide timer of the
    /// superseded notification so the caller can cancel it.
    pub fn show(&mut self, text: impl Into<String>, icon: StatusIcon) -> Option<TimerHandle> {
        let text = text.into();
        tracing::debug!(%text, icon = icon.as_str(), "status shown");
        self.current = Some(StatusNotification {
            text,
            icon,
            expires_at: Instant::now() + self.ttl,
        });
        self.hide_timer.take()
    }

    pub fn set_hide_timer(&mut self, handle: TimerHandle) {
        self.hide_timer = Some(handle);
    }

    pub fn hide(&mut self) {
        self.current = None;
        self.hide_timer = None;
    }

    pub fn current(&self) -> Option<&StatusNotification> {
        self.current.as_ref()
    }
}
