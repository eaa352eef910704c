use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;
use utoipa::ToSchema;

pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(5);

/// The dismissible error banner. A raised message stays visible for a fixed
/// time and then disappears on its own.
#[derive(Debug)]
pub struct NoticeBoard {
    ttl: Duration,
    current: Mutex<Option<(String, Instant)>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub message: String,
    pub expires_in_ms: u64,
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            current: Mutex::new(None),
        }
    }

    pub fn raise(&self, message: impl Into<String>) {
        self.raise_at(message, Instant::now());
    }

    pub fn raise_at(&self, message: impl Into<String>, now: Instant) {
        *self.current.lock() = Some((message.into(), now));
    }

    pub fn current(&self) -> Option<Notice> {
        self.current_at(Instant::now())
    }

    pub fn current_at(&self, now: Instant) -> Option<Notice> {
        let mut slot = self.current.lock();
        let raised = slot.as_ref()?.1;
        let age = now.saturating_duration_since(raised);
        if age >= self.ttl {
            *slot = None;
            return None;
        }
        Some(Notice {
            message: slot.as_ref()?.0.clone(),
            expires_in_ms: (self.ttl - age).as_millis() as u64,
        })
    }

    pub fn dismiss(&self) {
        *self.current.lock() = None;
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_TTL)
    }
}
