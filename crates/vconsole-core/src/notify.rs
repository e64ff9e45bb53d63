//! Notification collaborator: transient success/error toasts.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::{info, warn};

/// How long a toast stays visible.
pub const TOAST_TTL: Duration = Duration::from_secs(3);

/// Maximum number of toasts kept at once; older ones are dropped first.
const TOAST_CAPACITY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// One user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub created: Instant,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            created: Instant::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

/// Sink for notices. Pages receive one at construction.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Bounded queue of toasts that expire after [`TOAST_TTL`].
///
/// With the bell enabled, every error notice leaves a pending bell for the
/// terminal owner to ring via [`ToastQueue::take_bell`].
#[derive(Debug)]
pub struct ToastQueue {
    toasts: Mutex<VecDeque<Notice>>,
    ttl: Duration,
    bell: AtomicBool,
    bell_pending: AtomicBool,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(TOAST_TTL)
    }
}

impl ToastQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            toasts: Mutex::new(VecDeque::with_capacity(TOAST_CAPACITY)),
            ttl,
            bell: AtomicBool::new(false),
            bell_pending: AtomicBool::new(false),
        }
    }

    pub fn set_bell(&self, enabled: bool) {
        self.bell.store(enabled, Ordering::Relaxed);
        if !enabled {
            self.bell_pending.store(false, Ordering::Relaxed);
        }
    }

    /// True once per batch of error notices raised since the last call.
    pub fn take_bell(&self) -> bool {
        self.bell_pending.swap(false, Ordering::Relaxed)
    }

    /// Drops expired toasts and returns the rest, oldest first.
    pub fn active(&self) -> Vec<Notice> {
        self.active_at(Instant::now())
    }

    fn active_at(&self, now: Instant) -> Vec<Notice> {
        let mut toasts = self.toasts.lock().unwrap_or_else(PoisonError::into_inner);
        toasts.retain(|n| now.saturating_duration_since(n.created) < self.ttl);
        toasts.iter().cloned().collect()
    }

    /// Most recent notice regardless of expiry.
    pub fn latest(&self) -> Option<Notice> {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .back()
            .cloned()
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => {
                warn!(message = %notice.message, "notice");
                if self.bell.load(Ordering::Relaxed) {
                    self.bell_pending.store(true, Ordering::Relaxed);
                }
            }
            NoticeLevel::Success | NoticeLevel::Info => info!(message = %notice.message, "notice"),
        }
        let mut toasts = self.toasts.lock().unwrap_or_else(PoisonError::into_inner);
        if toasts.len() == TOAST_CAPACITY {
            toasts.pop_front();
        }
        toasts.push_back(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire_and_are_bounded() {
        let queue = ToastQueue::new(Duration::from_millis(100));
        for i in 0..7 {
            queue.notify(Notice::info(format!("n{i}")));
        }
        let active = queue.active();
        assert_eq!(active.len(), TOAST_CAPACITY);
        assert_eq!(active[0].message, "n2");
        assert_eq!(queue.latest().map(|n| n.message), Some("n6".to_string()));

        let later = Instant::now() + Duration::from_millis(200);
        assert!(queue.active_at(later).is_empty());
    }

    #[test]
    fn bell_rings_for_errors_only_when_enabled() {
        let queue = ToastQueue::default();
        queue.notify(Notice::error("boom"));
        assert!(!queue.take_bell());

        queue.set_bell(true);
        queue.notify(Notice::success("saved"));
        queue.notify(Notice::info("loading"));
        assert!(!queue.take_bell());

        queue.notify(Notice::error("first"));
        queue.notify(Notice::error("second"));
        assert!(queue.take_bell());
        assert!(!queue.take_bell());
    }
}
