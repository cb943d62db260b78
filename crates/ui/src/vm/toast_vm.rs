use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use services::{Notification, NotificationLevel, Notifier};
use tokio::sync::watch;

const MAX_VISIBLE: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub level: NotificationLevel,
    pub message: String,
}

impl Toast {
    #[must_use]
    pub fn class(&self) -> &'static str {
        match self.level {
            NotificationLevel::Info => "toast toast-info",
            NotificationLevel::Success => "toast toast-success",
            NotificationLevel::Error => "toast toast-error",
        }
    }
}

/// Transient messages shown in the corner of every page.
///
/// Oldest toasts drop off once more than a handful are queued.
#[derive(Clone)]
pub struct ToastQueue {
    inner: Arc<Mutex<ToastState>>,
    updates: watch::Sender<Vec<Toast>>,
}

#[derive(Default)]
struct ToastState {
    next_id: u64,
    toasts: Vec<Toast>,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastQueue {
    #[must_use]
    pub fn new() -> Self {
        let (updates, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(Mutex::new(ToastState::default())),
            updates,
        }
    }

    fn state(&self) -> MutexGuard<'_, ToastState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, notification: Notification) -> u64 {
        let mut state = self.state();
        state.next_id += 1;
        let id = state.next_id;
        state.toasts.push(Toast {
            id,
            level: notification.level,
            message: notification.message,
        });
        let overflow = state.toasts.len().saturating_sub(MAX_VISIBLE);
        state.toasts.drain(..overflow);
        self.updates.send_replace(state.toasts.clone());
        id
    }

    pub fn dismiss(&self, id: u64) {
        let mut state = self.state();
        let before = state.toasts.len();
        state.toasts.retain(|toast| toast.id != id);
        if state.toasts.len() != before {
            self.updates.send_replace(state.toasts.clone());
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<Toast> {
        self.state().toasts.clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> {
        self.updates.subscribe()
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, notification: Notification) {
        self.push(notification);
    }
}

/// Remembers which visible toasts already have an expiry timer.
///
/// Only ids still on screen are kept; ids are never reused.
#[derive(Debug, Default)]
pub struct ToastExpiry {
    scheduled: HashSet<u64>,
}

impl ToastExpiry {
    /// Ids in `current` seen for the first time.
    pub fn newly_shown(&mut self, current: &[Toast]) -> Vec<u64> {
        self.scheduled
            .retain(|id| current.iter().any(|toast| toast.id == *id));
        current
            .iter()
            .filter(|toast| self.scheduled.insert(toast.id))
            .map(|toast| toast.id)
            .collect()
    }

    #[must_use]
    pub fn tracked(&self) -> usize {
        self.scheduled.len()
    }
}
