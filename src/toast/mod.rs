//! Transient user notifications
//!
//! Toasts are fire-and-forget: `show` queues one and schedules its removal.
//! Each toast stays on screen for `display_ms`, then plays an exit animation
//! for `exit_animation_ms` before it leaves the queue.

use crate::config::ToastConfig;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
    /// Set once the exit animation has started
    pub exiting: bool,
}

#[derive(Clone)]
pub struct Toaster {
    queue: Arc<Mutex<Vec<Toast>>>,
    next_id: Arc<AtomicU64>,
    display: Duration,
    exit_animation: Duration,
}

impl Toaster {
    pub fn new(config: &ToastConfig) -> Self {
        Self {
            queue: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            display: Duration::from_millis(config.display_ms),
            exit_animation: Duration::from_millis(config.exit_animation_ms),
        }
    }

    /// Queue a toast and schedule its dismissal. Must be called from within a tokio runtime.
    pub fn show(&self, kind: ToastKind, message: impl Into<String>) -> u64 {
        let message = message.into();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);

        match kind {
            ToastKind::Error | ToastKind::Warning => warn!("Toast [{:?}]: {}", kind, message),
            _ => info!("Toast [{:?}]: {}", kind, message),
        }

        self.lock().push(Toast {
            id,
            kind,
            message,
            created_at: Utc::now(),
            exiting: false,
        });

        let queue = Arc::clone(&self.queue);
        let display = self.display;
        let exit_animation = self.exit_animation;
        tokio::spawn(async move {
            tokio::time::sleep(display).await;
            {
                let mut queue = queue.lock().unwrap_or_else(|e| e.into_inner());
                if let Some(toast) = queue.iter_mut().find(|t| t.id == id) {
                    toast.exiting = true;
                }
            }
            tokio::time::sleep(exit_animation).await;
            queue
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .retain(|t| t.id != id);
        });

        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.show(ToastKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.show(ToastKind::Error, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.show(ToastKind::Warning, message)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.show(ToastKind::Info, message)
    }

    /// Toasts currently on screen, oldest first
    pub fn visible(&self) -> Vec<Toast> {
        self.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|t| t.message.clone()).collect()
    }

    pub fn contains(&self, kind: ToastKind, needle: &str) -> bool {
        self.lock()
            .iter()
            .any(|t| t.kind == kind && t.message.contains(needle))
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Toast>> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new(&ToastConfig::default())
    }
}
