use std::sync::{Arc, Mutex, PoisonError};

/// Transient user-facing notifications ("toasts").
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, message: &str) {
        (**self).notify(message)
    }
}

/// Buffers toasts until a front end drains them.
#[derive(Debug, Default)]
pub struct ToastQueue {
    pending: Mutex<Vec<String>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn pending(&self) -> Vec<String> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, message: &str) {
        tracing::debug!(message, "toast");
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}
