use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Out-of-band message for the host's event loop
#[derive(Clone, Debug)]
pub struct Notification {
    pub message: String,
    pub args: Vec<Value>,
    pub kwargs: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            args: Vec::new(),
            kwargs: Map::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    pub fn with_kwargs(mut self, kwargs: Map<String, Value>) -> Self {
        self.kwargs = kwargs;
        self
    }

    pub fn from_error(err: &dyn std::error::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Thread-safe notification queue shared between producers and the host.
#[derive(Clone, Debug, Default)]
pub struct NotificationQueue {
    inner: Arc<Mutex<VecDeque<Notification>>>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, notification: Notification) {
        self.lock().push_back(notification);
    }

    /// Takes everything queued so far; later producers land in the next drain.
    pub fn drain(&self) -> Vec<Notification> {
        let mut queue = self.lock();
        std::mem::take(&mut *queue).into()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Notification>> {
        // a poisoned queue still holds valid notifications
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
