//! User-visible notifications.
//!
//! Registry and screen operations report their outcome through a
//! [`Notifier`] handed in by the caller. HTTP handlers collect the messages
//! per request with [`ToastCollector`] and return them in the response body.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: &str);

    fn success(&self, message: &str) {
        self.notify(NotificationKind::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(NotificationKind::Error, message);
    }
}

#[derive(Default)]
pub struct ToastCollector {
    entries: Mutex<Vec<Notification>>,
}

impl ToastCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.lock())
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries.lock().iter().map(|n| n.message.clone()).collect()
    }
}

impl Notifier for ToastCollector {
    fn notify(&self, kind: NotificationKind, message: &str) {
        self.entries.lock().push(Notification {
            kind,
            message: message.to_string(),
        });
    }
}

/// Envelope returned by every mutating endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActionResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

impl<T> ActionResponse<T> {
    pub fn ok(data: Option<T>, toasts: &ToastCollector) -> Self {
        Self {
            success: true,
            data,
            error: None,
            notifications: toasts.take(),
        }
    }

    pub fn failed(error: impl Into<String>, toasts: &ToastCollector) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            notifications: toasts.take(),
        }
    }
}
