//! Seams for the collaborators the console does not own: the toast surface
//! and the client-side router. The signed-in user's id is passed in by the
//! shell instead of being resolved here.

use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

impl Notification {
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            title: "Success".to_string(),
            description: description.into(),
            variant: Variant::Success,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            description: description.into(),
            variant: Variant::Error,
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Logs notifications instead of rendering them. Used by the CLI driver.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.variant {
            Variant::Success => info!(
                title = %notification.title,
                "{}", notification.description
            ),
            Variant::Error => warn!(
                title = %notification.title,
                "{}", notification.description
            ),
        }
    }
}

pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, _route: Route) {}
}
