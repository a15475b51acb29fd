use crate::effect::NOTIFICATION_TTL;
use crate::{Effect, NotificationId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
}

/// Holds the single visible notification.
///
/// Showing a notification replaces the current one and returns the effect
/// that will expire it. Expiry is keyed by id, so the timer of a replaced
/// notification cannot remove its successor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Notifier {
    current: Option<Notification>,
    last_id: NotificationId,
}

impl Notifier {
    pub fn show(&mut self, kind: NotificationKind, message: impl Into<String>) -> Effect {
        self.last_id += 1;
        let id = self.last_id;
        self.current = Some(Notification {
            id,
            message: message.into(),
            kind,
        });
        Effect::ExpireNotification {
            id,
            after: NOTIFICATION_TTL,
        }
    }

    /// Removes the notification if it is still the visible one.
    pub fn expire(&mut self, id: NotificationId) -> bool {
        match &self.current {
            Some(current) if current.id == id => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }
}
