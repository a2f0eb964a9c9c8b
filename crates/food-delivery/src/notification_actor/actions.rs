//! Custom actions for the Notification actor.

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationAction {
    MarkRead,
}
