//! Custom actions for the User actor.

use crate::model::Role;

#[derive(Debug, Clone)]
pub enum UserAction {
    /// Blocks login and profile changes.
    Deactivate,
    Reactivate,
    ChangeRole(Role),
}
