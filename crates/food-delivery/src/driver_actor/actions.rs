//! Custom actions for the Driver actor.

#[derive(Debug, Clone, PartialEq)]
pub enum DriverAction {
    /// Marks an available driver busy. Fails if someone else got there first.
    Claim,
    /// Frees the driver; `completed` counts the delivery towards their total.
    Release { completed: bool },
    SetAvailability(bool),
}
