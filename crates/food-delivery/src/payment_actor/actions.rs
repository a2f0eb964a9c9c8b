//! Custom actions for the Payment actor.

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentAction {
    /// Returns the full amount. Only a `Completed` payment can be refunded.
    Refund,
}
