//! Custom actions for the Order actor.

use crate::model::OrderStatus;

#[derive(Debug, Clone, PartialEq)]
pub enum OrderAction {
    /// `Pending` to `Confirmed`.
    Confirm,
    /// `Pending` to `Cancelled`. Any other state is refused.
    Cancel,
    /// Kitchen and delivery progress, checked with [`OrderStatus::can_advance_to`].
    AdvanceTo(OrderStatus),
}
