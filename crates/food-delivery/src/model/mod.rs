//! # Domain Model
//!
//! Plain records for every aggregate, their create/update DTOs and the response shapes
//! services hand back. Each record implements [`ActorEntity`](actor_framework::ActorEntity)
//! in its `*_actor` module.

/// Declares a `u32` newtype id for an entity, e.g. `entity_id!(Order, "order")` gives
/// `OrderId` displaying as `order_7`.
macro_rules! entity_id {
    ($entity:ident, $prefix:literal) => {
        paste::paste! {
            #[doc = "Type-safe identifier for [`" $entity "`] records."]
            #[derive(
                Debug,
                Clone,
                Copy,
                PartialEq,
                Eq,
                Hash,
                PartialOrd,
                Ord,
                serde::Serialize,
                serde::Deserialize,
            )]
            #[serde(transparent)]
            pub struct [<$entity Id>](pub u32);

            impl From<u32> for [<$entity Id>] {
                fn from(id: u32) -> Self {
                    Self(id)
                }
            }

            impl std::fmt::Display for [<$entity Id>] {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, concat!($prefix, "_{}"), self.0)
                }
            }
        }
    };
}

pub mod cart;
pub mod delivery;
pub mod notification;
pub mod order;
pub mod payment;
pub mod restaurant;
pub mod saga;
pub mod user;

pub use cart::*;
pub use delivery::*;
pub use notification::*;
pub use order::*;
pub use payment::*;
pub use restaurant::*;
pub use saga::*;
pub use user::*;

/// Rounds a money amount to whole cents.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
