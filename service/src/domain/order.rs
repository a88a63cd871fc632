//! [`Order`] definitions.

use std::time::Duration;

use common::{define_kind, unit, DateTime, DateTimeOf};
use derive_more::{Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::{GroupBuy, Profile};
use crate::domain::{group_buy, profile};

/// Period after placement during which an [`Order`] may be cancelled by its
/// vendor.
pub const CANCELLATION_WINDOW: Duration = Duration::from_secs(30 * 60);

/// Vendor's commitment of a [`Quantity`] into a [`GroupBuy`].
#[derive(Clone, Debug)]
pub struct Order {
    /// ID of this [`Order`].
    pub id: Id,

    /// ID of the vendor [`Profile`] who placed this [`Order`].
    pub vendor_id: profile::Id,

    /// ID of the [`GroupBuy`] this [`Order`] commits into.
    pub group_buy_id: group_buy::Id,

    /// Committed [`Quantity`].
    pub quantity: Quantity,

    /// [`Status`] of this [`Order`].
    pub status: Status,

    /// [`DateTime`] when this [`Order`] was placed.
    pub created_at: CreationDateTime,
}

impl Order {
    /// Indicates whether this [`Order`] still counts towards its
    /// [`GroupBuy`].
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.status != Status::Cancelled
    }

    /// Cancels this [`Order`] at the provided moment.
    ///
    /// # Errors
    ///
    /// - If this [`Order`] is not [`Status::Placed`].
    /// - If more than [`CANCELLATION_WINDOW`] passed since its placement.
    pub fn cancel(&mut self, at: DateTime) -> Result<(), CancellationError> {
        if self.status != Status::Placed {
            return Err(CancellationError::NotPlaced(self.status));
        }
        if self.created_at.duration_until(at) > CANCELLATION_WINDOW {
            return Err(CancellationError::WindowClosed);
        }
        self.status = Status::Cancelled;
        Ok(())
    }
}

/// Error of [`Order::cancel()`].
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum CancellationError {
    /// [`Order`] is not in the [`Status::Placed`].
    #[display("only orders with `PLACED` status can be cancelled, not `{_0}`")]
    NotPlaced(#[error(not(source))] Status),

    /// [`CANCELLATION_WINDOW`] has already passed.
    #[display("orders can only be cancelled within 30 minutes of placement")]
    WindowClosed,
}

/// ID of an [`Order`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Strictly positive amount of units committed by an [`Order`].
///
/// Fractional amounts are allowed.
#[derive(Clone, Copy, Debug, Display, Eq, Into, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Quantity(Decimal);

impl Quantity {
    /// Creates a new [`Quantity`] if the given `amount` is positive.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (amount > Decimal::ZERO).then_some(Self(amount.normalize()))
    }
}

define_kind! {
    #[doc = "Status of an [`Order`]."]
    enum Status {
        #[doc = "Placed and still cancellable."]
        Placed = 1,

        #[doc = "Cancelled by the vendor."]
        Cancelled = 2,

        #[doc = "Delivered to the vendor."]
        Delivered = 3,
    }
}

/// [`DateTime`] when an [`Order`] was placed.
pub type CreationDateTime = DateTimeOf<(Order, unit::Creation)>;

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTime;
    use rust_decimal::Decimal;

    use crate::domain::{group_buy, profile};

    use super::{CancellationError, Id, Order, Quantity, Status};

    fn order_placed_ago(ago: Duration) -> Order {
        Order {
            id: Id::new(),
            vendor_id: profile::Id::new(),
            group_buy_id: group_buy::Id::new(),
            quantity: Quantity::new(Decimal::from(10)).expect("positive"),
            status: Status::Placed,
            created_at: (DateTime::now() - ago).coerce(),
        }
    }

    #[test]
    fn quantity_must_be_positive() {
        assert!(Quantity::new(Decimal::ZERO).is_none());
        assert!(Quantity::new(Decimal::from(-3)).is_none());
        assert!(Quantity::new(Decimal::new(5, 1)).is_some());
    }

    #[test]
    fn cancels_within_window() {
        let mut order = order_placed_ago(Duration::from_secs(29 * 60));

        order.cancel(DateTime::now()).expect("within window");

        assert_eq!(order.status, Status::Cancelled);
        assert!(!order.is_live());
    }

    #[test]
    fn cancels_exactly_at_window_end() {
        let mut order = order_placed_ago(Duration::ZERO);
        let at = order.created_at.coerce() + Duration::from_secs(30 * 60);

        order.cancel(at).expect("window is inclusive");
    }

    #[test]
    fn refuses_cancellation_after_window() {
        let mut order = order_placed_ago(Duration::from_secs(31 * 60));

        let err = order.cancel(DateTime::now()).expect_err("window closed");

        assert!(matches!(err, CancellationError::WindowClosed));
        assert_eq!(order.status, Status::Placed);
    }

    #[test]
    fn refuses_cancellation_of_non_placed_order() {
        for status in [Status::Cancelled, Status::Delivered] {
            let mut order = order_placed_ago(Duration::from_secs(60));
            order.status = status;

            let err = order.cancel(DateTime::now()).expect_err("not placed");

            assert!(matches!(err, CancellationError::NotPlaced(s) if s == status));
        }
    }
}
