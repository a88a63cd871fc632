//! [`GroupBuy`] definitions.

use std::{iter, ops};

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::{Order, Product, Profile};
use crate::domain::{order, product, profile};

/// Time-bounded pooled purchase of a [`Product`] in a specific area.
#[derive(Clone, Debug)]
pub struct GroupBuy {
    /// ID of this [`GroupBuy`].
    pub id: Id,

    /// ID of the supplier [`Profile`] running this [`GroupBuy`].
    pub supplier_id: profile::Id,

    /// ID of the [`Product`] being pooled.
    pub product_id: product::Id,

    /// Optional [`Title`] of this [`GroupBuy`].
    pub title: Option<Title>,

    /// [`Quantity`] the supplier aims to sell.
    pub target_quantity: Quantity,

    /// [`Quantity`] committed by all the live [`Order`]s.
    pub current_quantity: Quantity,

    /// [`Price`] of a single unit.
    pub price_per_unit: Price,

    /// [`Status`] of this [`GroupBuy`].
    pub status: Status,

    /// [`profile::AreaName`] this [`GroupBuy`] is offered in.
    pub area_name: profile::AreaName,

    /// [`DateTime`] when this [`GroupBuy`] stops accepting [`Order`]s.
    pub end_date: EndDateTime,

    /// [`DateTime`] when this [`GroupBuy`] was created.
    pub created_at: CreationDateTime,
}

impl GroupBuy {
    /// Indicates whether this [`GroupBuy`] accepts new [`Order`]s.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }

    /// Indicates whether this [`GroupBuy`] is run by the provided supplier.
    #[must_use]
    pub fn is_owned_by(&self, supplier_id: profile::Id) -> bool {
        self.supplier_id == supplier_id
    }

    /// Indicates whether the committed [`Quantity`] reached the target one.
    ///
    /// Reaching the target does not close this [`GroupBuy`].
    #[must_use]
    pub fn is_target_reached(&self) -> bool {
        self.current_quantity >= self.target_quantity
    }

    /// Adds the [`order::Quantity`] of a newly placed [`Order`] to the
    /// committed one.
    ///
    /// # Errors
    ///
    /// With the current [`Quantity`] if the sum is not representable.
    pub fn commit(
        &mut self,
        quantity: order::Quantity,
    ) -> Result<(), Quantity> {
        self.current_quantity = self
            .current_quantity
            .checked_add(quantity)
            .ok_or(self.current_quantity)?;
        Ok(())
    }

    /// Removes the [`order::Quantity`] of a cancelled [`Order`] from the
    /// committed one.
    pub fn release(&mut self, quantity: order::Quantity) {
        self.current_quantity = self.current_quantity - quantity;
    }

    /// Moves this [`GroupBuy`] into the provided terminal [`Status`].
    ///
    /// # Errors
    ///
    /// With the current [`Status`] if the transition is not allowed.
    pub fn close(&mut self, status: Status) -> Result<(), Status> {
        if !self.status.can_become(status) {
            return Err(self.status);
        }
        self.status = status;
        Ok(())
    }
}

/// ID of a [`GroupBuy`].
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
    Ord,
    PartialEq,
    PartialOrd,
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

/// Title of a [`GroupBuy`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Title(String);

impl Title {
    /// Creates a new [`Title`] if the given `title` is valid.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Option<Self> {
        let title = title.into();
        (title.trim() == title && !title.is_empty() && title.len() <= 256)
            .then_some(Self(title))
    }
}

impl FromStr for Title {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Title`")
    }
}

/// Non-negative amount of units pooled in a [`GroupBuy`].
#[derive(
    Clone, Copy, Debug, Default, Display, Eq, Into, Ord, PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Quantity(Decimal);

impl Quantity {
    /// [`Quantity`] of nothing.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Quantity`] if the given `amount` is non-negative.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (amount >= Decimal::ZERO).then_some(Self(amount.normalize()))
    }

    /// Adds the provided [`order::Quantity`] to this [`Quantity`].
    ///
    /// [`None`] if the sum is not representable.
    #[must_use]
    pub fn checked_add(self, rhs: order::Quantity) -> Option<Self> {
        self.0
            .checked_add(Decimal::from(rhs))
            .map(|sum| Self(sum.normalize()))
    }
}

/// Saturates at the maximum representable [`Quantity`].
impl ops::Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0).normalize())
    }
}

impl iter::Sum for Quantity {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |sum, q| sum + q)
    }
}

/// Saturates at the maximum representable [`Quantity`].
impl ops::Add<order::Quantity> for Quantity {
    type Output = Self;

    fn add(self, rhs: order::Quantity) -> Self::Output {
        Self(self.0.saturating_add(Decimal::from(rhs)).normalize())
    }
}

impl ops::Sub<order::Quantity> for Quantity {
    type Output = Self;

    /// Never goes below [`Quantity::ZERO`].
    fn sub(self, rhs: order::Quantity) -> Self::Output {
        Self((self.0 - Decimal::from(rhs)).max(Decimal::ZERO).normalize())
    }
}

/// Non-negative price of a single unit in a [`GroupBuy`].
#[derive(Clone, Copy, Debug, Display, Eq, Into, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Price(Decimal);

impl Price {
    /// Creates a new [`Price`] if the given `amount` is non-negative.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (amount >= Decimal::ZERO).then_some(Self(amount.normalize()))
    }
}

define_kind! {
    #[doc = "Status of a [`GroupBuy`]."]
    enum Status {
        #[doc = "Accepting new orders."]
        Active = 1,

        #[doc = "Closed successfully."]
        Completed = 2,

        #[doc = "Called off by the supplier."]
        Cancelled = 3,
    }
}

impl Status {
    /// Indicates whether a [`GroupBuy`] may move from this [`Status`] into
    /// the `next` one.
    #[must_use]
    pub fn can_become(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Active, Self::Completed | Self::Cancelled),
        )
    }
}

/// [`DateTime`] when a [`GroupBuy`] was created.
pub type CreationDateTime = DateTimeOf<(GroupBuy, unit::Creation)>;

/// [`DateTime`] when a [`GroupBuy`] stops accepting [`Order`]s.
pub type EndDateTime = DateTimeOf<(GroupBuy, unit::Expiration)>;

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use crate::domain::order;

    use super::{Quantity, Status};

    fn qty(value: i64) -> order::Quantity {
        order::Quantity::new(Decimal::from(value)).expect("positive")
    }

    #[test]
    fn quantity_is_never_negative() {
        assert!(Quantity::new(Decimal::from(-1)).is_none());
        assert_eq!(Quantity::new(Decimal::ZERO), Some(Quantity::ZERO));

        let current = Quantity::ZERO + qty(10) + qty(5);
        assert_eq!(Decimal::from(current), Decimal::from(15));

        let released = current - qty(20);
        assert_eq!(released, Quantity::ZERO);
    }

    #[test]
    fn unrepresentable_sums_do_not_panic() {
        let huge = order::Quantity::new(Decimal::from_i128_with_scale(
            5 * 10_i128.pow(28),
            0,
        ))
        .expect("positive");
        let max = Quantity::new(Decimal::MAX).expect("non-negative");

        let current = Quantity::ZERO.checked_add(huge).expect("fits");
        assert!(current.checked_add(huge).is_none());
        assert!(max.checked_add(qty(1)).is_none());

        assert_eq!(max + qty(1), max);
        assert_eq!([max, max].into_iter().sum::<Quantity>(), max);
    }

    #[test]
    fn only_active_status_may_be_closed() {
        assert!(Status::Active.can_become(Status::Completed));
        assert!(Status::Active.can_become(Status::Cancelled));
        assert!(!Status::Active.can_become(Status::Active));
        assert!(!Status::Completed.can_become(Status::Cancelled));
        assert!(!Status::Cancelled.can_become(Status::Completed));
    }
}
