//! [`Order`] read models definitions.

use crate::domain::{group_buy, order, profile, GroupBuy, Order, Product};

/// Selector of an [`Order`] placed by the provided vendor.
///
/// Another vendor's [`Order`] is never selected.
#[derive(Clone, Copy, Debug)]
pub struct Owned {
    /// ID of the [`Order`].
    pub id: order::Id,

    /// ID of the vendor [`Profile`] who must have placed the [`Order`].
    ///
    /// [`Profile`]: crate::domain::Profile
    pub vendor_id: profile::Id,
}

/// Selector of [`group_buy::Quantity`] committed by the live [`Order`]s of
/// the provided [`GroupBuy`]s.
#[derive(Clone, Debug)]
pub struct Committed(pub Vec<group_buy::Id>);

/// [`Order`] enriched with its [`GroupBuy`] and [`Product`].
#[derive(Clone, Debug)]
pub struct Detailed {
    /// The [`Order`] itself.
    pub order: Order,

    /// [`GroupBuy`] the [`Order`] commits into.
    pub group_buy: GroupBuy,

    /// [`Product`] of the [`GroupBuy`].
    pub product: Product,
}
