//! [`GroupBuy`] read models definitions.

use derive_more::{From, Into};

#[cfg(doc)]
use crate::domain::Profile;
use crate::domain::{product, profile, GroupBuy, Product};

/// [`GroupBuy`] enriched with its [`Product`] and the display name of its
/// supplier.
#[derive(Clone, Debug)]
pub struct Listing {
    /// Listed [`GroupBuy`].
    pub group_buy: GroupBuy,

    /// [`Product`] being pooled.
    pub product: Product,

    /// [`profile::FullName`] of the supplier, if it's known.
    pub supplier_name: Option<profile::FullName>,
}

/// Selector of [`GroupBuy::is_active()`] ones offered in the provided area.
///
/// Selected ones are ordered by the soonest end first.
#[derive(Clone, Debug)]
pub struct ActiveIn(pub profile::AreaName);

/// Selector of [`GroupBuy::is_active()`] ones pooling the provided
/// [`Product`].
#[derive(Clone, Copy, Debug)]
pub struct ActiveOf(pub product::Id);

/// Selector of the most recently created [`GroupBuy`]s of a supplier.
#[derive(Clone, Copy, Debug)]
pub struct Recent {
    /// ID of the supplier [`Profile`].
    pub supplier_id: profile::Id,

    /// Maximum number of [`GroupBuy`]s to select.
    pub limit: u16,
}

/// Total count of [`GroupBuy`]s.
#[derive(Clone, Copy, Debug, Default, Eq, From, Hash, Into, PartialEq)]
pub struct TotalCount(u64);
