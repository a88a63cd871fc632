//! [`Query`] collection related to the multiple [`GroupBuy`]s.

use common::operations::By;

use crate::{
    domain::profile,
    read::group_buy::{ActiveIn, Listing},
};
#[cfg(doc)]
use crate::{domain::GroupBuy, Query};

use super::DatabaseQuery;

/// Queries [`GroupBuy::is_active()`] [`Listing`]s in an area, soonest ending
/// first.
pub type ActiveInArea = DatabaseQuery<By<Vec<Listing>, ActiveIn>>;

/// Queries [`Listing`]s of a supplier, newest first.
pub type BySupplier = DatabaseQuery<By<Vec<Listing>, profile::Id>>;
