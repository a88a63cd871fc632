//! [`Query`] collection related to the multiple [`Order`]s.

use common::operations::By;

use crate::{domain::profile, read::order::Detailed};
#[cfg(doc)]
use crate::{domain::Order, Query};

use super::DatabaseQuery;

/// Queries [`Detailed`] [`Order`]s placed by a vendor, newest first.
pub type ByVendor = DatabaseQuery<By<Vec<Detailed>, profile::Id>>;
