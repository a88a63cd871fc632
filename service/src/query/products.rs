//! [`Query`] collection related to the multiple [`Product`]s.

use common::operations::By;

use crate::{
    domain::{profile, Product},
    read,
};
#[cfg(doc)]
use crate::{domain::Profile, Query};

use super::DatabaseQuery;

/// Queries all the [`Product`]s, newest first.
pub type All = DatabaseQuery<By<Vec<Product>, read::product::All>>;

/// Queries the [`Product`]s of a supplier [`Profile`], newest first.
pub type BySupplier = DatabaseQuery<By<Vec<Product>, profile::Id>>;
