//! [`Product`] read models definitions.

#[cfg(doc)]
use crate::domain::Product;

/// Selector of all the [`Product`]s, newest first.
#[derive(Clone, Copy, Debug)]
pub struct All;
