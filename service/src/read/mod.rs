//! Read entities definitions.

pub mod group_buy;
pub mod order;
pub mod product;
