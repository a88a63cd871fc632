//! Domain definitions.

pub mod group_buy;
pub mod order;
pub mod product;
pub mod profile;

pub use self::{
    group_buy::GroupBuy,
    order::Order,
    product::Product,
    profile::{Actor, Profile},
};
