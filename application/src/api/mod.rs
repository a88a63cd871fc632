//! GraphQL API definitions.

pub mod group_buy;
mod mutation;
pub mod order;
pub mod product;
pub mod profile;
mod query;
pub mod report;
pub mod scalar;

use juniper::EmptySubscription;

use crate::Context;

pub use self::{
    group_buy::GroupBuy, mutation::Mutation, order::Order, product::Product,
    profile::Profile, query::Query,
};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;
