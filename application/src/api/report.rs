//! Report definitions.

use juniper::graphql_object;
use rust_decimal::Decimal;
use service::query::report::supplier_dashboard;

use crate::{api, api::scalar, Context};

/// Summary of a supplier's group buys.
#[derive(Clone, Debug)]
pub struct SupplierDashboard(supplier_dashboard::Output);

impl From<supplier_dashboard::Output> for SupplierDashboard {
    fn from(output: supplier_dashboard::Output) -> Self {
        Self(output)
    }
}

/// Summary of a supplier's `GroupBuy`s.
#[graphql_object(context = Context)]
impl SupplierDashboard {
    /// Total number of the supplier's `GroupBuy`s.
    pub fn total_group_buys(&self) -> i32 {
        i32::try_from(u64::from(self.0.total_group_buys)).unwrap_or(i32::MAX)
    }

    /// Quantity ordered into the `recentGroupBuys`, excluding cancelled
    /// `Order`s.
    pub fn total_ordered_quantity(&self) -> scalar::Decimal {
        Decimal::from(self.0.total_ordered_quantity).into()
    }

    /// Most recently created `GroupBuy`s of the supplier, newest first.
    pub fn recent_group_buys(&self) -> Vec<SupplierDashboardRow> {
        self.0
            .recent_group_buys
            .iter()
            .cloned()
            .map(SupplierDashboardRow)
            .collect()
    }
}

/// Row of a [`SupplierDashboard`].
#[derive(Clone, Debug)]
pub struct SupplierDashboardRow(supplier_dashboard::Row);

/// Recent `GroupBuy` shown on a `SupplierDashboard`.
#[graphql_object(context = Context)]
impl SupplierDashboardRow {
    /// The `GroupBuy` itself.
    pub fn group_buy(&self) -> api::GroupBuy {
        self.0.group_buy.clone().into()
    }

    /// Quantity ordered into the `GroupBuy`, excluding cancelled `Order`s.
    pub fn ordered_quantity(&self) -> scalar::Decimal {
        Decimal::from(self.0.ordered_quantity).into()
    }
}
