//! [`SupplierDashboard`] definition.

use std::collections::HashMap;

use common::operations::{By, Select};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{Order, Profile};
use crate::{
    domain::{group_buy, profile, GroupBuy},
    infra::{database, Database},
    read::{
        group_buy::{Recent, TotalCount},
        order::Committed,
    },
    Query, Service,
};

/// Number of the most recent [`GroupBuy`]s shown on a [`SupplierDashboard`].
pub const RECENT_LIMIT: u16 = 5;

/// [`Query`] summarizing the [`GroupBuy`]s of a supplier.
///
/// Cancelled [`Order`]s are not counted.
#[derive(Clone, Copy, Debug)]
pub struct SupplierDashboard {
    /// ID of the supplier [`Profile`].
    pub supplier_id: profile::Id,
}

/// Output of the [`SupplierDashboard`] [`Query`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Total count of the supplier's [`GroupBuy`]s.
    pub total_group_buys: TotalCount,

    /// Sum of [`Row::ordered_quantity`] over [`Output::recent_group_buys`].
    pub total_ordered_quantity: group_buy::Quantity,

    /// [`RECENT_LIMIT`] most recently created [`GroupBuy`]s.
    pub recent_group_buys: Vec<Row>,
}

/// Row in the [`Output`] of the [`SupplierDashboard`] [`Query`].
#[derive(Clone, Debug)]
pub struct Row {
    /// The [`GroupBuy`] itself.
    pub group_buy: GroupBuy,

    /// Quantity ordered by the live [`Order`]s of the [`GroupBuy`].
    pub ordered_quantity: group_buy::Quantity,
}

impl<Db, Ai> Query<SupplierDashboard> for Service<Db, Ai>
where
    Db: Database<
            Select<By<TotalCount, profile::Id>>,
            Ok = TotalCount,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<GroupBuy>, Recent>>,
            Ok = Vec<GroupBuy>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<group_buy::Id, group_buy::Quantity>, Committed>>,
            Ok = HashMap<group_buy::Id, group_buy::Quantity>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Output;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        SupplierDashboard { supplier_id }: SupplierDashboard,
    ) -> Result<Self::Ok, Self::Err> {
        let total_group_buys = self
            .database()
            .execute(Select(By::new(supplier_id)))
            .await
            .map_err(tracerr::wrap!())?;

        let recent = self
            .database()
            .execute(Select(By::new(Recent {
                supplier_id,
                limit: RECENT_LIMIT,
            })))
            .await
            .map_err(tracerr::wrap!())?;
        if recent.is_empty() {
            return Ok(Output {
                total_group_buys,
                total_ordered_quantity: group_buy::Quantity::ZERO,
                recent_group_buys: vec![],
            });
        }

        let committed = self
            .database()
            .execute(Select(By::new(Committed(
                recent.iter().map(|g| g.id).collect(),
            ))))
            .await
            .map_err(tracerr::wrap!())?;

        let recent_group_buys = recent
            .into_iter()
            .map(|group_buy| Row {
                ordered_quantity: committed
                    .get(&group_buy.id)
                    .copied()
                    .unwrap_or_default(),
                group_buy,
            })
            .collect::<Vec<_>>();

        Ok(Output {
            total_group_buys,
            total_ordered_quantity: recent_group_buys
                .iter()
                .map(|r| r.ordered_quantity)
                .sum(),
            recent_group_buys,
        })
    }
}
