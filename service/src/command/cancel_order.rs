//! [`Command`] for cancelling an [`Order`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::{order::CANCELLATION_WINDOW, profile::Role};
use crate::{
    domain::{group_buy, order, profile, Actor, GroupBuy, Order},
    error::{Categorize, Kind},
    infra::{database, Database},
    read::order::Owned,
    Service,
};

use super::Command;

/// [`Command`] for cancelling an own [`Order`] within the
/// [`CANCELLATION_WINDOW`].
///
/// The cancelled [`Order`] quantity is released from its [`GroupBuy`] in the
/// same transaction.
#[derive(Clone, Debug)]
pub struct CancelOrder {
    /// [`Actor`] cancelling the [`Order`].
    pub actor: Actor,

    /// ID of the [`Order`] to cancel.
    pub order_id: order::Id,
}

impl<Db, Ai> Command<CancelOrder> for Service<Db, Ai>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Order>, Owned>>,
            Ok = Option<Order>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<GroupBuy, group_buy::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Order>, Owned>>,
            Ok = Option<Order>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<GroupBuy>, group_buy::Id>>,
            Ok = Option<GroupBuy>,
            Err = Traced<database::Error>,
        > + Database<Update<Order>, Err = Traced<database::Error>>
        + Database<Update<GroupBuy>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Order;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CancelOrder) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CancelOrder { actor, order_id } = cmd;

        if !actor.is_vendor() {
            return Err(tracerr::new!(E::NotVendor(actor.id)));
        }
        let owned = Owned {
            id: order_id,
            vendor_id: actor.id,
        };

        // Fail fast without opening a transaction.
        let order = self
            .database()
            .execute(Select(By::<Option<Order>, _>::new(owned)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::OrderNotExists(order_id))
            .map_err(tracerr::wrap!())?;
        order
            .clone()
            .cancel(DateTime::now())
            .map_err(|e| tracerr::new!(E::from_cancellation(order_id, e)))?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Serialize with commitments into the same `GroupBuy`.
        tx.execute(Lock(By::new(order.group_buy_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut order = tx
            .execute(Select(By::<Option<Order>, _>::new(owned)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::OrderNotExists(order_id))
            .map_err(tracerr::wrap!())?;
        order
            .cancel(DateTime::now())
            .map_err(|e| tracerr::new!(E::from_cancellation(order_id, e)))?;

        let mut group_buy = tx
            .execute(Select(By::<Option<GroupBuy>, _>::new(order.group_buy_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::Db(database::Error::NotFound))
            .map_err(tracerr::wrap!())?;
        group_buy.release(order.quantity);

        tx.execute(Update(order.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Update(group_buy.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            order.id = %order.id,
            group_buy.id = %group_buy.id,
            current_quantity = %group_buy.current_quantity,
            "order cancelled",
        );

        Ok(order)
    }
}

/// Error of [`CancelOrder`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`CANCELLATION_WINDOW`] has passed already.
    #[display("Orders can only be cancelled within 30 minutes of placement.")]
    #[from(ignore)]
    CancellationWindowClosed(#[error(not(source))] order::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Actor`] is not a [`Role::Vendor`].
    #[display("`Profile(id: {_0})` is not a vendor")]
    #[from(ignore)]
    NotVendor(#[error(not(source))] profile::Id),

    /// [`Order`] is not in the [`order::Status::Placed`].
    #[display("Only orders with PLACED status can be cancelled.")]
    #[from(ignore)]
    OrderNotPlaced(#[error(not(source))] order::Status),

    /// [`Order`] with the provided ID does not exist or is placed by another
    /// vendor.
    #[display("Order with ID {_0} not found or doesn't belong to you.")]
    #[from(ignore)]
    OrderNotExists(#[error(not(source))] order::Id),
}

impl ExecutionError {
    /// Converts the provided [`order::CancellationError`] of the [`Order`]
    /// into an [`ExecutionError`].
    fn from_cancellation(id: order::Id, e: order::CancellationError) -> Self {
        match e {
            order::CancellationError::NotPlaced(status) => {
                Self::OrderNotPlaced(status)
            }
            order::CancellationError::WindowClosed => {
                Self::CancellationWindowClosed(id)
            }
        }
    }
}

impl Categorize for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::CancellationWindowClosed(_) | Self::OrderNotPlaced(_) => {
                Kind::InvalidState
            }
            Self::Db(_) => Kind::Infrastructure,
            Self::NotVendor(_) => Kind::Forbidden,
            Self::OrderNotExists(_) => Kind::NotFound,
        }
    }
}
