//! [`Command`] for placing an [`Order`] into a [`GroupBuy`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::profile::Role;
use crate::{
    domain::{group_buy, order, profile, Actor, GroupBuy, Order},
    error::{Categorize, Kind},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for placing an [`Order`] into a [`GroupBuy`].
///
/// The [`Order`] insertion and the [`GroupBuy`] aggregate update happen in a
/// single transaction, while the [`GroupBuy`] is locked.
#[derive(Clone, Debug)]
pub struct PlaceOrder {
    /// [`Actor`] placing the [`Order`].
    pub actor: Actor,

    /// ID of the [`GroupBuy`] to commit into.
    pub group_buy_id: group_buy::Id,

    /// Quantity to commit.
    pub quantity: Decimal,
}

impl<Db, Ai> Command<PlaceOrder> for Service<Db, Ai>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<GroupBuy>, group_buy::Id>>,
            Ok = Option<GroupBuy>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<GroupBuy, group_buy::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<GroupBuy>, group_buy::Id>>,
            Ok = Option<GroupBuy>,
            Err = Traced<database::Error>,
        > + Database<Insert<Order>, Err = Traced<database::Error>>
        + Database<Update<GroupBuy>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Order;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: PlaceOrder) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let PlaceOrder {
            actor,
            group_buy_id,
            quantity,
        } = cmd;

        if !actor.is_vendor() {
            return Err(tracerr::new!(E::NotVendor(actor.id)));
        }
        let quantity = order::Quantity::new(quantity)
            .ok_or(E::NonPositiveQuantity(quantity))
            .map_err(tracerr::wrap!())?;

        // Fail fast without opening a transaction.
        let group_buy = self
            .database()
            .execute(Select(By::<Option<GroupBuy>, _>::new(group_buy_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::GroupBuyNotExists(group_buy_id))
            .map_err(tracerr::wrap!())?;
        if !group_buy.is_active() {
            return Err(tracerr::new!(E::GroupBuyNotActive(group_buy_id)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Serialize concurrent commitments into the same `GroupBuy`.
        tx.execute(Lock(By::new(group_buy_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut group_buy = tx
            .execute(Select(By::<Option<GroupBuy>, _>::new(group_buy_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::GroupBuyNotExists(group_buy_id))
            .map_err(tracerr::wrap!())?;
        if !group_buy.is_active() {
            return Err(tracerr::new!(E::GroupBuyNotActive(group_buy_id)));
        }
        group_buy
            .commit(quantity)
            .map_err(|_| tracerr::new!(E::QuantityOverflow(group_buy_id)))?;

        let order = Order {
            id: order::Id::new(),
            vendor_id: actor.id,
            group_buy_id,
            quantity,
            status: order::Status::Placed,
            created_at: DateTime::now().coerce(),
        };
        tx.execute(Insert(order.clone()))
            .await
            .map_err(|e| {
                if e.as_ref().is_unique_violation() {
                    tracerr::new!(E::AlreadyCommitted(group_buy_id))
                } else {
                    tracerr::map_from(e)
                }
            })
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
            quantity = %order.quantity,
            current_quantity = %group_buy.current_quantity,
            "order placed",
        );
        if group_buy.is_target_reached() {
            log::debug!(group_buy.id = %group_buy.id, "target quantity reached");
        }

        Ok(order)
    }
}

/// Error of [`PlaceOrder`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Vendor has a live [`Order`] in the [`GroupBuy`] already.
    #[display("You have already placed an order for this group buy.")]
    #[from(ignore)]
    AlreadyCommitted(#[error(not(source))] group_buy::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`GroupBuy`] does not accept [`Order`]s anymore.
    #[display("Group buy is not active")]
    #[from(ignore)]
    GroupBuyNotActive(#[error(not(source))] group_buy::Id),

    /// [`GroupBuy`] with the provided ID does not exist.
    #[display("Group buy with ID {_0} not found.")]
    #[from(ignore)]
    GroupBuyNotExists(#[error(not(source))] group_buy::Id),

    /// Provided quantity is zero or negative.
    #[display("Quantity must be greater than zero.")]
    #[from(ignore)]
    NonPositiveQuantity(#[error(not(source))] Decimal),

    /// [`Actor`] is not a [`Role::Vendor`].
    #[display("`Profile(id: {_0})` is not a vendor")]
    #[from(ignore)]
    NotVendor(#[error(not(source))] profile::Id),

    /// Committed quantity of the [`GroupBuy`] would become unrepresentable.
    #[display("Quantity is too large.")]
    #[from(ignore)]
    QuantityOverflow(#[error(not(source))] group_buy::Id),
}

impl Categorize for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::AlreadyCommitted(_) => Kind::DuplicateCommitment,
            Self::Db(_) => Kind::Infrastructure,
            Self::GroupBuyNotActive(_) => Kind::InvalidState,
            Self::GroupBuyNotExists(_) => Kind::NotFound,
            Self::NonPositiveQuantity(_) | Self::QuantityOverflow(_) => {
                Kind::InvalidInput
            }
            Self::NotVendor(_) => Kind::Forbidden,
        }
    }
}
