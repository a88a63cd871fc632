//! [`Command`] for creating a new [`GroupBuy`].

use common::{
    operations::{By, Insert, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::profile::Role;
use crate::{
    domain::{group_buy, product, profile, Actor, GroupBuy, Product},
    error::{Categorize, Kind},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`GroupBuy`] of a supplier's own
/// [`Product`].
#[derive(Clone, Debug)]
pub struct CreateGroupBuy {
    /// [`Actor`] creating the [`GroupBuy`].
    pub actor: Actor,

    /// ID of the [`Product`] to pool.
    pub product_id: product::Id,

    /// Optional [`group_buy::Title`] of the new [`GroupBuy`].
    pub title: Option<group_buy::Title>,

    /// Moment when the new [`GroupBuy`] stops accepting orders.
    pub end_date: group_buy::EndDateTime,

    /// Quantity the supplier aims to sell, zero if omitted.
    pub target_quantity: Option<Decimal>,

    /// Area the new [`GroupBuy`] is offered in.
    pub area_name: profile::AreaName,

    /// Price of a single unit.
    pub price_per_unit: Decimal,
}

impl<Db, Ai> Command<CreateGroupBuy> for Service<Db, Ai>
where
    Db: Database<
            Select<By<Option<Product>, product::Id>>,
            Ok = Option<Product>,
            Err = Traced<database::Error>,
        > + Database<Insert<GroupBuy>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = GroupBuy;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateGroupBuy,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateGroupBuy {
            actor,
            product_id,
            title,
            end_date,
            target_quantity,
            area_name,
            price_per_unit,
        } = cmd;

        if !actor.is_supplier() {
            return Err(tracerr::new!(E::NotSupplier(actor.id)));
        }

        let product = self
            .database()
            .execute(Select(By::<Option<Product>, _>::new(product_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProductNotExists(product_id))
            .map_err(tracerr::wrap!())?;
        if !product.is_owned_by(actor.id) {
            return Err(tracerr::new!(E::NotProductOwner(product_id)));
        }

        let now = DateTime::now();
        if !end_date.is_after(now) {
            return Err(tracerr::new!(E::EndDateNotInFuture));
        }

        let target = target_quantity.unwrap_or_default();
        let target_quantity = group_buy::Quantity::new(target)
            .ok_or(E::NegativeTargetQuantity(target))
            .map_err(tracerr::wrap!())?;
        let price_per_unit = group_buy::Price::new(price_per_unit)
            .ok_or(E::NegativePrice(price_per_unit))
            .map_err(tracerr::wrap!())?;

        let group_buy = GroupBuy {
            id: group_buy::Id::new(),
            supplier_id: actor.id,
            product_id,
            title,
            target_quantity,
            current_quantity: group_buy::Quantity::ZERO,
            price_per_unit,
            status: group_buy::Status::Active,
            area_name,
            end_date,
            created_at: now.coerce(),
        };

        self.database()
            .execute(Insert(group_buy.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            group_buy.id = %group_buy.id,
            product.id = %group_buy.product_id,
            area = %group_buy.area_name,
            "group buy created",
        );

        Ok(group_buy)
    }
}

/// Error of [`CreateGroupBuy`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Provided end date is not in the future.
    #[display("End date must be in the future.")]
    #[from(ignore)]
    EndDateNotInFuture,

    /// Provided price is negative.
    #[display("Price per unit cannot be negative: {_0}")]
    #[from(ignore)]
    NegativePrice(#[error(not(source))] Decimal),

    /// Provided target quantity is negative.
    #[display("Target quantity cannot be negative: {_0}")]
    #[from(ignore)]
    NegativeTargetQuantity(#[error(not(source))] Decimal),

    /// [`Product`] is owned by another supplier.
    #[display("Cannot create group buy for a product not owned by you.")]
    #[from(ignore)]
    NotProductOwner(#[error(not(source))] product::Id),

    /// [`Actor`] is not a [`Role::Supplier`].
    #[display("`Profile(id: {_0})` is not a supplier")]
    #[from(ignore)]
    NotSupplier(#[error(not(source))] profile::Id),

    /// [`Product`] with the provided ID does not exist.
    #[display("`Product(id: {_0})` does not exist")]
    #[from(ignore)]
    ProductNotExists(#[error(not(source))] product::Id),
}

impl Categorize for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::Db(_) => Kind::Infrastructure,
            Self::EndDateNotInFuture
            | Self::NegativePrice(_)
            | Self::NegativeTargetQuantity(_) => Kind::InvalidInput,
            Self::NotProductOwner(_) | Self::NotSupplier(_) => Kind::Forbidden,
            Self::ProductNotExists(_) => Kind::NotFound,
        }
    }
}
