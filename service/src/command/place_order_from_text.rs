//! [`Command`] for placing an [`Order`] described by a free-form text.

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use itertools::Itertools as _;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{product, profile, Actor, GroupBuy, Order, Product},
    error::{Categorize, Kind},
    infra::{database, Database},
    read::group_buy::ActiveOf,
    Service,
};

use super::{
    parse_order::{self, ParsedOrder},
    place_order, Command, ParseOrder, PlaceOrder,
};

/// [`Command`] for placing an [`Order`] described by a free-form text (for
/// example, "I need 5 kg of onions").
///
/// The text is parsed with the [`ParseOrder`] [`Command`], the mentioned
/// [`Product`] and its active [`GroupBuy`] are resolved, and then the
/// [`PlaceOrder`] [`Command`] is executed.
#[derive(Clone, Debug)]
pub struct PlaceOrderFromText {
    /// [`Actor`] placing the [`Order`].
    pub actor: Actor,

    /// Free-form text describing the [`Order`].
    pub command: String,
}

/// Output of the [`PlaceOrderFromText`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// What has been understood from the text.
    pub parsed: ParsedOrder,

    /// Placed [`Order`].
    pub order: Order,
}

impl<Db, Ai> Command<PlaceOrderFromText> for Service<Db, Ai>
where
    Self: Command<
            ParseOrder,
            Ok = ParsedOrder,
            Err = Traced<parse_order::ExecutionError>,
        > + Command<
            PlaceOrder,
            Ok = Order,
            Err = Traced<place_order::ExecutionError>,
        >,
    Db: Database<
            Select<By<Vec<Product>, product::NameFragment>>,
            Ok = Vec<Product>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<GroupBuy>, ActiveOf>>,
            Ok = Vec<GroupBuy>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: PlaceOrderFromText,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let PlaceOrderFromText { actor, command } = cmd;

        if !actor.is_vendor() {
            return Err(tracerr::new!(E::NotVendor(actor.id)));
        }

        let parsed = self
            .execute(ParseOrder { command })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let name = &parsed.product_name;

        let product = self
            .database()
            .execute(Select(By::new(name.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .into_iter()
            .exactly_one()
            .map_err(|mut found| {
                if found.next().is_some() {
                    E::AmbiguousProduct(name.clone())
                } else {
                    E::ProductNotExists(name.clone())
                }
            })
            .map_err(tracerr::wrap!())?;

        let mut active = self
            .database()
            .execute(Select(By::new(ActiveOf(product.id))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if active.len() > 1 {
            active.retain(|g| Some(&g.area_name) == actor.area_name.as_ref());
        }
        let group_buy = active
            .into_iter()
            .exactly_one()
            .map_err(|_| tracerr::new!(E::GroupBuyNotExists(name.clone())))?;

        let order = self
            .execute(PlaceOrder {
                actor,
                group_buy_id: group_buy.id,
                quantity: parsed.quantity,
            })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            order.id = %order.id,
            product.id = %product.id,
            "order placed from text",
        );

        Ok(Output { parsed, order })
    }
}

/// Error of [`PlaceOrderFromText`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Several [`Product`]s match the parsed name.
    #[display("Product \"{_0}\" is ambiguous, please be more specific.")]
    #[from(ignore)]
    AmbiguousProduct(#[error(not(source))] product::NameFragment),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// No single active [`GroupBuy`] exists for the resolved [`Product`].
    #[display("No active group buy found for \"{_0}\".")]
    #[from(ignore)]
    GroupBuyNotExists(#[error(not(source))] product::NameFragment),

    /// [`Actor`] is not a vendor.
    #[display("`Profile(id: {_0})` is not a vendor")]
    #[from(ignore)]
    NotVendor(#[error(not(source))] profile::Id),

    /// Text cannot be parsed into an order.
    #[display("{_0}")]
    Parse(parse_order::ExecutionError),

    /// [`Order`] cannot be placed.
    #[display("{_0}")]
    Place(place_order::ExecutionError),

    /// No [`Product`] matches the parsed name.
    #[display("Product \"{_0}\" not found.")]
    #[from(ignore)]
    ProductNotExists(#[error(not(source))] product::NameFragment),
}

impl Categorize for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::AmbiguousProduct(_)
            | Self::GroupBuyNotExists(_)
            | Self::ProductNotExists(_) => Kind::NotFound,
            Self::Db(_) => Kind::Infrastructure,
            Self::NotVendor(_) => Kind::Forbidden,
            Self::Parse(e) => e.kind(),
            Self::Place(e) => e.kind(),
        }
    }
}
