//! [`Order`]-related definitions.

use common::{DateTime, Handler as _};
use derive_more::{Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use rust_decimal::Decimal;
use service::{domain, query, read};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A vendor's commitment of a quantity into a group buy.
#[derive(Clone, Debug)]
pub struct Order {
    /// Underlying [`domain::Order`].
    order: domain::Order,

    /// [`api::GroupBuy`] this [`Order`] commits into.
    group_buy: OnceCell<api::GroupBuy>,
}

impl From<domain::Order> for Order {
    fn from(order: domain::Order) -> Self {
        Self {
            order,
            group_buy: OnceCell::new(),
        }
    }
}

impl From<read::order::Detailed> for Order {
    fn from(detailed: read::order::Detailed) -> Self {
        let group_buy =
            api::GroupBuy::with_product(detailed.group_buy, detailed.product);
        Self {
            order: detailed.order,
            group_buy: OnceCell::new_with(Some(group_buy)),
        }
    }
}

/// A vendor's commitment of a quantity into a group buy.
#[graphql_object(context = Context)]
impl Order {
    /// Unique identifier of this `Order`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Order.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.order.id.into()
    }

    /// Committed quantity.
    pub fn quantity(&self) -> scalar::Decimal {
        Decimal::from(self.order.quantity).into()
    }

    /// Status of this `Order`.
    pub fn status(&self) -> Status {
        self.order.status.into()
    }

    /// Vendor `Profile` who placed this `Order`.
    pub fn vendor(&self) -> api::Profile {
        #[expect(unsafe_code, reason = "`Order` always has its vendor")]
        unsafe {
            api::Profile::new_unchecked(self.order.vendor_id)
        }
    }

    /// `GroupBuy` this `Order` commits into.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Order.groupBuy",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn group_buy(
        &self,
        ctx: &Context,
    ) -> Result<&api::GroupBuy, Error> {
        let id = self.order.group_buy_id;
        self.group_buy
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::group_buy::FindOne { id })
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .map_ok(Into::into)
            })
            .await
    }

    /// `DateTime` when this `Order` was placed.
    pub fn created_at(&self) -> DateTime {
        self.order.created_at.coerce()
    }

    /// `DateTime` until which this `Order` may be cancelled.
    pub fn cancellable_until(&self) -> DateTime {
        (self.order.created_at + domain::order::CANCELLATION_WINDOW).coerce()
    }
}

/// Unique identifier of an `Order`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::order::Id)]
#[into(domain::order::Id)]
#[graphql(name = "OrderId", transparent)]
pub struct Id(Uuid);

/// Status of an `Order`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "OrderStatus")]
pub enum Status {
    /// Placed and still cancellable.
    Placed,

    /// Cancelled by the vendor.
    Cancelled,

    /// Delivered to the vendor.
    Delivered,
}

impl From<domain::order::Status> for Status {
    fn from(status: domain::order::Status) -> Self {
        use domain::order::Status as S;
        match status {
            S::Placed => Self::Placed,
            S::Cancelled => Self::Cancelled,
            S::Delivered => Self::Delivered,
        }
    }
}
