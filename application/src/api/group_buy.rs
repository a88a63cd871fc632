//! [`GroupBuy`]-related definitions.

use common::{DateTime, Handler as _};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use rust_decimal::Decimal;
use service::{domain, query, read};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A time-bounded pooled purchase of a product in a specific area.
#[derive(Clone, Debug)]
pub struct GroupBuy {
    /// Underlying [`domain::GroupBuy`].
    group_buy: domain::GroupBuy,

    /// [`api::Product`] being pooled.
    product: api::Product,

    /// Full name of the supplier, if it's known.
    supplier_name: OnceCell<Option<domain::profile::FullName>>,
}

impl From<domain::GroupBuy> for GroupBuy {
    fn from(group_buy: domain::GroupBuy) -> Self {
        #[expect(unsafe_code, reason = "`GroupBuy` always has its `Product`")]
        let product =
            unsafe { api::Product::new_unchecked(group_buy.product_id) };
        Self {
            group_buy,
            product,
            supplier_name: OnceCell::new(),
        }
    }
}

impl From<read::group_buy::Listing> for GroupBuy {
    fn from(listing: read::group_buy::Listing) -> Self {
        Self {
            group_buy: listing.group_buy,
            product: listing.product.into(),
            supplier_name: OnceCell::new_with(Some(listing.supplier_name)),
        }
    }
}

impl GroupBuy {
    /// Creates a new [`GroupBuy`] out of the provided [`domain::GroupBuy`]
    /// and its already loaded [`domain::Product`].
    #[must_use]
    pub fn with_product(
        group_buy: domain::GroupBuy,
        product: domain::Product,
    ) -> Self {
        Self {
            group_buy,
            product: product.into(),
            supplier_name: OnceCell::new(),
        }
    }
}

/// A time-bounded pooled purchase of a product in a specific area.
#[graphql_object(context = Context)]
impl GroupBuy {
    /// Unique identifier of this `GroupBuy`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "GroupBuy.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.group_buy.id.into()
    }

    /// Title of this `GroupBuy`.
    pub fn title(&self) -> Option<Title> {
        self.group_buy.title.clone().map(Into::into)
    }

    /// `Product` pooled by this `GroupBuy`.
    pub fn product(&self) -> &api::Product {
        &self.product
    }

    /// Supplier `Profile` running this `GroupBuy`.
    pub fn supplier(&self) -> api::Profile {
        #[expect(unsafe_code, reason = "`GroupBuy` always has its supplier")]
        unsafe {
            api::Profile::new_unchecked(self.group_buy.supplier_id)
        }
    }

    /// Full name of the supplier running this `GroupBuy`, if it's known.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "GroupBuy.supplierName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn supplier_name(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::profile::FullName>, Error> {
        let supplier_id = self.group_buy.supplier_id;
        self.supplier_name
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::profile::ById::by(supplier_id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .map_ok(|p| p.and_then(|p| p.full_name))
            })
            .await
            .map(|name| name.clone().map(Into::into))
    }

    /// Quantity the supplier aims to sell within this `GroupBuy`.
    pub fn target_quantity(&self) -> scalar::Decimal {
        Decimal::from(self.group_buy.target_quantity).into()
    }

    /// Quantity committed by all the live `Order`s of this `GroupBuy`.
    pub fn current_quantity(&self) -> scalar::Decimal {
        Decimal::from(self.group_buy.current_quantity).into()
    }

    /// Indicator whether the committed quantity reached the target one.
    pub fn is_target_reached(&self) -> bool {
        self.group_buy.is_target_reached()
    }

    /// Price of a single unit.
    pub fn price_per_unit(&self) -> scalar::Decimal {
        Decimal::from(self.group_buy.price_per_unit).into()
    }

    /// Status of this `GroupBuy`.
    pub fn status(&self) -> Status {
        self.group_buy.status.into()
    }

    /// Area this `GroupBuy` is offered in.
    pub fn area_name(&self) -> api::profile::AreaName {
        self.group_buy.area_name.clone().into()
    }

    /// `DateTime` when this `GroupBuy` stops accepting `Order`s.
    pub fn end_date(&self) -> DateTime {
        self.group_buy.end_date.coerce()
    }

    /// `DateTime` when this `GroupBuy` was created.
    pub fn created_at(&self) -> DateTime {
        self.group_buy.created_at.coerce()
    }
}

/// Unique identifier of a `GroupBuy`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::group_buy::Id)]
#[into(domain::group_buy::Id)]
#[graphql(name = "GroupBuyId", transparent)]
pub struct Id(Uuid);

/// Title of a `GroupBuy`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "GroupBuyTitle",
    with = scalar::Via::<domain::group_buy::Title>,
)]
pub struct Title(domain::group_buy::Title);

/// Status of a `GroupBuy`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "GroupBuyStatus")]
pub enum Status {
    /// Accepting new `Order`s.
    Active,

    /// Closed successfully.
    Completed,

    /// Called off by the supplier.
    Cancelled,
}

impl From<domain::group_buy::Status> for Status {
    fn from(status: domain::group_buy::Status) -> Self {
        use domain::group_buy::Status as S;
        match status {
            S::Active => Self::Active,
            S::Completed => Self::Completed,
            S::Cancelled => Self::Cancelled,
        }
    }
}

impl From<Status> for domain::group_buy::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Active => Self::Active,
            Status::Completed => Self::Completed,
            Status::Cancelled => Self::Cancelled,
        }
    }
}
