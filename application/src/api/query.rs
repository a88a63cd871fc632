//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{
    query::{self, report},
    read, Query as _,
};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Profile` of the currently authenticated participant.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROFILE_NOT_EXISTS` - the authenticated `Profile` doesn't exist
    ///                          anymore.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myProfile",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_profile(ctx: &Context) -> Result<api::Profile, Error> {
        let my_id = ctx.current_session().await?.actor.id;
        ctx.service()
            .execute(query::profile::ById::by(my_id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| ProfileError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists all the `Product`s, newest first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "products",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn products(ctx: &Context) -> Result<Vec<api::Product>, Error> {
        _ = ctx.current_session().await?;

        ctx.service()
            .execute(query::products::All::by(read::product::All))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|products| products.into_iter().map(Into::into).collect())
    }

    /// Lists the `Product`s of the authenticated supplier, newest first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_SUPPLIER` - the authenticated `Profile` is not a supplier.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myProducts",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_products(
        ctx: &Context,
    ) -> Result<Vec<api::Product>, Error> {
        let supplier = ctx.current_supplier().await?;

        ctx.service()
            .execute(query::products::BySupplier::by(supplier.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|products| products.into_iter().map(Into::into).collect())
    }

    /// Returns the `GroupBuy` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_FOUND` - the `GroupBuy` with the specified ID doesn't exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "groupBuy",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn group_buy(
        id: api::group_buy::Id,
        ctx: &Context,
    ) -> Result<api::GroupBuy, Error> {
        _ = ctx.current_session().await?;

        ctx.service()
            .execute(query::group_buy::FindOne { id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists the active `GroupBuy`s offered in the area of the authenticated
    /// `Profile`, soonest ending first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MISSING_AREA` - the authenticated `Profile` has no area set.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "groupBuys",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn group_buys(
        ctx: &Context,
    ) -> Result<Vec<api::GroupBuy>, Error> {
        let area = ctx
            .current_session()
            .await?
            .actor
            .area_name
            .ok_or_else(|| ctx.error()(GroupBuyError::MissingArea.into()))?;

        ctx.service()
            .execute(query::group_buys::ActiveInArea::by(
                read::group_buy::ActiveIn(area),
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|listings| listings.into_iter().map(Into::into).collect())
    }

    /// Lists the active `GroupBuy`s available to the authenticated vendor,
    /// soonest ending first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_VENDOR` - the authenticated `Profile` is not a vendor;
    /// - `INVALID_INPUT` - the vendor has no area set.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "availableGroupBuys",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn available_group_buys(
        ctx: &Context,
    ) -> Result<Vec<api::GroupBuy>, Error> {
        let vendor = ctx.current_vendor().await?;

        ctx.service()
            .execute(report::VendorAvailability {
                vendor_id: vendor.id,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|listings| listings.into_iter().map(Into::into).collect())
    }

    /// Lists the `GroupBuy`s of the authenticated supplier, newest first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_SUPPLIER` - the authenticated `Profile` is not a supplier.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myGroupBuys",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_group_buys(
        ctx: &Context,
    ) -> Result<Vec<api::GroupBuy>, Error> {
        let supplier = ctx.current_supplier().await?;

        ctx.service()
            .execute(query::group_buys::BySupplier::by(supplier.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|listings| listings.into_iter().map(Into::into).collect())
    }

    /// Lists the `Order`s of the authenticated vendor, newest first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_VENDOR` - the authenticated `Profile` is not a vendor.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myOrders",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_orders(ctx: &Context) -> Result<Vec<api::Order>, Error> {
        let vendor = ctx.current_vendor().await?;

        ctx.service()
            .execute(query::orders::ByVendor::by(vendor.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|orders| orders.into_iter().map(Into::into).collect())
    }

    /// Summarizes the `GroupBuy`s of the authenticated supplier.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_SUPPLIER` - the authenticated `Profile` is not a supplier.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "supplierDashboard",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn supplier_dashboard(
        ctx: &Context,
    ) -> Result<api::report::SupplierDashboard, Error> {
        let supplier = ctx.current_supplier().await?;

        ctx.service()
            .execute(report::SupplierDashboard {
                supplier_id: supplier.id,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

impl AsError for query::group_buy::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Error::categorized(self)
    }
}

impl AsError for report::vendor_availability::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Error::categorized(self)
    }
}

define_error! {
    enum GroupBuyError {
        #[code = "MISSING_AREA"]
        #[status = BAD_REQUEST]
        #[message = "User profile is missing area information."]
        MissingArea,
    }
}

define_error! {
    enum ProductError {
        #[code = "PRODUCT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Product` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum ProfileError {
        #[code = "PROFILE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Profile` with the specified ID does not exist"]
        NotExists,
    }
}
