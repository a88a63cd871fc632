//! GraphQL [`Mutation`]s definitions.

use common::DateTime;
use juniper::{graphql_object, GraphQLObject};
use service::{command, Command as _};

use crate::{api, api::scalar, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Lists a new `Product` of the authenticated supplier.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_SUPPLIER` - the authenticated `Profile` is not a supplier.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createProduct",
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_product(
        name: api::product::Name,
        description: Option<api::product::Description>,
        image_url: Option<api::product::ImageUrl>,
        search_keywords: Option<api::product::SearchKeywords>,
        ctx: &Context,
    ) -> Result<ProductResult, Error> {
        let actor = ctx.current_supplier().await?;

        ctx.service()
            .execute(command::CreateProduct {
                actor,
                name: name.into(),
                description: description.map(Into::into),
                image_url: image_url.map(Into::into),
                search_keywords: search_keywords.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|product| ProductResult {
                message: "Product created successfully".into(),
                data: product.into(),
            })
    }

    /// Updates the provided details of the authenticated supplier's
    /// `Product`, leaving the omitted ones intact.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_SUPPLIER` - the authenticated `Profile` is not a supplier;
    /// - `NOT_FOUND` - the `Product` doesn't exist;
    /// - `FORBIDDEN` - the `Product` is owned by another supplier.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateProduct",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_product(
        id: api::product::Id,
        name: Option<api::product::Name>,
        description: Option<api::product::Description>,
        image_url: Option<api::product::ImageUrl>,
        search_keywords: Option<api::product::SearchKeywords>,
        ctx: &Context,
    ) -> Result<ProductResult, Error> {
        let actor = ctx.current_supplier().await?;

        ctx.service()
            .execute(command::UpdateProduct {
                actor,
                product_id: id.into(),
                name: name.map(Into::into),
                description: description.map(Into::into),
                image_url: image_url.map(Into::into),
                search_keywords: search_keywords.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|product| ProductResult {
                message: "Product updated successfully".into(),
                data: product.into(),
            })
    }

    /// Opens a new `GroupBuy` of the authenticated supplier's `Product`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_SUPPLIER` - the authenticated `Profile` is not a supplier;
    /// - `FORBIDDEN` - the `Product` is not owned by the supplier;
    /// - `INVALID_INPUT` - the end date is not in the future, or a quantity
    ///                     or price is negative.
    #[tracing::instrument(
        skip_all,
        fields(
            area_name = %area_name,
            end_date = %end_date.to_rfc3339(),
            gql.name = "createGroupBuy",
            otel.name = Self::SPAN_NAME,
            price_per_unit = %price_per_unit,
            product_id = %product_id,
            target_quantity = ?target_quantity,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn create_group_buy(
        product_id: api::product::Id,
        title: Option<api::group_buy::Title>,
        end_date: DateTime,
        target_quantity: Option<scalar::Decimal>,
        area_name: api::profile::AreaName,
        price_per_unit: scalar::Decimal,
        ctx: &Context,
    ) -> Result<GroupBuyResult, Error> {
        let actor = ctx.current_supplier().await?;

        ctx.service()
            .execute(command::CreateGroupBuy {
                actor,
                product_id: product_id.into(),
                title: title.map(Into::into),
                end_date: end_date.coerce(),
                target_quantity: target_quantity.map(Into::into),
                area_name: area_name.into(),
                price_per_unit: price_per_unit.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|group_buy| GroupBuyResult {
                message: "Group buy created successfully".into(),
                data: group_buy.into(),
            })
    }

    /// Closes the authenticated supplier's `GroupBuy` with the provided
    /// final status.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_SUPPLIER` - the authenticated `Profile` is not a supplier;
    /// - `NOT_FOUND` - the supplier has no such `GroupBuy`;
    /// - `INVALID_STATE` - the `GroupBuy` is not active anymore;
    /// - `INVALID_INPUT` - the provided status is `ACTIVE`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "closeGroupBuy",
            id = %id,
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn close_group_buy(
        id: api::group_buy::Id,
        status: api::group_buy::Status,
        ctx: &Context,
    ) -> Result<GroupBuyResult, Error> {
        let actor = ctx.current_supplier().await?;

        ctx.service()
            .execute(command::CloseGroupBuy {
                actor,
                group_buy_id: id.into(),
                status: status.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|group_buy| GroupBuyResult {
                message: "Group buy closed successfully".into(),
                data: group_buy.into(),
            })
    }

    /// Commits the provided quantity of the authenticated vendor into the
    /// `GroupBuy`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_VENDOR` - the authenticated `Profile` is not a vendor;
    /// - `NOT_FOUND` - the `GroupBuy` doesn't exist or is not active;
    /// - `INVALID_INPUT` - the quantity is not positive;
    /// - `DUPLICATE_COMMITMENT` - the vendor has already committed into the
    ///                            `GroupBuy`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "placeOrder",
            group_buy_id = %group_buy_id,
            otel.name = Self::SPAN_NAME,
            quantity = %quantity,
        ),
    )]
    pub async fn place_order(
        group_buy_id: api::group_buy::Id,
        quantity: scalar::Decimal,
        ctx: &Context,
    ) -> Result<OrderResult, Error> {
        let actor = ctx.current_vendor().await?;

        ctx.service()
            .execute(command::PlaceOrder {
                actor,
                group_buy_id: group_buy_id.into(),
                quantity: quantity.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|order| OrderResult {
                message: "Order placed successfully!".into(),
                data: order.into(),
            })
    }

    /// Places an `Order` of the authenticated vendor described by the
    /// provided free-form text, like "I need 10 kg onions".
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_VENDOR` - the authenticated `Profile` is not a vendor;
    /// - `UPSTREAM_ERROR` - the text couldn't be understood;
    /// - `NOT_FOUND` - no single matching `Product` or active `GroupBuy`;
    /// - `DUPLICATE_COMMITMENT` - the vendor has already committed into the
    ///                            matched `GroupBuy`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "placeOrderFromText",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn place_order_from_text(
        command: String,
        ctx: &Context,
    ) -> Result<TextOrderResult, Error> {
        let actor = ctx.current_vendor().await?;

        ctx.service()
            .execute(command::PlaceOrderFromText { actor, command })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|out| TextOrderResult {
                message: "Order placed successfully!".into(),
                parsed_order: ParsedOrder {
                    product_name: out.parsed.product_name.to_string(),
                    quantity: out.parsed.quantity.into(),
                },
                data: out.order.into(),
            })
    }

    /// Cancels the authenticated vendor's `Order` placed less than 30
    /// minutes ago.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_VENDOR` - the authenticated `Profile` is not a vendor;
    /// - `NOT_FOUND` - the vendor has no such `Order`;
    /// - `INVALID_STATE` - the `Order` is not placed anymore, or the
    ///                     cancellation window has passed.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "cancelOrder",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn cancel_order(
        id: api::order::Id,
        ctx: &Context,
    ) -> Result<OrderResult, Error> {
        let actor = ctx.current_vendor().await?;

        ctx.service()
            .execute(command::CancelOrder {
                actor,
                order_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|order| OrderResult {
                message: "Order cancelled successfully".into(),
                data: order.into(),
            })
    }
}

/// Result of a `Product` mutation.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct ProductResult {
    /// Human-readable outcome.
    pub message: String,

    /// Affected `Product`.
    pub data: api::Product,
}

/// Result of a `GroupBuy` mutation.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct GroupBuyResult {
    /// Human-readable outcome.
    pub message: String,

    /// Affected `GroupBuy`.
    pub data: api::GroupBuy,
}

/// Result of an `Order` mutation.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct OrderResult {
    /// Human-readable outcome.
    pub message: String,

    /// Affected `Order`.
    pub data: api::Order,
}

/// Result of an `Order` placement from free-form text.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct TextOrderResult {
    /// Human-readable outcome.
    pub message: String,

    /// What has been understood from the text.
    pub parsed_order: ParsedOrder,

    /// Placed `Order`.
    pub data: api::Order,
}

/// `Order` intent understood from free-form text.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct ParsedOrder {
    /// Fragment of the `Product` name to look the `Product` up by.
    pub product_name: String,

    /// Quantity to commit.
    pub quantity: scalar::Decimal,
}

impl AsError for command::create_product::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Error::categorized(self)
    }
}

impl AsError for command::update_product::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Error::categorized(self)
    }
}

impl AsError for command::create_group_buy::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Error::categorized(self)
    }
}

impl AsError for command::close_group_buy::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Error::categorized(self)
    }
}

impl AsError for command::place_order::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Error::categorized(self)
    }
}

impl AsError for command::place_order_from_text::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Error::categorized(self)
    }
}

impl AsError for command::cancel_order::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Error::categorized(self)
    }
}
