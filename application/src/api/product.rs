//! [`Product`]-related definitions.

use std::future;

use common::{DateTime, Handler as _};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A product listed by a supplier.
#[derive(Clone, Debug)]
pub struct Product {
    /// ID of this [`Product`].
    id: Id,

    /// Underlying [`domain::Product`].
    product: OnceCell<domain::Product>,
}

impl From<domain::Product> for Product {
    fn from(product: domain::Product) -> Self {
        Self {
            id: product.id.into(),
            product: OnceCell::new_with(Some(product)),
        }
    }
}

impl Product {
    /// Creates a new [`Product`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Product`] with the provided ID exists,
    /// otherwise accessing this [`Product`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            product: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Product`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Product`] doesn't exist.
    async fn product(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Product, Error> {
        let id = self.id.into();
        self.product
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::product::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|p| {
                        future::ready(p.ok_or_else(|| {
                            ctx.error()(
                                api::query::ProductError::NotExists.into(),
                            )
                        }))
                    })
            })
            .await
    }
}

/// A product listed by a supplier.
#[graphql_object(context = Context)]
impl Product {
    /// Unique identifier of this `Product`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Product.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Supplier `Profile` owning this `Product`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Product.supplier",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn supplier(&self, ctx: &Context) -> Result<api::Profile, Error> {
        let supplier_id = self.product(ctx).await?.supplier_id;

        #[expect(unsafe_code, reason = "`Product` always has its supplier")]
        let supplier = unsafe { api::Profile::new_unchecked(supplier_id) };
        Ok(supplier)
    }

    /// Name of this `Product`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Product.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.product(ctx).await?.name.clone().into())
    }

    /// Description of this `Product`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Product.description",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn description(
        &self,
        ctx: &Context,
    ) -> Result<Option<Description>, Error> {
        Ok(self.product(ctx).await?.description.clone().map(Into::into))
    }

    /// URL of this `Product`'s image.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Product.imageUrl",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn image_url(
        &self,
        ctx: &Context,
    ) -> Result<Option<ImageUrl>, Error> {
        Ok(self.product(ctx).await?.image_url.clone().map(Into::into))
    }

    /// Keywords this `Product` is searched by.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Product.searchKeywords",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn search_keywords(
        &self,
        ctx: &Context,
    ) -> Result<Option<SearchKeywords>, Error> {
        Ok(self
            .product(ctx)
            .await?
            .search_keywords
            .clone()
            .map(Into::into))
    }

    /// `DateTime` when this `Product` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Product.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.product(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `Product` was updated last time, if ever.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Product.updatedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn updated_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(self.product(ctx).await?.updated_at.map(|at| at.coerce()))
    }
}

/// Unique identifier of a `Product`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::product::Id)]
#[into(domain::product::Id)]
#[graphql(name = "ProductId", transparent)]
pub struct Id(Uuid);

/// Name of a `Product`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "ProductName", with = scalar::Via::<domain::product::Name>)]
pub struct Name(domain::product::Name);

/// Description of a `Product`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ProductDescription",
    with = scalar::Via::<domain::product::Description>,
)]
pub struct Description(domain::product::Description);

/// URL of a `Product`'s image.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ProductImageUrl",
    with = scalar::Via::<domain::product::ImageUrl>,
)]
pub struct ImageUrl(domain::product::ImageUrl);

/// Search keywords of a `Product`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ProductSearchKeywords",
    with = scalar::Via::<domain::product::SearchKeywords>,
)]
pub struct SearchKeywords(domain::product::SearchKeywords);
