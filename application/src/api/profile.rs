//! [`Profile`]-related definitions.

use common::Handler as _;
use derive_more::{AsRef, Display, From, Into};
use futures::{future, TryFutureExt as _};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A [`Profile`] of a marketplace participant.
#[derive(Clone, Debug)]
pub struct Profile {
    /// ID of this [`Profile`].
    pub id: Id,

    /// [`domain::Profile`] representing this [`Profile`].
    profile: OnceCell<domain::Profile>,
}

impl From<domain::Profile> for Profile {
    fn from(profile: domain::Profile) -> Self {
        Self {
            id: profile.id.into(),
            profile: OnceCell::new_with(Some(profile)),
        }
    }
}

impl Profile {
    /// Creates a new [`Profile`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Profile`] with the provided ID exists,
    /// otherwise accessing this [`Profile`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            profile: OnceCell::new(),
        }
    }

    /// Returns the [`domain::Profile`] representing this [`Profile`].
    ///
    /// # Errors
    ///
    /// Error if the [`domain::Profile`] doesn't exist.
    async fn profile(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Profile, Error> {
        let id = self.id.into();
        self.profile
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::profile::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|p| {
                        future::ready(p.ok_or_else(|| {
                            ctx.error()(
                                api::query::ProfileError::NotExists.into(),
                            )
                        }))
                    })
            })
            .await
    }
}

/// A `Profile` of a marketplace participant.
#[graphql_object(context = Context)]
impl Profile {
    /// Unique identifier of this `Profile`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Profile.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Role of this `Profile` in the marketplace.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Profile.role",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn role(&self, ctx: &Context) -> Result<Role, Error> {
        Ok(self.profile(ctx).await?.role.into())
    }

    /// Full name of this `Profile`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Profile.fullName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn full_name(
        &self,
        ctx: &Context,
    ) -> Result<Option<FullName>, Error> {
        Ok(self.profile(ctx).await?.full_name.clone().map(Into::into))
    }

    /// Area this `Profile` operates in.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Profile.areaName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn area_name(
        &self,
        ctx: &Context,
    ) -> Result<Option<AreaName>, Error> {
        Ok(self.profile(ctx).await?.area_name.clone().map(Into::into))
    }
}

/// Unique identifier of a `Profile`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::profile::Id)]
#[into(domain::profile::Id)]
#[graphql(name = "ProfileId", transparent)]
pub struct Id(Uuid);

/// Full name of a `Profile`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ProfileFullName",
    with = scalar::Via::<domain::profile::FullName>,
)]
pub struct FullName(domain::profile::FullName);

/// Name of a geographic area (market, district, locality).
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(with = scalar::Via::<domain::profile::AreaName>)]
pub struct AreaName(domain::profile::AreaName);

/// Role of a `Profile`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "ProfileRole")]
pub enum Role {
    /// Street vendor placing orders into group buys.
    Vendor,

    /// Supplier listing products and opening group buys.
    Supplier,
}

impl From<domain::profile::Role> for Role {
    fn from(role: domain::profile::Role) -> Self {
        use domain::profile::Role as R;
        match role {
            R::Vendor => Self::Vendor,
            R::Supplier => Self::Supplier,
        }
    }
}
