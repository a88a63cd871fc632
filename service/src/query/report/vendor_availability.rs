//! [`VendorAvailability`] definition.

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::GroupBuy;
use crate::{
    domain::{profile, Profile},
    error::{Categorize, Kind},
    infra::{database, Database},
    read::group_buy::{ActiveIn, Listing},
    Query, Service,
};

/// [`Query`] of the active [`GroupBuy`]s available to a vendor, which are
/// the ones offered in the vendor's area, soonest ending first.
#[derive(Clone, Copy, Debug)]
pub struct VendorAvailability {
    /// ID of the vendor [`Profile`].
    pub vendor_id: profile::Id,
}

impl<Db, Ai> Query<VendorAvailability> for Service<Db, Ai>
where
    Db: Database<
            Select<By<Option<Profile>, profile::Id>>,
            Ok = Option<Profile>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Listing>, ActiveIn>>,
            Ok = Vec<Listing>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Vec<Listing>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        VendorAvailability { vendor_id }: VendorAvailability,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let profile = self
            .database()
            .execute(Select(By::<Option<Profile>, _>::new(vendor_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::ProfileNotExists(vendor_id)))?;
        let area = profile
            .area_name
            .ok_or_else(|| tracerr::new!(E::MissingArea(vendor_id)))?;

        self.database()
            .execute(Select(By::new(ActiveIn(area))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`VendorAvailability`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Vendor [`Profile`] has no area set.
    #[display("Vendor profile or area not found.")]
    #[from(ignore)]
    MissingArea(#[error(not(source))] profile::Id),

    /// Vendor [`Profile`] doesn't exist.
    #[display("`Profile(id: {_0})` doesn't exist")]
    #[from(ignore)]
    ProfileNotExists(#[error(not(source))] profile::Id),
}

impl Categorize for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::Db(_) => Kind::Infrastructure,
            Self::MissingArea(_) => Kind::InvalidInput,
            Self::ProfileNotExists(_) => Kind::NotFound,
        }
    }
}
