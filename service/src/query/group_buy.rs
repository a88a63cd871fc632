//! [`Query`] collection related to a single [`GroupBuy`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{group_buy, GroupBuy},
    error::{Categorize, Kind},
    infra::{database, Database},
    read::group_buy::Listing,
    Query, Service,
};

/// [`Query`] of a single [`GroupBuy`] [`Listing`], failing if there is none.
#[derive(Clone, Copy, Debug)]
pub struct FindOne {
    /// ID of the [`GroupBuy`] to find.
    pub id: group_buy::Id,
}

impl<Db, Ai> Query<FindOne> for Service<Db, Ai>
where
    Db: Database<
        Select<By<Option<Listing>, group_buy::Id>>,
        Ok = Option<Listing>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Listing;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        FindOne { id }: FindOne,
    ) -> Result<Self::Ok, Self::Err> {
        self.database()
            .execute(Select(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?
            .ok_or_else(|| tracerr::new!(ExecutionError::GroupBuyNotExists(id)))
    }
}

/// Error of [`FindOne`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`GroupBuy`] doesn't exist.
    #[display("Group buy with ID {_0} not found.")]
    #[from(ignore)]
    GroupBuyNotExists(#[error(not(source))] group_buy::Id),
}

impl Categorize for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::Db(_) => Kind::Infrastructure,
            Self::GroupBuyNotExists(_) => Kind::NotFound,
        }
    }
}
