//! [`Command`] for closing a [`GroupBuy`].

use common::operations::{By, Commit, Lock, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::profile::Role;
use crate::{
    domain::{group_buy, profile, Actor, GroupBuy},
    error::{Categorize, Kind},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for moving an own [`GroupBuy`] into a terminal
/// [`group_buy::Status`].
#[derive(Clone, Debug)]
pub struct CloseGroupBuy {
    /// [`Actor`] closing the [`GroupBuy`].
    pub actor: Actor,

    /// ID of the [`GroupBuy`] to close.
    pub group_buy_id: group_buy::Id,

    /// Terminal [`group_buy::Status`] to move the [`GroupBuy`] into.
    pub status: group_buy::Status,
}

impl<Db, Ai> Command<CloseGroupBuy> for Service<Db, Ai>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<GroupBuy, group_buy::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<GroupBuy>, group_buy::Id>>,
            Ok = Option<GroupBuy>,
            Err = Traced<database::Error>,
        > + Database<Update<GroupBuy>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = GroupBuy;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CloseGroupBuy,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CloseGroupBuy {
            actor,
            group_buy_id,
            status,
        } = cmd;

        if !actor.is_supplier() {
            return Err(tracerr::new!(E::NotSupplier(actor.id)));
        }
        if status == group_buy::Status::Active {
            return Err(tracerr::new!(E::NonTerminalStatus(status)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(group_buy_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut group_buy = tx
            .execute(Select(By::<Option<GroupBuy>, _>::new(group_buy_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|g| g.is_owned_by(actor.id))
            .ok_or(E::GroupBuyNotExists(group_buy_id))
            .map_err(tracerr::wrap!())?;

        group_buy
            .close(status)
            .map_err(|current| tracerr::new!(E::GroupBuyNotActive(current)))?;

        tx.execute(Update(group_buy.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            group_buy.id = %group_buy.id,
            status = %group_buy.status,
            "group buy closed",
        );

        Ok(group_buy)
    }
}

/// Error of [`CloseGroupBuy`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`GroupBuy`] is closed already.
    #[display("Group buy is already `{_0}`")]
    #[from(ignore)]
    GroupBuyNotActive(#[error(not(source))] group_buy::Status),

    /// [`GroupBuy`] with the provided ID does not exist or is run by another
    /// supplier.
    #[display("Group buy with ID {_0} not found.")]
    #[from(ignore)]
    GroupBuyNotExists(#[error(not(source))] group_buy::Id),

    /// Requested [`group_buy::Status`] is not a terminal one.
    #[display("Group buy can only be closed as `COMPLETED` or `CANCELLED`, not `{_0}`")]
    #[from(ignore)]
    NonTerminalStatus(#[error(not(source))] group_buy::Status),

    /// [`Actor`] is not a [`Role::Supplier`].
    #[display("`Profile(id: {_0})` is not a supplier")]
    #[from(ignore)]
    NotSupplier(#[error(not(source))] profile::Id),
}

impl Categorize for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::Db(_) => Kind::Infrastructure,
            Self::GroupBuyNotActive(_) => Kind::InvalidState,
            Self::GroupBuyNotExists(_) => Kind::NotFound,
            Self::NonTerminalStatus(_) => Kind::InvalidInput,
            Self::NotSupplier(_) => Kind::Forbidden,
        }
    }
}
