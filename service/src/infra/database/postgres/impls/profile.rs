//! [`Profile`]-related [`Database`] implementations.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{profile, Profile},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Select<By<Option<Profile>, profile::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Profile>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Profile>, profile::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: profile::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, role, full_name, area_name \
            FROM profiles \
            WHERE id = $1::UUID";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Profile {
                id: row.get("id"),
                role: row.get("role"),
                full_name: row.get("full_name"),
                area_name: row.get("area_name"),
            }))
    }
}
