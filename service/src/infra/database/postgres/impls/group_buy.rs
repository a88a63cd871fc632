//! [`GroupBuy`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{group_buy, profile, GroupBuy},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::group_buy::{ActiveIn, ActiveOf, Listing, Recent, TotalCount},
};

use super::product;

/// Builds a [`GroupBuy`] out of the [`group_buy_columns!`] of the provided
/// [`Row`].
pub(super) fn from_row(row: &Row) -> GroupBuy {
    GroupBuy {
        id: row.get("g_id"),
        supplier_id: row.get("g_supplier_id"),
        product_id: row.get("g_product_id"),
        title: row.get("g_title"),
        target_quantity: row.get("g_target_quantity"),
        current_quantity: row.get("g_current_quantity"),
        price_per_unit: row.get("g_price_per_unit"),
        status: row.get("g_status"),
        area_name: row.get("g_area_name"),
        end_date: row.get("g_end_date"),
        created_at: row.get("g_created_at"),
    }
}

/// Builds a [`Listing`] out of the provided [`Row`] containing
/// [`group_buy_columns!`], [`product_columns!`] and `s_full_name`.
fn listing_from_row(row: &Row) -> Listing {
    Listing {
        group_buy: from_row(row),
        product: product::from_row(row),
        supplier_name: row.get("s_full_name"),
    }
}

impl<C> Database<Select<By<Option<GroupBuy>, group_buy::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<GroupBuy>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<GroupBuy>, group_buy::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: group_buy::Id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            group_buy_columns!(),
            " FROM group_buys AS g \
              WHERE g.id = $1::UUID",
        );
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Lock<By<GroupBuy, group_buy::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<GroupBuy, group_buy::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: group_buy::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM group_buys \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Vec<GroupBuy>, ActiveOf>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<GroupBuy>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<GroupBuy>, ActiveOf>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ActiveOf(product_id) = by.into_inner();
        let active = group_buy::Status::Active;

        const SQL: &str = concat!(
            "SELECT ",
            group_buy_columns!(),
            " FROM group_buys AS g \
              WHERE g.product_id = $1::UUID \
                AND g.status = $2::INT2 \
              ORDER BY g.end_date, g.id",
        );
        Ok(self
            .query(SQL, &[&product_id, &active])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<GroupBuy>, Recent>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<GroupBuy>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<GroupBuy>, Recent>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Recent { supplier_id, limit } = by.into_inner();
        let limit = i64::from(limit);

        const SQL: &str = concat!(
            "SELECT ",
            group_buy_columns!(),
            " FROM group_buys AS g \
              WHERE g.supplier_id = $1::UUID \
              ORDER BY g.created_at DESC, g.id \
              LIMIT $2::INT8",
        );
        Ok(self
            .query(SQL, &[&supplier_id, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<TotalCount, profile::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<TotalCount, profile::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let supplier_id: profile::Id = by.into_inner();

        const SQL: &str = "\
            SELECT COUNT(*) AS total \
            FROM group_buys \
            WHERE supplier_id = $1::UUID";
        let total = self
            .query_opt(SQL, &[&supplier_id])
            .await
            .map_err(tracerr::wrap!())?
            .map_or(0, |row| row.get::<_, i64>("total"));
        Ok(u64::try_from(total).unwrap_or_default().into())
    }
}

impl<C> Database<Select<By<Option<Listing>, group_buy::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Listing>, group_buy::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: group_buy::Id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            group_buy_columns!(),
            ", ",
            product_columns!(),
            ", s.full_name AS s_full_name \
              FROM group_buys AS g \
              INNER JOIN products AS p ON p.id = g.product_id \
              LEFT JOIN profiles AS s ON s.id = g.supplier_id \
              WHERE g.id = $1::UUID",
        );
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(listing_from_row))
    }
}

impl<C> Database<Select<By<Vec<Listing>, ActiveIn>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Listing>, ActiveIn>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ActiveIn(area_name) = by.into_inner();
        let active = group_buy::Status::Active;

        const SQL: &str = concat!(
            "SELECT ",
            group_buy_columns!(),
            ", ",
            product_columns!(),
            ", s.full_name AS s_full_name \
              FROM group_buys AS g \
              INNER JOIN products AS p ON p.id = g.product_id \
              LEFT JOIN profiles AS s ON s.id = g.supplier_id \
              WHERE g.area_name = $1::VARCHAR \
                AND g.status = $2::INT2 \
              ORDER BY g.end_date, g.id",
        );
        Ok(self
            .query(SQL, &[&area_name, &active])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(listing_from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Listing>, profile::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Listing>, profile::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let supplier_id: profile::Id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            group_buy_columns!(),
            ", ",
            product_columns!(),
            ", s.full_name AS s_full_name \
              FROM group_buys AS g \
              INNER JOIN products AS p ON p.id = g.product_id \
              LEFT JOIN profiles AS s ON s.id = g.supplier_id \
              WHERE g.supplier_id = $1::UUID \
              ORDER BY g.created_at DESC, g.id",
        );
        Ok(self
            .query(SQL, &[&supplier_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(listing_from_row)
            .collect())
    }
}

impl<C> Database<Insert<GroupBuy>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(group_buy): Insert<GroupBuy>,
    ) -> Result<Self::Ok, Self::Err> {
        let GroupBuy {
            id,
            supplier_id,
            product_id,
            title,
            target_quantity,
            current_quantity,
            price_per_unit,
            status,
            area_name,
            end_date,
            created_at,
        } = group_buy;

        const SQL: &str = "\
            INSERT INTO group_buys (\
                id, supplier_id, product_id, title, \
                target_quantity, current_quantity, price_per_unit, \
                status, area_name, end_date, created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::VARCHAR, \
                $5::NUMERIC, $6::NUMERIC, $7::NUMERIC, \
                $8::INT2, $9::VARCHAR, $10::TIMESTAMPTZ, $11::TIMESTAMPTZ \
            )";
        self.exec(
            SQL,
            &[
                &id,
                &supplier_id,
                &product_id,
                &title,
                &target_quantity,
                &current_quantity,
                &price_per_unit,
                &status,
                &area_name,
                &end_date,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<GroupBuy>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(group_buy): Update<GroupBuy>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            UPDATE group_buys \
            SET title = $2::VARCHAR, \
                target_quantity = $3::NUMERIC, \
                current_quantity = $4::NUMERIC, \
                price_per_unit = $5::NUMERIC, \
                status = $6::INT2, \
                end_date = $7::TIMESTAMPTZ \
            WHERE id = $1::UUID";
        let updated = self
            .exec(
                SQL,
                &[
                    &group_buy.id,
                    &group_buy.title,
                    &group_buy.target_quantity,
                    &group_buy.current_quantity,
                    &group_buy.price_per_unit,
                    &group_buy.status,
                    &group_buy.end_date,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?;
        if updated == 0 {
            return Err(tracerr::new!(database::Error::NotFound));
        }
        Ok(())
    }
}
