//! [`Order`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Select, Update};
use rust_decimal::Decimal;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{group_buy, order, profile, Order},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::order::{Committed, Detailed, Owned},
};

use super::{group_buy as group_buy_row, product as product_row};

/// Builds an [`Order`] out of the [`order_columns!`] of the provided [`Row`].
fn from_row(row: &Row) -> Order {
    Order {
        id: row.get("o_id"),
        vendor_id: row.get("o_vendor_id"),
        group_buy_id: row.get("o_group_buy_id"),
        quantity: row.get("o_quantity"),
        status: row.get("o_status"),
        created_at: row.get("o_created_at"),
    }
}

impl<C> Database<Select<By<Option<Order>, Owned>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Order>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Order>, Owned>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Owned { id, vendor_id } = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            order_columns!(),
            " FROM orders AS o \
              WHERE o.id = $1::UUID \
                AND o.vendor_id = $2::UUID",
        );
        Ok(self
            .query_opt(SQL, &[&id, &vendor_id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Detailed>, profile::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Detailed>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Detailed>, profile::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let vendor_id: profile::Id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            order_columns!(),
            ", ",
            group_buy_columns!(),
            ", ",
            product_columns!(),
            " FROM orders AS o \
              INNER JOIN group_buys AS g ON g.id = o.group_buy_id \
              INNER JOIN products AS p ON p.id = g.product_id \
              WHERE o.vendor_id = $1::UUID \
              ORDER BY o.created_at DESC, o.id",
        );
        Ok(self
            .query(SQL, &[&vendor_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| Detailed {
                order: from_row(row),
                group_buy: group_buy_row::from_row(row),
                product: product_row::from_row(row),
            })
            .collect())
    }
}

impl<C> Database<Select<By<HashMap<group_buy::Id, group_buy::Quantity>, Committed>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = HashMap<group_buy::Id, group_buy::Quantity>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<HashMap<group_buy::Id, group_buy::Quantity>, Committed>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let Committed(ids) = by.into_inner();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let cancelled = order::Status::Cancelled;

        const SQL: &str = "\
            SELECT group_buy_id, SUM(quantity) AS total \
            FROM orders \
            WHERE group_buy_id = ANY($1::UUID[]) \
              AND status <> $2::INT2 \
            GROUP BY group_buy_id";
        Ok(self
            .query(SQL, &[&ids, &cancelled])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .filter_map(|row| {
                let total = group_buy::Quantity::new(row.get::<_, Decimal>("total"))?;
                Some((row.get("group_buy_id"), total))
            })
            .collect())
    }
}

impl<C> Database<Insert<Order>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(order): Insert<Order>,
    ) -> Result<Self::Ok, Self::Err> {
        let Order {
            id,
            vendor_id,
            group_buy_id,
            quantity,
            status,
            created_at,
        } = order;

        const SQL: &str = "\
            INSERT INTO orders (\
                id, vendor_id, group_buy_id, quantity, status, created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::NUMERIC, $5::INT2, \
                $6::TIMESTAMPTZ \
            )";
        self.exec(
            SQL,
            &[
                &id,
                &vendor_id,
                &group_buy_id,
                &quantity,
                &status,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<Order>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(order): Update<Order>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            UPDATE orders \
            SET quantity = $2::NUMERIC, \
                status = $3::INT2 \
            WHERE id = $1::UUID";
        let updated = self
            .exec(SQL, &[&order.id, &order.quantity, &order.status])
            .await
            .map_err(tracerr::wrap!())?;
        if updated == 0 {
            return Err(tracerr::new!(database::Error::NotFound));
        }
        Ok(())
    }
}
