//! [`Database`] implementations.

#![allow(
    clippy::items_after_statements,
    reason = "`const SQL` after statements"
)]
#![allow(clippy::too_many_lines, reason = "SQL-related code a bit verbose")]

/// Selected columns of the `products` table aliased as `p`.
macro_rules! product_columns {
    () => {
        "p.id AS p_id, p.supplier_id AS p_supplier_id, p.name AS p_name, \
         p.description AS p_description, p.image_url AS p_image_url, \
         p.search_keywords AS p_search_keywords, \
         p.created_at AS p_created_at, p.updated_at AS p_updated_at"
    };
}

/// Selected columns of the `group_buys` table aliased as `g`.
macro_rules! group_buy_columns {
    () => {
        "g.id AS g_id, g.supplier_id AS g_supplier_id, \
         g.product_id AS g_product_id, g.title AS g_title, \
         g.target_quantity AS g_target_quantity, \
         g.current_quantity AS g_current_quantity, \
         g.price_per_unit AS g_price_per_unit, g.status AS g_status, \
         g.area_name AS g_area_name, g.end_date AS g_end_date, \
         g.created_at AS g_created_at"
    };
}

/// Selected columns of the `orders` table aliased as `o`.
macro_rules! order_columns {
    () => {
        "o.id AS o_id, o.vendor_id AS o_vendor_id, \
         o.group_buy_id AS o_group_buy_id, o.quantity AS o_quantity, \
         o.status AS o_status, o.created_at AS o_created_at"
    };
}

mod group_buy;
mod order;
mod product;
mod profile;

use async_trait::async_trait;
use common::operations::{Commit, Transact};
use refinery_core::{
    traits::r#async::{AsyncQuery, AsyncTransaction},
    AsyncMigrate, Migration,
};
use tracerr::Traced;

use crate::infra::{database, postgres, Database};

use super::{NonTx, Postgres, Tx};

impl Database<Transact> for Postgres<NonTx> {
    type Ok = Postgres<Tx>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Tx::begin(&self.0)
            .await
            .map(Postgres)
            .map_err(tracerr::wrap!())
    }
}

impl Database<Transact> for Postgres<Tx> {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Postgres<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.commit().await.map_err(tracerr::wrap!())
    }
}

#[async_trait]
impl AsyncTransaction for Postgres {
    type Error = Traced<database::Error>;

    async fn execute(
        &mut self,
        queries: &[&str],
    ) -> Result<usize, Self::Error> {
        let mut conn = self.0.connection().await.map_err(tracerr::wrap!())?;
        AsyncTransaction::execute(&mut **conn, queries)
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}

#[async_trait]
impl AsyncQuery<Vec<Migration>> for Postgres {
    async fn query(
        &mut self,
        query: &str,
    ) -> Result<Vec<Migration>, <Self as AsyncTransaction>::Error> {
        let mut conn = self.0.connection().await.map_err(tracerr::wrap!())?;
        AsyncQuery::query(&mut **conn, query)
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}

impl AsyncMigrate for Postgres {}
