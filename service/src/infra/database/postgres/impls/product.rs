//! [`Product`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{product, profile, Product},
    infra::{
        database::{
            self,
            postgres::{Connection, LikePattern},
            Postgres,
        },
        Database,
    },
    read,
};

/// Builds a [`Product`] out of the [`product_columns!`] of the provided
/// [`Row`].
pub(super) fn from_row(row: &Row) -> Product {
    Product {
        id: row.get("p_id"),
        supplier_id: row.get("p_supplier_id"),
        name: row.get("p_name"),
        description: row.get("p_description"),
        image_url: row.get("p_image_url"),
        search_keywords: row.get("p_search_keywords"),
        created_at: row.get("p_created_at"),
        updated_at: row.get("p_updated_at"),
    }
}

impl<C, IDs> Database<Select<By<HashMap<product::Id, Product>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[product::Id]>,
{
    type Ok = HashMap<product::Id, Product>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<product::Id, Product>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[product::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        const SQL: &str = concat!(
            "SELECT ",
            product_columns!(),
            " FROM products AS p \
              WHERE p.id = ANY($1::UUID[])",
        );
        Ok(self
            .query(SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| {
                let product = from_row(row);
                (product.id, product)
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Product>, product::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<product::Id, Product>, [product::Id; 1]>>,
        Ok = HashMap<product::Id, Product>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Product>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Product>, product::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Vec<Product>, read::product::All>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Product>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Product>, read::product::All>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = concat!(
            "SELECT ",
            product_columns!(),
            " FROM products AS p \
              ORDER BY p.created_at DESC, p.id",
        );
        Ok(self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Product>, profile::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Product>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Product>, profile::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let supplier_id: profile::Id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            product_columns!(),
            " FROM products AS p \
              WHERE p.supplier_id = $1::UUID \
              ORDER BY p.created_at DESC, p.id",
        );
        Ok(self
            .query(SQL, &[&supplier_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Product>, product::NameFragment>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Product>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Product>, product::NameFragment>>,
    ) -> Result<Self::Ok, Self::Err> {
        let pattern = LikePattern::containing(by.into_inner().as_ref());

        const SQL: &str = concat!(
            "SELECT ",
            product_columns!(),
            " FROM products AS p \
              WHERE p.name ILIKE $1::VARCHAR \
              ORDER BY p.created_at DESC, p.id",
        );
        Ok(self
            .query(SQL, &[&pattern])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Product>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Product>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(product): Insert<Product>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(product)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Product>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(product): Update<Product>,
    ) -> Result<Self::Ok, Self::Err> {
        let Product {
            id,
            supplier_id,
            name,
            description,
            image_url,
            search_keywords,
            created_at,
            updated_at,
        } = product;

        const SQL: &str = "\
            INSERT INTO products (\
                id, supplier_id, name, \
                description, image_url, search_keywords, \
                created_at, updated_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, \
                $4::TEXT, $5::TEXT, $6::TEXT, \
                $7::TIMESTAMPTZ, $8::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                description = EXCLUDED.description, \
                image_url = EXCLUDED.image_url, \
                search_keywords = EXCLUDED.search_keywords, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &id,
                &supplier_id,
                &name,
                &description,
                &image_url,
                &search_keywords,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
