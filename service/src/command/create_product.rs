//! [`Command`] for creating a new [`Product`].

use common::{operations::Insert, DateTime};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::profile::Role;
use crate::{
    domain::{product, profile, Actor, Product},
    error::{Categorize, Kind},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Product`].
#[derive(Clone, Debug)]
pub struct CreateProduct {
    /// [`Actor`] creating the [`Product`].
    pub actor: Actor,

    /// [`product::Name`] of the new [`Product`].
    pub name: product::Name,

    /// [`product::Description`] of the new [`Product`].
    pub description: Option<product::Description>,

    /// [`product::ImageUrl`] of the new [`Product`].
    pub image_url: Option<product::ImageUrl>,

    /// [`product::SearchKeywords`] of the new [`Product`].
    pub search_keywords: Option<product::SearchKeywords>,
}

impl<Db, Ai> Command<CreateProduct> for Service<Db, Ai>
where
    Db: Database<Insert<Product>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Product;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateProduct,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateProduct {
            actor,
            name,
            description,
            image_url,
            search_keywords,
        } = cmd;

        if !actor.is_supplier() {
            return Err(tracerr::new!(E::NotSupplier(actor.id)));
        }

        let product = Product {
            id: product::Id::new(),
            supplier_id: actor.id,
            name,
            description,
            image_url,
            search_keywords,
            created_at: DateTime::now().coerce(),
            updated_at: None,
        };

        self.database()
            .execute(Insert(product.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            product.id = %product.id,
            supplier.id = %product.supplier_id,
            "product created",
        );

        Ok(product)
    }
}

/// Error of [`CreateProduct`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Actor`] is not a [`Role::Supplier`].
    #[display("`Profile(id: {_0})` is not a supplier")]
    #[from(ignore)]
    NotSupplier(#[error(not(source))] profile::Id),
}

impl Categorize for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::Db(_) => Kind::Infrastructure,
            Self::NotSupplier(_) => Kind::Forbidden,
        }
    }
}
