//! [`Command`] for updating an existing [`Product`].

use common::{
    operations::{By, Select, Update},
    DateTime,
};
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

/// [`Command`] for updating descriptive fields of an existing [`Product`].
///
/// Only the provided fields are changed.
#[derive(Clone, Debug)]
pub struct UpdateProduct {
    /// [`Actor`] updating the [`Product`].
    pub actor: Actor,

    /// ID of the [`Product`] to update.
    pub product_id: product::Id,

    /// New [`product::Name`] of the [`Product`].
    pub name: Option<product::Name>,

    /// New [`product::Description`] of the [`Product`].
    pub description: Option<product::Description>,

    /// New [`product::ImageUrl`] of the [`Product`].
    pub image_url: Option<product::ImageUrl>,

    /// New [`product::SearchKeywords`] of the [`Product`].
    pub search_keywords: Option<product::SearchKeywords>,
}

impl<Db, Ai> Command<UpdateProduct> for Service<Db, Ai>
where
    Db: Database<
            Select<By<Option<Product>, product::Id>>,
            Ok = Option<Product>,
            Err = Traced<database::Error>,
        > + Database<Update<Product>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Product;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateProduct,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateProduct {
            actor,
            product_id,
            name,
            description,
            image_url,
            search_keywords,
        } = cmd;

        if !actor.is_supplier() {
            return Err(tracerr::new!(E::NotSupplier(actor.id)));
        }

        let mut product = self
            .database()
            .execute(Select(By::<Option<Product>, _>::new(product_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProductNotExists(product_id))
            .map_err(tracerr::wrap!())?;

        if !product.is_owned_by(actor.id) {
            return Err(tracerr::new!(E::NotProductOwner(product_id)));
        }

        if let Some(name) = name {
            product.name = name;
        }
        if let Some(description) = description {
            product.description = Some(description);
        }
        if let Some(url) = image_url {
            product.image_url = Some(url);
        }
        if let Some(keywords) = search_keywords {
            product.search_keywords = Some(keywords);
        }
        product.updated_at = Some(DateTime::now().coerce());

        self.database()
            .execute(Update(product.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(product.id = %product.id, "product updated");

        Ok(product)
    }
}

/// Error of [`UpdateProduct`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Product`] is owned by another supplier.
    #[display("You cannot update a product you do not own")]
    #[from(ignore)]
    NotProductOwner(#[error(not(source))] product::Id),

    /// [`Actor`] is not a [`Role::Supplier`].
    #[display("`Profile(id: {_0})` is not a supplier")]
    #[from(ignore)]
    NotSupplier(#[error(not(source))] profile::Id),

    /// [`Product`] with the provided ID does not exist.
    #[display("`Product(id: {_0})` does not exist")]
    #[from(ignore)]
    ProductNotExists(#[error(not(source))] product::Id),
}

impl Categorize for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::Db(_) => Kind::Infrastructure,
            Self::NotProductOwner(_) | Self::NotSupplier(_) => Kind::Forbidden,
            Self::ProductNotExists(_) => Kind::NotFound,
        }
    }
}
