//! Postgres [`Database`] implementation.

pub mod client;
pub mod connection;
mod impls;
mod like_pattern;

use deadpool_postgres::Runtime;
use derive_more::{Deref, Display, Error as StdError, From};
use tokio_postgres::{error::SqlState, NoTls};
use tracerr::Traced;

use crate::infra::database;
#[cfg(doc)]
use crate::infra::Database;

pub use refinery::embed_migrations;

pub use self::{
    client::{NonTx, Tx},
    connection::Connection,
    like_pattern::LikePattern,
};

pub use deadpool_postgres::{Config, PoolConfig, Timeouts};

/// Postgres [`Database`] client.
#[derive(Clone, Debug, Deref)]
pub struct Postgres<T = NonTx>(T);

impl Postgres {
    /// Creates a new [`Postgres`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If failed to create a new [`connection::Pool`].
    pub fn new(conf: &Config) -> Result<Self, Traced<database::Error>> {
        let pool = conf
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self(NonTx::from_pool(pool)))
    }
}

/// Postgres database [`Error`].
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// [`Connection`] error.
    #[display("`Connection` error: {_0}")]
    Connection(connection::Error),

    /// Error of creating a new [`connection::Pool`].
    #[display("Failed to create a new `connection::Pool`: {_0}")]
    PoolCreationError(connection::PoolCreationError),

    /// [`connection::Pool`] error.
    #[display("`connection::Pool` error: {_0}")]
    PoolError(connection::PoolError),

    /// [`Tx`] is used after being committed.
    #[display("transaction is already finished")]
    #[from(ignore)]
    TxFinished,
}

impl Error {
    /// Returns the name of the unique constraint violated by this [`Error`],
    /// if any.
    #[must_use]
    pub fn unique_violation(&self) -> Option<&str> {
        match self {
            Self::Connection(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => {
                Some(
                    e.as_db_error()
                        .and_then(|e| e.constraint())
                        .unwrap_or_default(),
                )
            }
            Self::Connection(_)
            | Self::PoolError(_)
            | Self::PoolCreationError(_)
            | Self::TxFinished => None,
        }
    }
}

impl From<Error> for database::Error {
    fn from(e: Error) -> Self {
        if let Some(constraint) = e.unique_violation() {
            return Self::UniqueViolation(constraint.to_owned());
        }
        Self::Postgres(e)
    }
}
