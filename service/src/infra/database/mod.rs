//! [`Database`]-related implementations.

#[cfg(feature = "postgres")]
pub mod postgres;

use derive_more::{Display, Error as StdError};

#[cfg(feature = "postgres")]
pub use self::postgres::Postgres;

/// Database operation.
pub use common::Handler as Database;

/// [`Database`] error.
///
/// Storage failures which the business logic reacts on are tagged with their
/// own variants, everything else is carried opaquely.
#[derive(Debug, Display, StdError)]
pub enum Error {
    /// Unique constraint with the provided name is violated.
    #[display("unique constraint `{_0}` is violated")]
    UniqueViolation(#[error(not(source))] String),

    /// Entity to be modified does not exist.
    #[display("entity to be modified does not exist")]
    NotFound,

    #[cfg(feature = "postgres")]
    /// [`Postgres`] error.
    #[display("`Postgres` error: {_0}")]
    Postgres(postgres::Error),
}

impl Error {
    /// Indicates whether this [`Error`] is a violation of a unique
    /// constraint.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }
}
