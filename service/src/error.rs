//! Error taxonomy of the [`Command`]s and [`Query`]s.
//!
//! [`Command`]: crate::Command
//! [`Query`]: crate::Query

use derive_more::Display;
use tracerr::Traced;

use crate::infra::{database, llm};

/// Category of a failure, telling a caller how it should be reported.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Kind {
    /// Malformed or out-of-range input.
    #[display("INVALID_INPUT")]
    InvalidInput,

    /// Referenced entity is absent or not visible to the caller.
    #[display("NOT_FOUND")]
    NotFound,

    /// Caller is not allowed to perform the operation.
    #[display("FORBIDDEN")]
    Forbidden,

    /// Entity is not in a state allowing the operation.
    #[display("INVALID_STATE")]
    InvalidState,

    /// Vendor has already committed into the group buy.
    #[display("DUPLICATE_COMMITMENT")]
    DuplicateCommitment,

    /// External text generation failed or answered unusably.
    #[display("UPSTREAM_ERROR")]
    Upstream,

    /// Storage or any other internal failure.
    #[display("INFRASTRUCTURE_ERROR")]
    Infrastructure,
}

/// Classification of an error into its [`Kind`].
pub trait Categorize {
    /// Returns the [`Kind`] of this error.
    fn kind(&self) -> Kind;
}

impl<E: Categorize> Categorize for Traced<E> {
    fn kind(&self) -> Kind {
        self.as_ref().kind()
    }
}

impl Categorize for database::Error {
    fn kind(&self) -> Kind {
        Kind::Infrastructure
    }
}

impl Categorize for llm::Error {
    fn kind(&self) -> Kind {
        Kind::Upstream
    }
}
