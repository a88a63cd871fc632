//! [`Handler`] abstractions.

use std::future::Future;

/// Asynchronous executable handler of `Args`.
///
/// Commands, queries, storage operations and outbound calls are all
/// expressed as [`Handler`]s, so any of them may be replaced with another
/// implementation having the same signature.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
