//! Service contains the business logic of the MandiNow marketplace: product
//! catalog, group buys with vendor commitments, and reports over them.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod error;
pub mod infra;
pub mod query;
pub mod read;

use derive_more::Debug;

#[cfg(doc)]
use infra::{Database, Llm};

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [JWT] decoding key verifying bearer tokens.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_decoding_key: jsonwebtoken::DecodingKey,

    /// [JWT] validation rules of bearer tokens.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    pub jwt_validation: jsonwebtoken::Validation,
}

impl Config {
    /// Creates a new [`Config`] verifying HS256-signed bearer tokens with the
    /// provided shared `secret`.
    ///
    /// The `aud` claim is checked only if an `audience` is provided.
    #[must_use]
    pub fn hs256(secret: &[u8], audience: Option<&str>) -> Self {
        let mut validation =
            jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::HS256);
        if let Some(aud) = audience {
            validation.set_audience(&[aud]);
        } else {
            validation.validate_aud = false;
        }
        Self {
            jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(secret),
            jwt_validation: validation,
        }
    }
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db, Ai> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// [`Llm`] of this [`Service`].
    llm: Ai,
}

impl<Db, Ai> Service<Db, Ai> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub fn new(config: Config, database: Db, llm: Ai) -> Self {
        Self {
            config,
            database,
            llm,
        }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns [`Llm`] of this [`Service`].
    #[must_use]
    pub fn llm(&self) -> &Ai {
        &self.llm
    }
}
