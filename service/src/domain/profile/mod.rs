//! [`Profile`] definitions.

pub mod session;

use common::define_kind;
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use self::session::Session;

/// Marketplace participant: either a vendor buying goods or a supplier
/// selling them.
#[derive(Clone, Debug)]
pub struct Profile {
    /// ID of this [`Profile`].
    pub id: Id,

    /// [`Role`] of this [`Profile`].
    pub role: Role,

    /// [`FullName`] of this [`Profile`].
    pub full_name: Option<FullName>,

    /// [`AreaName`] this [`Profile`] operates in.
    pub area_name: Option<AreaName>,
}

/// ID of a [`Profile`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Role of a [`Profile`]."]
    enum Role {
        #[doc = "Street vendor placing orders into group buys."]
        Vendor = 1,

        #[doc = "Supplier listing products and opening group buys."]
        Supplier = 2,
    }
}

/// Full name of a [`Profile`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct FullName(String);

impl FullName {
    /// Creates a new [`FullName`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`FullName`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 256
    }
}

impl FromStr for FullName {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `FullName`")
    }
}

/// Name of a geographic area (market, district, locality).
///
/// Areas are matched by exact textual equality.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct AreaName(String);

impl AreaName {
    /// Creates a new [`AreaName`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`AreaName`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`AreaName`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 256
    }
}

impl FromStr for AreaName {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `AreaName`")
    }
}

/// Authenticated [`Profile`] performing an operation.
#[derive(Clone, Debug)]
pub struct Actor {
    /// ID of the acting [`Profile`].
    pub id: Id,

    /// [`Role`] of the acting [`Profile`].
    pub role: Role,

    /// [`AreaName`] of the acting [`Profile`], if it has one.
    pub area_name: Option<AreaName>,
}

impl Actor {
    /// Indicates whether this [`Actor`] is a [`Role::Vendor`].
    #[must_use]
    pub fn is_vendor(&self) -> bool {
        self.role == Role::Vendor
    }

    /// Indicates whether this [`Actor`] is a [`Role::Supplier`].
    #[must_use]
    pub fn is_supplier(&self) -> bool {
        self.role == Role::Supplier
    }
}

impl From<Profile> for Actor {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            role: profile.role,
            area_name: profile.area_name,
        }
    }
}
