//! [`Product`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::Profile;
use crate::domain::profile;

/// Product listed by a supplier.
#[derive(Clone, Debug)]
pub struct Product {
    /// ID of this [`Product`].
    pub id: Id,

    /// ID of the supplier [`Profile`] owning this [`Product`].
    pub supplier_id: profile::Id,

    /// [`Name`] of this [`Product`].
    pub name: Name,

    /// [`Description`] of this [`Product`].
    pub description: Option<Description>,

    /// [`ImageUrl`] of this [`Product`].
    pub image_url: Option<ImageUrl>,

    /// [`SearchKeywords`] of this [`Product`].
    pub search_keywords: Option<SearchKeywords>,

    /// [`DateTime`] when this [`Product`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Product`] was modified last time.
    pub updated_at: Option<ModificationDateTime>,
}

impl Product {
    /// Indicates whether this [`Product`] is owned by the provided supplier.
    #[must_use]
    pub fn is_owned_by(&self, supplier_id: profile::Id) -> bool {
        self.supplier_id == supplier_id
    }
}

/// ID of a [`Product`].
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

/// Name of a [`Product`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 256
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Free-form description of a [`Product`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        (!text.trim().is_empty() && text.len() <= 4096).then_some(Self(text))
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// URL of a [`Product`] image.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Creates a new [`ImageUrl`] if the given `url` is valid.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        (!url.is_empty()
            && url.len() <= 2048
            && !url.contains(char::is_whitespace))
        .then_some(Self(url))
    }
}

impl FromStr for ImageUrl {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ImageUrl`")
    }
}

/// Comma-separated search keywords of a [`Product`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct SearchKeywords(String);

impl SearchKeywords {
    /// Creates new [`SearchKeywords`] if the given `keywords` are valid.
    #[must_use]
    pub fn new(keywords: impl Into<String>) -> Option<Self> {
        let keywords = keywords.into();
        (!keywords.trim().is_empty() && keywords.len() <= 1024)
            .then_some(Self(keywords))
    }
}

impl FromStr for SearchKeywords {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `SearchKeywords`")
    }
}

/// Case-insensitive fragment of a [`Name`] to look [`Product`]s up by.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct NameFragment(String);

impl NameFragment {
    /// Creates a new [`NameFragment`] out of the given `input`.
    ///
    /// The `input` is trimmed and lowercased. [`None`] is returned if nothing
    /// remains.
    #[must_use]
    pub fn new(input: impl AsRef<str>) -> Option<Self> {
        let fragment = input.as_ref().trim().to_lowercase();
        (!fragment.is_empty()).then_some(Self(fragment))
    }

    /// Indicates whether the provided [`Name`] contains this [`NameFragment`]
    /// ignoring case.
    #[must_use]
    pub fn matches(&self, name: &Name) -> bool {
        name.0.to_lowercase().contains(&self.0)
    }
}

/// [`DateTime`] when a [`Product`] was created.
pub type CreationDateTime = DateTimeOf<(Product, unit::Creation)>;

/// [`DateTime`] when a [`Product`] was modified.
pub type ModificationDateTime = DateTimeOf<(Product, unit::Modification)>;

#[cfg(test)]
mod spec {
    use super::{Name, NameFragment};

    #[test]
    fn name_rejects_blank_and_padded_input() {
        assert!(Name::new("Tomatoes").is_some());
        assert!(Name::new("").is_none());
        assert!(Name::new("  ").is_none());
        assert!(Name::new(" Tomatoes").is_none());
    }

    #[test]
    fn fragment_matches_ignoring_case() {
        let fragment = NameFragment::new("  TOMAT ").expect("non-empty");
        assert_eq!(fragment.as_ref(), "tomat");

        let name = Name::new("Fresh Tomatoes").expect("valid");
        assert!(fragment.matches(&name));
        assert!(!NameFragment::new("onion").expect("ok").matches(&name));

        assert!(NameFragment::new("   ").is_none());
    }
}
