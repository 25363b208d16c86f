//! Product categories.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown category slug.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryError(String);

/// Closed set of listing categories.
///
/// Serialized as kebab-case slugs (`home-garden`, `books-media`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProductCategory {
    Electronics,
    Fashion,
    HomeGarden,
    SportsOutdoors,
    BooksMedia,
    ToysGames,
    Automotive,
    HealthBeauty,
    #[default]
    Other,
}

impl ProductCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 9] = [
        Self::Electronics,
        Self::Fashion,
        Self::HomeGarden,
        Self::SportsOutdoors,
        Self::BooksMedia,
        Self::ToysGames,
        Self::Automotive,
        Self::HealthBeauty,
        Self::Other,
    ];

    /// The slug used in storage and on the command line.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Electronics => "electronics",
            Self::Fashion => "fashion",
            Self::HomeGarden => "home-garden",
            Self::SportsOutdoors => "sports-outdoors",
            Self::BooksMedia => "books-media",
            Self::ToysGames => "toys-games",
            Self::Automotive => "automotive",
            Self::HealthBeauty => "health-beauty",
            Self::Other => "other",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Fashion => "Fashion",
            Self::HomeGarden => "Home & Garden",
            Self::SportsOutdoors => "Sports & Outdoors",
            Self::BooksMedia => "Books & Media",
            Self::ToysGames => "Toys & Games",
            Self::Automotive => "Automotive",
            Self::HealthBeauty => "Health & Beauty",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl std::str::FromStr for ProductCategory {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.slug() == s)
            .ok_or_else(|| CategoryError(s.to_owned()))
    }
}
