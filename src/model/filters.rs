use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::Recipe;

/// Category value that means "no category constraint".
pub const ALL_CATEGORIES: &str = "All";

pub const CATEGORIES: &[&str] = &[
    "Dessert",
    "Main",
    "Snack",
    "Breakfast",
    "Vegan",
    "Italian",
    "Mexican",
    "Asian",
];

pub const CUISINES: &[&str] = &[
    "Ukrainian",
    "Italian",
    "Mexican",
    "Asian",
    "French",
    "American",
    "British",
    "Mediterranean",
];

/// Options of the prep-time selector, in display order.
///
/// The first entry carries no bucket and clears the constraint.
pub const PREP_TIME_FILTERS: &[(&str, Option<PrepTimeBucket>)] = &[
    ("All", None),
    ("< 15 min", Some(PrepTimeBucket::Under15)),
    ("< 30 min", Some(PrepTimeBucket::Under30)),
    ("< 1 hr", Some(PrepTimeBucket::Under60)),
    ("> 1 hr", Some(PrepTimeBucket::Over60)),
];

/// A prep-time filter bucket.
///
/// Buckets are identified on the wire by their tokens `<15`, `<30`, `<60`
/// and `>60`. Note that `>60` includes recipes of exactly 60 minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrepTimeBucket {
    #[serde(rename = "<15")]
    Under15,
    #[serde(rename = "<30")]
    Under30,
    #[serde(rename = "<60")]
    Under60,
    #[serde(rename = ">60")]
    Over60,
}

#[derive(Error, Debug, PartialEq)]
#[error("Unknown prep time filter: {0}")]
pub struct UnknownBucket(pub String);

impl PrepTimeBucket {
    pub fn token(&self) -> &'static str {
        match self {
            PrepTimeBucket::Under15 => "<15",
            PrepTimeBucket::Under30 => "<30",
            PrepTimeBucket::Under60 => "<60",
            PrepTimeBucket::Over60 => ">60",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PrepTimeBucket::Under15 => "< 15 min",
            PrepTimeBucket::Under30 => "< 30 min",
            PrepTimeBucket::Under60 => "< 1 hr",
            PrepTimeBucket::Over60 => "> 1 hr",
        }
    }

    /// Parses an optional token, where an empty string means no bucket.
    pub fn from_token(token: &str) -> Result<Option<Self>, UnknownBucket> {
        if token.trim().is_empty() {
            return Ok(None);
        }
        token.parse().map(Some)
    }

    /// Returns true if a recipe with `prep_time` minutes falls in this bucket.
    pub fn matches(&self, prep_time: u32) -> bool {
        match self {
            PrepTimeBucket::Under15 => prep_time < 15,
            PrepTimeBucket::Under30 => prep_time < 30,
            PrepTimeBucket::Under60 => prep_time < 60,
            PrepTimeBucket::Over60 => prep_time >= 60,
        }
    }
}

impl FromStr for PrepTimeBucket {
    type Err = UnknownBucket;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<15" => Ok(PrepTimeBucket::Under15),
            "<30" => Ok(PrepTimeBucket::Under30),
            "<60" => Ok(PrepTimeBucket::Under60),
            ">60" => Ok(PrepTimeBucket::Over60),
            other => Err(UnknownBucket(other.to_string())),
        }
    }
}

impl fmt::Display for PrepTimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Transient filter state of the recipe listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<PrepTimeBucket>,
}

impl RecipeFilters {
    pub fn new(category: Option<String>, prep_time: Option<PrepTimeBucket>) -> Self {
        RecipeFilters {
            category,
            prep_time,
        }
    }

    /// Returns the category to send to the store as an equality constraint.
    ///
    /// `None` when no category is selected, it is blank, or it is the
    /// [`ALL_CATEGORIES`] sentinel.
    pub fn category_constraint(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
    }

    /// Applies the local prep-time predicate. Always true without a bucket.
    pub fn matches_prep_time(&self, recipe: &Recipe) -> bool {
        self.prep_time
            .map(|bucket| bucket.matches(recipe.prep_time()))
            .unwrap_or(true)
    }

    pub fn is_empty(&self) -> bool {
        self.category_constraint().is_none() && self.prep_time.is_none()
    }
}
