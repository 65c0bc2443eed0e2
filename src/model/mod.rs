mod draft;
mod filters;
mod profile;
mod recipe;

pub use draft::{RecipeDraft, ValidDraft, ValidationError};
pub use filters::{
    PrepTimeBucket, RecipeFilters, UnknownBucket, ALL_CATEGORIES, CATEGORIES, CUISINES,
    PREP_TIME_FILTERS,
};
pub use profile::{AuthUser, UserProfile};
pub use recipe::{Recipe, RecipeData, Timestamp};
