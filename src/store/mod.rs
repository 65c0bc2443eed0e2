//! Document store abstraction.
//!
//! The app's persistence lives in a backend-as-a-service. This module
//! describes the narrow slice of that backend the catalog relies on: ordered
//! and filtered page queries over the `recipes` collection, single-document
//! reads and writes, and one profile document per user in `users`.
//!
//! [`MemoryStore`] implements the same query semantics in process. It backs
//! the tests and can be seeded from a directory of YAML recipe files.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Recipe, RecipeData, UserProfile};

mod memory;
mod query;

pub use memory::MemoryStore;
pub use query::{Cursor, QueryOrder, RecipeQuery};

/// Highest private-use code point, appended to a search prefix to close the
/// title range.
pub const HIGHEST_CODEPOINT: char = '\u{f8ff}';

/// Errors reported by a document store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Failed to decode document: {0}")]
    Serialization(String),

    #[error("Failed to read seed data: {0}")]
    Io(String),
}

/// The `appConfig/ui` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiConfig {
    #[serde(default)]
    pub signin_hero_url: Option<String>,
}

/// Backend operations used by the catalog.
///
/// Calls are blocking from the caller's point of view. Implementations
/// bridging an asynchronous SDK are expected to wait for completion.
pub trait DocumentStore: Send + Sync {
    /// Runs one page query. At most `query.limit` recipes are returned,
    /// ordered and filtered as the query describes.
    fn query_recipes(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, StoreError>;

    fn get_recipe(&self, id: &str) -> Result<Option<Recipe>, StoreError>;

    /// Creates a recipe. The store assigns the id and both timestamps.
    fn create_recipe(&self, data: RecipeData) -> Result<Recipe, StoreError>;

    /// Merges `data` into an existing recipe and refreshes `updated_at`.
    fn update_recipe(&self, id: &str, data: RecipeData) -> Result<Recipe, StoreError>;

    /// Hard delete. Deleting a missing document succeeds.
    fn delete_recipe(&self, id: &str) -> Result<(), StoreError>;

    fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, StoreError>;

    /// Overwrites the whole profile document of `profile.uid`.
    fn set_profile(&self, profile: &UserProfile) -> Result<(), StoreError>;

    /// Writes the favorites array of `uid`, leaving every other profile
    /// field untouched. Creates the document if it does not exist.
    fn merge_favorites(&self, uid: &str, favorites: &[String]) -> Result<(), StoreError>;

    fn get_ui_config(&self) -> Result<Option<UiConfig>, StoreError>;
}
