use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned point in time, stored in UTC.
pub type Timestamp = DateTime<Utc>;

/// The user-editable content of a recipe.
///
/// This is the payload written to the store. It has no identity of its own;
/// the store assigns one on creation and returns a [`Recipe`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeData {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub cuisine: String,
    /// Preparation time in minutes
    #[serde(default)]
    pub prep_time: u32,
    /// 0.0 to 5.0 by convention, not clamped
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    /// Image URL, empty when the recipe has no picture
    #[serde(default)]
    pub image: String,
    /// Display name of the author at the time of the last save
    #[serde(default)]
    pub author: String,
    /// Owner uid
    #[serde(default)]
    pub user_id: String,
}

/// A recipe document as persisted in the `recipes` collection.
///
/// # Examples
///
/// ```
/// # use recipe_catalog::{Recipe, RecipeData};
/// let recipe: Recipe = serde_json::from_str(r#"{
///     "id": "r1",
///     "title": "Borscht",
///     "prepTime": 90,
///     "userId": "u1"
/// }"#)?;
/// assert_eq!(recipe.data.title, "Borscht");
/// assert!(recipe.is_owned_by("u1"));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Opaque id assigned by the store
    pub id: String,
    #[serde(flatten)]
    pub data: RecipeData,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

impl Recipe {
    pub fn new(id: impl Into<String>, data: RecipeData) -> Self {
        Recipe {
            id: id.into(),
            data,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.data.title
    }

    pub fn prep_time(&self) -> u32 {
        self.data.prep_time
    }

    /// Returns true if `uid` owns this recipe.
    ///
    /// This is a client-side convenience only. The backend's access rules are
    /// what actually gate mutation.
    pub fn is_owned_by(&self, uid: &str) -> bool {
        !uid.is_empty() && self.data.user_id == uid
    }
}
