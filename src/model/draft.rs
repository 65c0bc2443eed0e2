use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;

use super::{Recipe, RecipeData};

/// Errors raised while validating a [`RecipeDraft`].
///
/// These are always produced before the store is contacted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Please fill in all required fields: {0} is missing")]
    MissingField(&'static str),

    #[error("Add at least one ingredient")]
    NoIngredients,

    #[error("Add at least one instruction")]
    NoInstructions,

    #[error("Invalid prep time: {0}")]
    InvalidPrepTime(String),

    #[error("Invalid rating: {0}")]
    InvalidRating(String),
}

/// The recipe editor's form state.
///
/// Numeric fields are kept as the text the user typed; they are parsed by
/// [`RecipeDraft::validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub cuisine: String,
    pub prep_time: String,
    pub rating: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    /// URL of an already uploaded image, or empty
    pub image: String,
}

/// A draft that passed validation, ready to be stamped with author fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub cuisine: String,
    pub prep_time: u32,
    pub rating: f64,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub image: String,
}

impl ValidDraft {
    pub fn into_data(self, author: String, user_id: String) -> RecipeData {
        RecipeData {
            title: self.title,
            description: self.description,
            category: self.category,
            cuisine: self.cuisine,
            prep_time: self.prep_time,
            rating: self.rating,
            ingredients: self.ingredients,
            instructions: self.instructions,
            image: self.image,
            author,
            user_id,
        }
    }
}

impl RecipeDraft {
    /// Repopulates the editor with an existing recipe for edit mode.
    pub fn from_recipe(recipe: &Recipe) -> Self {
        let data = &recipe.data;
        RecipeDraft {
            title: data.title.clone(),
            description: data.description.clone(),
            category: data.category.clone(),
            cuisine: data.cuisine.clone(),
            prep_time: data.prep_time.to_string(),
            rating: data.rating.to_string(),
            ingredients: data.ingredients.clone(),
            instructions: data.instructions.clone(),
            image: data.image.clone(),
        }
    }

    /// Checks required fields and parses the numeric ones.
    ///
    /// Blank ingredient and instruction rows are dropped; at least one of
    /// each must remain.
    pub fn validate(&self) -> Result<ValidDraft, ValidationError> {
        let required = [
            ("title", &self.title),
            ("description", &self.description),
            ("category", &self.category),
            ("cuisine", &self.cuisine),
            ("prep time", &self.prep_time),
            ("rating", &self.rating),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(ValidationError::MissingField(*name));
        }

        let ingredients = non_blank(&self.ingredients);
        let instructions = non_blank(&self.instructions);
        if ingredients.is_empty() {
            return Err(ValidationError::NoIngredients);
        }
        if instructions.is_empty() {
            return Err(ValidationError::NoInstructions);
        }

        let prep_time = parse_leading_int(&self.prep_time)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| ValidationError::InvalidPrepTime(self.prep_time.clone()))?;
        let rating = parse_leading_float(&self.rating)
            .ok_or_else(|| ValidationError::InvalidRating(self.rating.clone()))?;

        Ok(ValidDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            cuisine: self.cuisine.clone(),
            prep_time,
            rating,
            ingredients,
            instructions,
            image: self.image.clone(),
        })
    }
}

fn non_blank(rows: &[String]) -> Vec<String> {
    rows.iter()
        .filter(|row| !row.trim().is_empty())
        .cloned()
        .collect()
}

/// Parses the leading integer of `input`, ignoring any trailing text.
///
/// `"30 min"` yields 30, `"abc"` yields `None`.
pub(crate) fn parse_leading_int(input: &str) -> Option<i64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^\s*([+-]?\d+)").unwrap());
    re.captures(input)?.get(1)?.as_str().parse().ok()
}

/// Parses the leading decimal number of `input`, ignoring any trailing text.
pub(crate) fn parse_leading_float(input: &str) -> Option<f64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").unwrap()
    });
    let value: f64 = re.captures(input)?.get(1)?.as_str().parse().ok()?;
    value.is_finite().then_some(value)
}
