use std::cmp::Ordering;

use crate::model::{Recipe, Timestamp};

/// How a recipe query is ordered and, for prefix search, bounded.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOrder {
    /// Ascending by title, restricted to titles in `[start, end)`
    TitlePrefix { start: String, end: String },
    /// Newest first by creation time
    CreatedDesc,
}

impl QueryOrder {
    /// Builds a prefix range for `prefix`, closed by appending `upper_bound`.
    pub fn title_prefix(prefix: &str, upper_bound: char) -> Self {
        QueryOrder::TitlePrefix {
            start: prefix.to_string(),
            end: format!("{prefix}{upper_bound}"),
        }
    }
}

/// Position marker of the last document of a page.
///
/// The feed treats it as opaque and only hands it back to the store for
/// the next page. Store implementations read its sort keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    recipe_id: String,
    title: String,
    created_at: Option<Timestamp>,
}

impl Cursor {
    pub fn after(recipe: &Recipe) -> Self {
        Cursor {
            recipe_id: recipe.id.clone(),
            title: recipe.data.title.clone(),
            created_at: recipe.created_at,
        }
    }

    pub fn from_parts(
        recipe_id: impl Into<String>,
        title: impl Into<String>,
        created_at: Option<Timestamp>,
    ) -> Self {
        Cursor {
            recipe_id: recipe_id.into(),
            title: title.into(),
            created_at,
        }
    }

    pub fn recipe_id(&self) -> &str {
        &self.recipe_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn created_at(&self) -> Option<Timestamp> {
        self.created_at
    }
}

/// One page request against the `recipes` collection.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeQuery {
    pub order: QueryOrder,
    /// Equality constraint on `category`
    pub category: Option<String>,
    pub start_after: Option<Cursor>,
    pub limit: usize,
}

impl RecipeQuery {
    /// Returns true if `recipe` satisfies the query's filters and range,
    /// ignoring pagination.
    pub fn matches(&self, recipe: &Recipe) -> bool {
        if let Some(category) = &self.category {
            if &recipe.data.category != category {
                return false;
            }
        }
        match &self.order {
            QueryOrder::TitlePrefix { start, end } => {
                let title = recipe.data.title.as_str();
                title >= start.as_str() && title < end.as_str()
            }
            // Documents without the ordered field never appear in an
            // ordered result
            QueryOrder::CreatedDesc => recipe.created_at.is_some(),
        }
    }

    /// Compares two recipes by the query's ordering, with the id as the
    /// tie breaker in the same direction.
    pub fn compare(&self, a: &Recipe, b: &Recipe) -> Ordering {
        match &self.order {
            QueryOrder::TitlePrefix { .. } => a
                .data
                .title
                .cmp(&b.data.title)
                .then_with(|| a.id.cmp(&b.id)),
            QueryOrder::CreatedDesc => b
                .created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id)),
        }
    }

    /// Returns true if `recipe` sorts strictly after the cursor.
    pub fn is_after_cursor(&self, recipe: &Recipe) -> bool {
        let Some(cursor) = &self.start_after else {
            return true;
        };
        let ordering = match &self.order {
            QueryOrder::TitlePrefix { .. } => recipe
                .data
                .title
                .as_str()
                .cmp(cursor.title())
                .then_with(|| recipe.id.as_str().cmp(cursor.recipe_id())),
            QueryOrder::CreatedDesc => cursor
                .created_at()
                .cmp(&recipe.created_at)
                .then_with(|| cursor.recipe_id().cmp(recipe.id.as_str())),
        };
        ordering == Ordering::Greater
    }
}
