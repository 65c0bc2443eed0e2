//! Favorite recipes of the signed-in user.
//!
//! Favorites live as an id array on the user's profile document. A toggle
//! reads the stored array, flips membership of one id and writes the whole
//! array back. Concurrent toggles from two devices are last-write-wins.

use tracing::warn;

use crate::model::Recipe;
use crate::store::{DocumentStore, StoreError};

/// Returns `current` with `id` added if absent or removed if present.
///
/// Insertion order of the remaining ids is kept.
pub fn toggled(current: &[String], id: &str) -> Vec<String> {
    if current.iter().any(|fav| fav == id) {
        current.iter().filter(|fav| *fav != id).cloned().collect()
    } else {
        let mut next = current.to_vec();
        next.push(id.to_string());
        next
    }
}

/// In-memory favorite ids for one user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Favorites {
    ids: Vec<String>,
}

impl Favorites {
    pub fn new(ids: Vec<String>) -> Self {
        let mut favorites = Favorites::default();
        for id in ids {
            if !favorites.contains(&id) {
                favorites.ids.push(id);
            }
        }
        favorites
    }

    /// Reads the stored favorites of `uid`. A missing profile is an empty set.
    pub fn load<S: DocumentStore + ?Sized>(store: &S, uid: &str) -> Result<Self, StoreError> {
        let ids = store
            .get_profile(uid)
            .map_err(|e| {
                warn!("Error loading favorites: {e}");
                e
            })?
            .map(|profile| profile.favorites)
            .unwrap_or_default();
        Ok(Favorites::new(ids))
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|fav| fav == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Flips `recipe_id` for `uid` and persists the new set.
    ///
    /// Returns whether the recipe is a favorite afterwards. On failure the
    /// in-memory set is left untouched.
    pub fn toggle<S: DocumentStore + ?Sized>(
        &mut self,
        store: &S,
        uid: &str,
        recipe_id: &str,
    ) -> Result<bool, StoreError> {
        let write = || -> Result<Vec<String>, StoreError> {
            let current = store
                .get_profile(uid)?
                .map(|profile| profile.favorites)
                .unwrap_or_default();
            let next = toggled(&current, recipe_id);
            store.merge_favorites(uid, &next)?;
            Ok(next)
        };
        let next = write().map_err(|e| {
            warn!("Error toggling favorite: {e}");
            e
        })?;
        self.ids = next;
        Ok(self.contains(recipe_id))
    }

    /// Fetches every favorited recipe that still exists.
    ///
    /// Ids whose document is gone are skipped, as are ids whose fetch fails;
    /// failures are logged.
    pub fn recipes<S: DocumentStore + ?Sized>(&self, store: &S) -> Vec<Recipe> {
        self.ids
            .iter()
            .filter_map(|id| match store.get_recipe(id) {
                Ok(recipe) => recipe,
                Err(e) => {
                    warn!("Error loading recipe {id}: {e}");
                    None
                }
            })
            .collect()
    }
}
