use camino::{Utf8Path, Utf8PathBuf};
use chrono::{Duration, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use super::{DocumentStore, RecipeQuery, StoreError, UiConfig};
use crate::model::{Recipe, RecipeData, Timestamp, UserProfile};

#[derive(Debug, Default)]
struct State {
    recipes: HashMap<String, Recipe>,
    profiles: HashMap<String, UserProfile>,
    ui_config: Option<UiConfig>,
    next_id: u64,
    last_timestamp: Option<Timestamp>,
}

impl State {
    /// Wall-clock time, forced to be strictly increasing across writes.
    fn now(&mut self) -> Timestamp {
        let now = Utc::now();
        let timestamp = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(timestamp);
        timestamp
    }

    fn allocate_id(&mut self) -> String {
        loop {
            self.next_id += 1;
            let id = format!("recipe-{:06}", self.next_id);
            if !self.recipes.contains_key(&id) {
                return id;
            }
        }
    }
}

/// A recipe document as written in a seed file.
///
/// The id defaults to the file stem and `createdAt` to the load time.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedDocument {
    #[serde(default)]
    id: Option<String>,
    #[serde(flatten)]
    data: RecipeData,
    #[serde(default)]
    created_at: Option<Timestamp>,
    #[serde(default)]
    updated_at: Option<Timestamp>,
}

/// In-process [`DocumentStore`] with backend query semantics.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `recipes` as given, ids and timestamps included.
    pub fn with_recipes(recipes: impl IntoIterator<Item = Recipe>) -> Self {
        let store = Self::new();
        if let Ok(mut state) = store.state.write() {
            for recipe in recipes {
                state.recipes.insert(recipe.id.clone(), recipe);
            }
        }
        store
    }

    /// Loads every `*.yaml`, `*.yml` and `*.json` file under `dir` as a
    /// recipe. JSON files hold documents exported from the backend.
    ///
    /// Files are loaded in path order, so recipes without a `createdAt`
    /// end up newest-last in path order.
    pub fn from_seed_dir(dir: &Utf8Path) -> Result<Self, StoreError> {
        if !dir.is_dir() {
            return Err(StoreError::Io(format!("Not a directory: {dir}")));
        }
        let store = Self::new();
        let mut paths = Vec::new();
        for ext in ["yaml", "yml", "json"] {
            let pattern = dir.join(format!("**/*.{ext}"));
            let entries =
                glob::glob(pattern.as_str()).map_err(|e| StoreError::Io(e.to_string()))?;
            for entry in entries {
                let path = entry.map_err(|e| StoreError::Io(e.to_string()))?;
                let path = Utf8PathBuf::from_path_buf(path).map_err(|p| {
                    StoreError::Io(format!("Path contains invalid UTF-8: {}", p.display()))
                })?;
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            let recipe = store.load_seed_file(&path)?;
            debug!(id = %recipe.id, path = %path, "seeded recipe");
            store.insert_recipe(recipe)?;
        }
        Ok(store)
    }

    fn load_seed_file(&self, path: &Utf8Path) -> Result<Recipe, StoreError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| StoreError::Io(format!("{path}: {e}")))?;
        let doc: SeedDocument = if path.extension() == Some("json") {
            serde_json::from_str(&content)
                .map_err(|e| StoreError::Serialization(format!("{path}: {e}")))?
        } else {
            serde_yaml::from_str(&content)
                .map_err(|e| StoreError::Serialization(format!("{path}: {e}")))?
        };
        let id = match doc.id {
            Some(id) => id,
            None => path
                .file_stem()
                .map(String::from)
                .ok_or_else(|| StoreError::Io(format!("Failed to get file stem: {path}")))?,
        };
        let created_at = match doc.created_at {
            Some(ts) => ts,
            None => self.write()?.now(),
        };
        Ok(Recipe {
            id,
            data: doc.data,
            created_at: Some(created_at),
            updated_at: doc.updated_at.or(Some(created_at)),
        })
    }

    /// Inserts or replaces a recipe without touching its timestamps.
    pub fn insert_recipe(&self, recipe: Recipe) -> Result<(), StoreError> {
        self.write()?.recipes.insert(recipe.id.clone(), recipe);
        Ok(())
    }

    pub fn set_ui_config(&self, config: UiConfig) -> Result<(), StoreError> {
        self.write()?.ui_config = Some(config);
        Ok(())
    }

    pub fn recipe_count(&self) -> usize {
        self.read().map(|state| state.recipes.len()).unwrap_or(0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl DocumentStore for MemoryStore {
    fn query_recipes(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, StoreError> {
        let state = self.read()?;
        let mut matches: Vec<&Recipe> = state
            .recipes
            .values()
            .filter(|recipe| query.matches(recipe))
            .collect();
        matches.sort_by(|a, b| query.compare(a, b));

        Ok(matches
            .into_iter()
            .filter(|recipe| query.is_after_cursor(recipe))
            .take(query.limit)
            .cloned()
            .collect())
    }

    fn get_recipe(&self, id: &str) -> Result<Option<Recipe>, StoreError> {
        Ok(self.read()?.recipes.get(id).cloned())
    }

    fn create_recipe(&self, data: RecipeData) -> Result<Recipe, StoreError> {
        let mut state = self.write()?;
        let id = state.allocate_id();
        let now = state.now();
        let recipe = Recipe {
            id: id.clone(),
            data,
            created_at: Some(now),
            updated_at: Some(now),
        };
        state.recipes.insert(id, recipe.clone());
        Ok(recipe)
    }

    fn update_recipe(&self, id: &str, data: RecipeData) -> Result<Recipe, StoreError> {
        let mut state = self.write()?;
        let now = state.now();
        let recipe = state
            .recipes
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("recipes/{id}")))?;
        recipe.data = data;
        recipe.updated_at = Some(now);
        Ok(recipe.clone())
    }

    fn delete_recipe(&self, id: &str) -> Result<(), StoreError> {
        self.write()?.recipes.remove(id);
        Ok(())
    }

    fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.read()?.profiles.get(uid).cloned())
    }

    fn set_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        self.write()?
            .profiles
            .insert(profile.uid.clone(), profile.clone());
        Ok(())
    }

    fn merge_favorites(&self, uid: &str, favorites: &[String]) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let profile = state
            .profiles
            .entry(uid.to_string())
            .or_insert_with(|| UserProfile {
                uid: uid.to_string(),
                ..Default::default()
            });
        profile.favorites = favorites.to_vec();
        Ok(())
    }

    fn get_ui_config(&self) -> Result<Option<UiConfig>, StoreError> {
        Ok(self.read()?.ui_config.clone())
    }
}
