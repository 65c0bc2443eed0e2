//! UniFFI bindings for the mobile shells (iOS, Android).
//!
//! The host app implements [`RecipeBackend`] on top of its backend SDK and
//! drives everything else through a [`FfiCatalog`]. Timestamps cross the
//! boundary as milliseconds since the Unix epoch.

use crate::catalog::{self, CatalogError};
use crate::config::{CatalogConfig, ConfigError};
use crate::feed::RecipeFeed;
use crate::format::{
    format_date as format_date_internal, format_rating as format_rating_internal,
};
use crate::model::{
    AuthUser, PrepTimeBucket, Recipe, RecipeData, RecipeDraft, RecipeFilters, Timestamp,
    UnknownBucket, UserProfile, ValidationError, CATEGORIES, CUISINES, PREP_TIME_FILTERS,
};
use crate::session::{fetch_signin_hero_image, Session};
use crate::store::{
    Cursor, DocumentStore, MemoryStore, QueryOrder, RecipeQuery, StoreError, UiConfig,
};
use camino::Utf8Path;
use chrono::DateTime;
use std::sync::{Arc, Mutex, MutexGuard};

/// FFI-safe error type that wraps all possible errors.
#[derive(Debug, uniffi::Error, thiserror::Error)]
pub enum CatalogFfiError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Not signed in: {message}")]
    NotSignedIn { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Backend error: {message}")]
    Backend { message: String },

    #[error("Config error: {message}")]
    Config { message: String },
}

impl From<StoreError> for CatalogFfiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(message) => CatalogFfiError::NotFound { message },
            StoreError::PermissionDenied(message) => CatalogFfiError::PermissionDenied { message },
            other => CatalogFfiError::Backend {
                message: other.to_string(),
            },
        }
    }
}

impl From<CatalogError> for CatalogFfiError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::NotFound(id) => CatalogFfiError::NotFound {
                message: format!("Recipe not found: {id}"),
            },
            CatalogError::NotOwner(id) => CatalogFfiError::PermissionDenied {
                message: format!("Recipe {id} belongs to another user"),
            },
            CatalogError::NotSignedIn => CatalogFfiError::NotSignedIn {
                message: "Sign in required".to_string(),
            },
            CatalogError::Validation(e) => e.into(),
            CatalogError::Store(e) => e.into(),
        }
    }
}

impl From<ValidationError> for CatalogFfiError {
    fn from(e: ValidationError) -> Self {
        CatalogFfiError::Validation {
            message: e.to_string(),
        }
    }
}

impl From<UnknownBucket> for CatalogFfiError {
    fn from(e: UnknownBucket) -> Self {
        CatalogFfiError::Validation {
            message: e.to_string(),
        }
    }
}

impl From<ConfigError> for CatalogFfiError {
    fn from(e: ConfigError) -> Self {
        CatalogFfiError::Config {
            message: e.to_string(),
        }
    }
}

impl From<uniffi::UnexpectedUniFFICallbackError> for CatalogFfiError {
    fn from(e: uniffi::UnexpectedUniFFICallbackError) -> Self {
        CatalogFfiError::Backend { message: e.reason }
    }
}

fn to_millis(timestamp: Option<Timestamp>) -> Option<i64> {
    timestamp.map(|ts| ts.timestamp_millis())
}

fn from_millis(millis: Option<i64>) -> Option<Timestamp> {
    millis.and_then(DateTime::from_timestamp_millis)
}

/// The editable fields of a recipe.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiRecipeData {
    pub title: String,
    pub description: String,
    pub category: String,
    pub cuisine: String,
    pub prep_time: u32,
    pub rating: f64,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub image: String,
    pub author: String,
    pub user_id: String,
}

impl From<RecipeData> for FfiRecipeData {
    fn from(d: RecipeData) -> Self {
        FfiRecipeData {
            title: d.title,
            description: d.description,
            category: d.category,
            cuisine: d.cuisine,
            prep_time: d.prep_time,
            rating: d.rating,
            ingredients: d.ingredients,
            instructions: d.instructions,
            image: d.image,
            author: d.author,
            user_id: d.user_id,
        }
    }
}

impl From<FfiRecipeData> for RecipeData {
    fn from(d: FfiRecipeData) -> Self {
        RecipeData {
            title: d.title,
            description: d.description,
            category: d.category,
            cuisine: d.cuisine,
            prep_time: d.prep_time,
            rating: d.rating,
            ingredients: d.ingredients,
            instructions: d.instructions,
            image: d.image,
            author: d.author,
            user_id: d.user_id,
        }
    }
}

/// A stored recipe.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiRecipe {
    pub id: String,
    pub data: FfiRecipeData,
    /// Milliseconds since the Unix epoch
    pub created_at_ms: Option<i64>,
    /// Milliseconds since the Unix epoch
    pub updated_at_ms: Option<i64>,
}

impl From<&Recipe> for FfiRecipe {
    fn from(r: &Recipe) -> Self {
        FfiRecipe {
            id: r.id.clone(),
            data: r.data.clone().into(),
            created_at_ms: to_millis(r.created_at),
            updated_at_ms: to_millis(r.updated_at),
        }
    }
}

impl From<FfiRecipe> for Recipe {
    fn from(r: FfiRecipe) -> Self {
        Recipe {
            id: r.id,
            data: r.data.into(),
            created_at: from_millis(r.created_at_ms),
            updated_at: from_millis(r.updated_at_ms),
        }
    }
}

/// Sort keys of the last document of the previous page.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiCursor {
    pub recipe_id: String,
    pub title: String,
    pub created_at_ms: Option<i64>,
}

impl From<&Cursor> for FfiCursor {
    fn from(c: &Cursor) -> Self {
        FfiCursor {
            recipe_id: c.recipe_id().to_string(),
            title: c.title().to_string(),
            created_at_ms: to_millis(c.created_at()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Enum)]
pub enum FfiQueryOrder {
    /// Order by title ascending, titles in `[start, end)`
    TitlePrefix { start: String, end: String },
    /// Order by creation time, newest first
    CreatedDesc,
}

/// A page query the backend must run: order, optional category equality,
/// `startAfter` cursor and limit.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiRecipeQuery {
    pub order: FfiQueryOrder,
    pub category: Option<String>,
    pub start_after: Option<FfiCursor>,
    pub limit: u32,
}

impl From<&RecipeQuery> for FfiRecipeQuery {
    fn from(q: &RecipeQuery) -> Self {
        let order = match &q.order {
            QueryOrder::TitlePrefix { start, end } => FfiQueryOrder::TitlePrefix {
                start: start.clone(),
                end: end.clone(),
            },
            QueryOrder::CreatedDesc => FfiQueryOrder::CreatedDesc,
        };
        FfiRecipeQuery {
            order,
            category: q.category.clone(),
            start_after: q.start_after.as_ref().map(FfiCursor::from),
            limit: u32::try_from(q.limit).unwrap_or(u32::MAX),
        }
    }
}

impl From<FfiRecipeQuery> for RecipeQuery {
    fn from(q: FfiRecipeQuery) -> Self {
        let order = match q.order {
            FfiQueryOrder::TitlePrefix { start, end } => QueryOrder::TitlePrefix { start, end },
            FfiQueryOrder::CreatedDesc => QueryOrder::CreatedDesc,
        };
        RecipeQuery {
            order,
            category: q.category,
            start_after: q.start_after.map(|c| {
                Cursor::from_parts(c.recipe_id, c.title, from_millis(c.created_at_ms))
            }),
            limit: q.limit as usize,
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiUserProfile {
    pub uid: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub favorites: Vec<String>,
    pub created_at_ms: Option<i64>,
}

impl From<UserProfile> for FfiUserProfile {
    fn from(p: UserProfile) -> Self {
        FfiUserProfile {
            uid: p.uid,
            email: p.email,
            first_name: p.first_name,
            last_name: p.last_name,
            favorites: p.favorites,
            created_at_ms: to_millis(p.created_at),
        }
    }
}

impl From<FfiUserProfile> for UserProfile {
    fn from(p: FfiUserProfile) -> Self {
        UserProfile {
            uid: p.uid,
            email: p.email,
            first_name: p.first_name,
            last_name: p.last_name,
            favorites: p.favorites,
            created_at: from_millis(p.created_at_ms),
        }
    }
}

/// Listing filters. `prep_time` is a bucket token (`<15`, `<30`, `<60`,
/// `>60`) or empty.
#[derive(Debug, Clone, Default, PartialEq, uniffi::Record)]
pub struct FfiFilters {
    pub category: Option<String>,
    pub prep_time: Option<String>,
}

impl TryFrom<FfiFilters> for RecipeFilters {
    type Error = UnknownBucket;

    fn try_from(f: FfiFilters) -> Result<Self, Self::Error> {
        let prep_time = match f.prep_time {
            Some(token) => PrepTimeBucket::from_token(&token)?,
            None => None,
        };
        Ok(RecipeFilters::new(f.category, prep_time))
    }
}

/// The recipe editor's form fields, as typed.
#[derive(Debug, Clone, Default, PartialEq, uniffi::Record)]
pub struct FfiRecipeDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub cuisine: String,
    pub prep_time: String,
    pub rating: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub image: String,
}

impl From<FfiRecipeDraft> for RecipeDraft {
    fn from(d: FfiRecipeDraft) -> Self {
        RecipeDraft {
            title: d.title,
            description: d.description,
            category: d.category,
            cuisine: d.cuisine,
            prep_time: d.prep_time,
            rating: d.rating,
            ingredients: d.ingredients,
            instructions: d.instructions,
            image: d.image,
        }
    }
}

impl From<RecipeDraft> for FfiRecipeDraft {
    fn from(d: RecipeDraft) -> Self {
        FfiRecipeDraft {
            title: d.title,
            description: d.description,
            category: d.category,
            cuisine: d.cuisine,
            prep_time: d.prep_time,
            rating: d.rating,
            ingredients: d.ingredients,
            instructions: d.instructions,
            image: d.image,
        }
    }
}

/// The numbered-page view of the listing, with the recipes of the current
/// page.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiPageWindow {
    pub current: u32,
    pub total_pages: u32,
    pub first_page: u32,
    pub last_page: u32,
    /// The listing should call `load_more`
    pub needs_more: bool,
    pub recipes: Vec<FfiRecipe>,
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiPrepTimeOption {
    pub label: String,
    /// Empty for the "All" option
    pub token: String,
}

/// Backend operations implemented by the host app on top of its SDK.
///
/// Implementations block until the SDK call completes.
#[uniffi::export(with_foreign)]
pub trait RecipeBackend: Send + Sync {
    fn query_recipes(&self, query: FfiRecipeQuery) -> Result<Vec<FfiRecipe>, CatalogFfiError>;

    fn get_recipe(&self, id: String) -> Result<Option<FfiRecipe>, CatalogFfiError>;

    /// Creates a recipe with a backend-assigned id and timestamps.
    fn create_recipe(&self, data: FfiRecipeData) -> Result<FfiRecipe, CatalogFfiError>;

    /// Merges into an existing recipe and refreshes its update time.
    fn update_recipe(&self, id: String, data: FfiRecipeData)
        -> Result<FfiRecipe, CatalogFfiError>;

    fn delete_recipe(&self, id: String) -> Result<(), CatalogFfiError>;

    fn get_profile(&self, uid: String) -> Result<Option<FfiUserProfile>, CatalogFfiError>;

    fn set_profile(&self, profile: FfiUserProfile) -> Result<(), CatalogFfiError>;

    /// Writes only the favorites field of the profile.
    fn merge_favorites(&self, uid: String, favorites: Vec<String>)
        -> Result<(), CatalogFfiError>;

    fn signin_hero_url(&self) -> Result<Option<String>, CatalogFfiError>;
}

fn backend_error(e: CatalogFfiError) -> StoreError {
    match e {
        CatalogFfiError::NotFound { message } => StoreError::NotFound(message),
        CatalogFfiError::PermissionDenied { message } => StoreError::PermissionDenied(message),
        other => StoreError::Unavailable(other.to_string()),
    }
}

/// Adapts a host-provided [`RecipeBackend`] to [`DocumentStore`].
struct ForeignStore {
    backend: Arc<dyn RecipeBackend>,
}

impl DocumentStore for ForeignStore {
    fn query_recipes(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, StoreError> {
        let docs = self
            .backend
            .query_recipes(query.into())
            .map_err(backend_error)?;
        Ok(docs.into_iter().map(Recipe::from).collect())
    }

    fn get_recipe(&self, id: &str) -> Result<Option<Recipe>, StoreError> {
        let doc = self
            .backend
            .get_recipe(id.to_string())
            .map_err(backend_error)?;
        Ok(doc.map(Recipe::from))
    }

    fn create_recipe(&self, data: RecipeData) -> Result<Recipe, StoreError> {
        self.backend
            .create_recipe(data.into())
            .map(Recipe::from)
            .map_err(backend_error)
    }

    fn update_recipe(&self, id: &str, data: RecipeData) -> Result<Recipe, StoreError> {
        self.backend
            .update_recipe(id.to_string(), data.into())
            .map(Recipe::from)
            .map_err(backend_error)
    }

    fn delete_recipe(&self, id: &str) -> Result<(), StoreError> {
        self.backend
            .delete_recipe(id.to_string())
            .map_err(backend_error)
    }

    fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, StoreError> {
        let profile = self
            .backend
            .get_profile(uid.to_string())
            .map_err(backend_error)?;
        Ok(profile.map(UserProfile::from))
    }

    fn set_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        self.backend
            .set_profile(profile.clone().into())
            .map_err(backend_error)
    }

    fn merge_favorites(&self, uid: &str, favorites: &[String]) -> Result<(), StoreError> {
        self.backend
            .merge_favorites(uid.to_string(), favorites.to_vec())
            .map_err(backend_error)
    }

    fn get_ui_config(&self) -> Result<Option<UiConfig>, StoreError> {
        let url = self.backend.signin_hero_url().map_err(backend_error)?;
        Ok(Some(UiConfig {
            signin_hero_url: url,
        }))
    }
}

/// Catalog state for one app instance: the listing feed and the session.
///
/// Loads release the feed lock while the backend runs, so a newer search
/// started from another thread wins over a slower older one.
#[derive(uniffi::Object)]
pub struct FfiCatalog {
    store: Arc<dyn DocumentStore>,
    feed: Mutex<RecipeFeed>,
    session: Mutex<Option<Session>>,
}

fn poisoned(what: &str) -> CatalogFfiError {
    CatalogFfiError::Backend {
        message: format!("{what} lock poisoned"),
    }
}

impl FfiCatalog {
    fn with_store(store: Arc<dyn DocumentStore>, config: &CatalogConfig) -> Arc<Self> {
        Arc::new(FfiCatalog {
            store,
            feed: Mutex::new(RecipeFeed::from_config(config)),
            session: Mutex::new(None),
        })
    }

    fn feed(&self) -> Result<MutexGuard<'_, RecipeFeed>, CatalogFfiError> {
        self.feed.lock().map_err(|_| poisoned("feed"))
    }

    fn session(&self) -> Result<MutexGuard<'_, Option<Session>>, CatalogFfiError> {
        self.session.lock().map_err(|_| poisoned("session"))
    }

    fn replace_session(&self, session: Session) -> Result<(), CatalogFfiError> {
        if let Some(previous) = self.session()?.replace(session) {
            previous.sign_out();
        }
        Ok(())
    }

    fn snapshot(feed: &RecipeFeed) -> Vec<FfiRecipe> {
        feed.recipes().iter().map(FfiRecipe::from).collect()
    }
}

fn config_with_page_size(page_size: u32) -> CatalogConfig {
    CatalogConfig {
        page_size: (page_size as usize).max(1),
        ..CatalogConfig::default()
    }
}

#[uniffi::export]
impl FfiCatalog {
    /// Creates a catalog backed by the host's backend.
    #[uniffi::constructor]
    pub fn new(backend: Arc<dyn RecipeBackend>, page_size: u32) -> Arc<Self> {
        let store: Arc<dyn DocumentStore> = Arc::new(ForeignStore { backend });
        Self::with_store(store, &config_with_page_size(page_size))
    }

    /// Creates a catalog over an empty in-memory store.
    #[uniffi::constructor]
    pub fn in_memory(page_size: u32) -> Arc<Self> {
        Self::with_store(Arc::new(MemoryStore::new()), &config_with_page_size(page_size))
    }

    /// Creates an in-memory catalog from a YAML config file, seeded from the
    /// config's `seed_dir` when set.
    #[uniffi::constructor]
    pub fn from_config_file(path: String) -> Result<Arc<Self>, CatalogFfiError> {
        let config = CatalogConfig::from_path(Utf8Path::new(&path))?.with_env_overrides();
        let store = match &config.seed_dir {
            Some(dir) => MemoryStore::from_seed_dir(dir)?,
            None => MemoryStore::new(),
        };
        Ok(Self::with_store(Arc::new(store), &config))
    }

    pub fn sign_in(&self, uid: String, email: Option<String>) -> Result<(), CatalogFfiError> {
        let session = Session::sign_in(self.store.as_ref(), AuthUser::new(uid, email))?;
        self.replace_session(session)
    }

    pub fn sign_in_federated(
        &self,
        uid: String,
        email: Option<String>,
        display_name: Option<String>,
    ) -> Result<(), CatalogFfiError> {
        let user = AuthUser {
            uid,
            email,
            display_name,
        };
        let session = Session::sign_in_federated(self.store.as_ref(), user)?;
        self.replace_session(session)
    }

    pub fn register(
        &self,
        uid: String,
        email: Option<String>,
        first_name: String,
        last_name: String,
    ) -> Result<(), CatalogFfiError> {
        let session = Session::register(
            self.store.as_ref(),
            AuthUser::new(uid, email),
            &first_name,
            &last_name,
        )?;
        self.replace_session(session)
    }

    pub fn sign_out(&self) -> Result<(), CatalogFfiError> {
        if let Some(session) = self.session()?.take() {
            session.sign_out();
        }
        Ok(())
    }

    pub fn is_signed_in(&self) -> bool {
        self.session().map(|s| s.is_some()).unwrap_or(false)
    }

    /// `"First Last"` of the signed-in user, if they have a profile.
    pub fn display_name(&self) -> Option<String> {
        self.session()
            .ok()
            .and_then(|s| s.as_ref().and_then(Session::display_name))
    }

    pub fn set_search_text(&self, text: String) -> Result<(), CatalogFfiError> {
        self.feed()?.set_search_text(text);
        Ok(())
    }

    pub fn set_filters(&self, filters: FfiFilters) -> Result<(), CatalogFfiError> {
        let filters = RecipeFilters::try_from(filters)?;
        self.feed()?.set_filters(filters);
        Ok(())
    }

    /// Reloads the first page and returns the loaded recipes.
    ///
    /// If a newer refresh started meanwhile, the recipes it produced are
    /// returned instead.
    pub fn refresh(&self) -> Result<Vec<FfiRecipe>, CatalogFfiError> {
        let request = self.feed()?.begin_refresh();
        let result = self.store.query_recipes(request.query());
        let mut feed = self.feed()?;
        feed.apply(request, result)?;
        Ok(Self::snapshot(&feed))
    }

    /// Appends the next page, if any, and returns all loaded recipes.
    pub fn load_more(&self) -> Result<Vec<FfiRecipe>, CatalogFfiError> {
        let Some(request) = self.feed()?.begin_load_more() else {
            return Ok(Self::snapshot(&*self.feed()?));
        };
        let result = self.store.query_recipes(request.query());
        let mut feed = self.feed()?;
        feed.apply(request, result)?;
        Ok(Self::snapshot(&feed))
    }

    pub fn recipes(&self) -> Vec<FfiRecipe> {
        self.feed()
            .map(|feed| Self::snapshot(&feed))
            .unwrap_or_default()
    }

    pub fn has_more(&self) -> bool {
        self.feed().map(|feed| feed.has_more()).unwrap_or(false)
    }

    pub fn is_loading(&self) -> bool {
        self.feed()
            .map(|feed| feed.is_loading() || feed.is_refreshing())
            .unwrap_or(false)
    }

    /// Numbered-page view for the requested one-indexed page.
    pub fn page_window(&self, requested_page: u32) -> Result<FfiPageWindow, CatalogFfiError> {
        let feed = self.feed()?;
        let window = feed.page_window(requested_page as usize);
        Ok(FfiPageWindow {
            current: window.current as u32,
            total_pages: window.total_pages as u32,
            first_page: *window.pages.start() as u32,
            last_page: *window.pages.end() as u32,
            needs_more: window.needs_more,
            recipes: window
                .slice(feed.recipes())
                .iter()
                .map(FfiRecipe::from)
                .collect(),
        })
    }

    pub fn load_recipe(&self, id: String) -> Result<FfiRecipe, CatalogFfiError> {
        let recipe = catalog::load_recipe(self.store.as_ref(), &id)?;
        Ok(FfiRecipe::from(&recipe))
    }

    /// Editor state for an existing recipe.
    pub fn edit_draft(&self, id: String) -> Result<FfiRecipeDraft, CatalogFfiError> {
        let recipe = catalog::load_recipe(self.store.as_ref(), &id)?;
        Ok(RecipeDraft::from_recipe(&recipe).into())
    }

    /// Creates a recipe, or updates `existing_id` when given.
    pub fn save_recipe(
        &self,
        draft: FfiRecipeDraft,
        existing_id: Option<String>,
    ) -> Result<FfiRecipe, CatalogFfiError> {
        let session = self.session()?;
        let session = session.as_ref().ok_or(CatalogError::NotSignedIn)?;
        let recipe = catalog::save_recipe(
            self.store.as_ref(),
            session,
            &draft.into(),
            existing_id.as_deref(),
        )?;
        Ok(FfiRecipe::from(&recipe))
    }

    /// Deletes a recipe the signed-in user owns and drops it from the feed.
    pub fn delete_recipe(&self, id: String) -> Result<(), CatalogFfiError> {
        {
            let session = self.session()?;
            let session = session.as_ref().ok_or(CatalogError::NotSignedIn)?;
            let recipe = catalog::load_recipe(self.store.as_ref(), &id)?;
            catalog::delete_recipe(self.store.as_ref(), session, &recipe)?;
        }
        self.feed()?.remove_recipe(&id);
        Ok(())
    }

    pub fn can_edit(&self, recipe: FfiRecipe) -> bool {
        let recipe = Recipe::from(recipe);
        self.session()
            .map(|s| catalog::can_edit(s.as_ref(), &recipe))
            .unwrap_or(false)
    }

    pub fn is_favorite(&self, recipe_id: String) -> bool {
        self.session()
            .map(|s| s.as_ref().is_some_and(|s| s.is_favorite(&recipe_id)))
            .unwrap_or(false)
    }

    /// Flips a favorite and returns the new membership. Does nothing and
    /// returns false when signed out.
    pub fn toggle_favorite(&self, recipe_id: String) -> Result<bool, CatalogFfiError> {
        let mut session = self.session()?;
        match session.as_mut() {
            Some(session) => Ok(session.toggle_favorite(self.store.as_ref(), &recipe_id)?),
            None => Ok(false),
        }
    }

    pub fn favorite_ids(&self) -> Vec<String> {
        self.session()
            .ok()
            .and_then(|s| s.as_ref().map(|s| s.favorites().ids().to_vec()))
            .unwrap_or_default()
    }

    pub fn favorite_recipes(&self) -> Vec<FfiRecipe> {
        self.session()
            .ok()
            .and_then(|s| {
                s.as_ref().map(|s| {
                    s.favorite_recipes(self.store.as_ref())
                        .iter()
                        .map(FfiRecipe::from)
                        .collect()
                })
            })
            .unwrap_or_default()
    }

    pub fn signin_hero_image(&self) -> Option<String> {
        fetch_signin_hero_image(self.store.as_ref())
    }
}

// ============================================================================
// Exported FFI Functions
// ============================================================================

/// Categories offered by the editor and the category filter.
#[uniffi::export]
pub fn categories() -> Vec<String> {
    CATEGORIES.iter().map(|c| c.to_string()).collect()
}

#[uniffi::export]
pub fn cuisines() -> Vec<String> {
    CUISINES.iter().map(|c| c.to_string()).collect()
}

/// Prep-time filter options in display order.
#[uniffi::export]
pub fn prep_time_filters() -> Vec<FfiPrepTimeOption> {
    PREP_TIME_FILTERS
        .iter()
        .map(|(label, bucket)| FfiPrepTimeOption {
            label: label.to_string(),
            token: bucket.map(|b| b.token().to_string()).unwrap_or_default(),
        })
        .collect()
}

/// Formats epoch milliseconds as `M/D/YYYY`, or an empty string.
#[uniffi::export]
pub fn format_date(timestamp_ms: Option<i64>) -> String {
    format_date_internal(from_millis(timestamp_ms).as_ref())
}

#[uniffi::export]
pub fn format_rating(rating: f64) -> String {
    format_rating_internal(rating)
}

/// Returns the library version.
#[uniffi::export]
pub fn library_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
