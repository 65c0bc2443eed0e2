//! The recipe listing's query engine.
//!
//! A [`RecipeFeed`] turns the current search text and filters into a
//! [`RecipeQuery`], fetches one page at a time from a [`DocumentStore`] and
//! merges the pages into an in-memory list.
//!
//! Paging fetches `page_size + 1` documents and uses the extra one only to
//! learn whether another page exists. The prep-time bucket cannot be sent
//! to the store alongside the sort order, so it is applied to each page
//! after truncation. A filtered page can therefore show fewer than
//! `page_size` recipes while later pages still hold matches.
//!
//! Loads are tagged with a generation. Every reset starts a new generation,
//! and a response belonging to an older one is dropped instead of
//! overwriting newer results.

use tracing::{debug, warn};

use crate::config::CatalogConfig;
use crate::model::{Recipe, RecipeFilters};
use crate::store::{Cursor, DocumentStore, QueryOrder, RecipeQuery, StoreError, HIGHEST_CODEPOINT};

mod pager;

pub use pager::PageWindow;

/// Builds the page query for the given listing state.
///
/// Non-blank search text switches to title prefix search; otherwise the
/// newest recipes come first. The prep-time bucket is never part of the
/// query.
pub fn build_query(
    search_text: &str,
    filters: &RecipeFilters,
    cursor: Option<&Cursor>,
    page_size: usize,
    upper_bound: char,
) -> RecipeQuery {
    let search = search_text.trim();
    let order = if search.is_empty() {
        QueryOrder::CreatedDesc
    } else {
        QueryOrder::title_prefix(search, upper_bound)
    };
    RecipeQuery {
        order,
        category: filters.category_constraint().map(String::from),
        start_after: cursor.cloned(),
        limit: page_size + 1,
    }
}

/// One fetched page after truncation and local filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Recipes that passed the prep-time predicate
    pub items: Vec<Recipe>,
    /// Position of the last kept document, before local filtering
    pub cursor: Option<Cursor>,
    pub has_more: bool,
}

impl Page {
    /// Splits a raw `page_size + 1` fetch into a page.
    pub fn from_fetch(mut docs: Vec<Recipe>, page_size: usize, filters: &RecipeFilters) -> Self {
        let has_more = docs.len() > page_size;
        docs.truncate(page_size);
        let cursor = docs.last().map(Cursor::after);
        docs.retain(|recipe| filters.matches_prep_time(recipe));
        Page {
            items: docs,
            cursor,
            has_more,
        }
    }
}

/// A load that has been started but not yet applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    generation: u64,
    reset: bool,
    query: RecipeQuery,
}

impl PageRequest {
    pub fn query(&self) -> &RecipeQuery {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_reset(&self) -> bool {
        self.reset
    }
}

/// Listing state: loaded recipes, cursor and loading flags.
#[derive(Debug, Clone)]
pub struct RecipeFeed {
    page_size: usize,
    upper_bound: char,
    search_text: String,
    filters: RecipeFilters,
    recipes: Vec<Recipe>,
    cursor: Option<Cursor>,
    has_more: bool,
    loading: bool,
    refreshing: bool,
    /// Search text or filters changed since the list was last loaded
    needs_refresh: bool,
    generation: u64,
}

impl RecipeFeed {
    pub fn new(page_size: usize) -> Self {
        RecipeFeed {
            page_size: page_size.max(1),
            upper_bound: HIGHEST_CODEPOINT,
            search_text: String::new(),
            filters: RecipeFilters::default(),
            recipes: Vec::new(),
            cursor: None,
            has_more: true,
            loading: false,
            refreshing: false,
            needs_refresh: false,
            generation: 0,
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        RecipeFeed {
            upper_bound: config.search_upper_bound,
            ..Self::new(config.page_size)
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn filters(&self) -> &RecipeFilters {
        &self.filters
    }

    /// Sets the search text. Takes effect on the next refresh; until then
    /// loads in flight become stale and load-more is refused.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.search_text {
            self.search_text = text;
            self.invalidate();
        }
    }

    /// Sets the filters. Takes effect on the next refresh; until then loads
    /// in flight become stale and load-more is refused.
    pub fn set_filters(&mut self, filters: RecipeFilters) {
        if filters != self.filters {
            self.filters = filters;
            self.invalidate();
        }
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        self.loading = false;
        self.refreshing = false;
        self.needs_refresh = true;
    }

    /// True when the loaded list was built for other search text or filters.
    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts a fresh load from the first page.
    ///
    /// Any load still in flight becomes stale.
    pub fn begin_refresh(&mut self) -> PageRequest {
        self.generation += 1;
        self.refreshing = true;
        self.loading = false;
        PageRequest {
            generation: self.generation,
            reset: true,
            query: build_query(
                &self.search_text,
                &self.filters,
                None,
                self.page_size,
                self.upper_bound,
            ),
        }
    }

    /// Starts loading the page after the cursor.
    ///
    /// Returns `None` when no further page exists, another load is already
    /// running, or the inputs changed and the list awaits a refresh.
    pub fn begin_load_more(&mut self) -> Option<PageRequest> {
        if !self.has_more || self.loading || self.refreshing || self.needs_refresh {
            return None;
        }
        self.loading = true;
        Some(PageRequest {
            generation: self.generation,
            reset: false,
            query: build_query(
                &self.search_text,
                &self.filters,
                self.cursor.as_ref(),
                self.page_size,
                self.upper_bound,
            ),
        })
    }

    /// Applies the store's answer to a request.
    ///
    /// Returns `Ok(false)` if the request was stale and ignored. On a store
    /// error the loading flag is cleared, the list, cursor and `has_more` keep
    /// their last good values, and the error is returned.
    pub fn apply(
        &mut self,
        request: PageRequest,
        result: Result<Vec<Recipe>, StoreError>,
    ) -> Result<bool, StoreError> {
        if request.generation != self.generation {
            debug!(
                stale = request.generation,
                current = self.generation,
                "dropping stale recipe page"
            );
            return Ok(false);
        }
        if request.reset {
            self.refreshing = false;
        } else {
            self.loading = false;
        }

        let docs = result.map_err(|e| {
            warn!("Error loading recipes: {e}");
            e
        })?;
        let page = Page::from_fetch(docs, self.page_size, &self.filters);
        debug!(
            kept = page.items.len(),
            has_more = page.has_more,
            reset = request.reset,
            "applied recipe page"
        );

        if request.reset {
            self.recipes = page.items;
            self.cursor = page.cursor;
            self.needs_refresh = false;
        } else {
            self.recipes.extend(page.items);
            if page.cursor.is_some() {
                self.cursor = page.cursor;
            }
        }
        self.has_more = page.has_more;
        Ok(true)
    }

    /// Reloads the first page.
    pub fn refresh<S: DocumentStore + ?Sized>(&mut self, store: &S) -> Result<(), StoreError> {
        let request = self.begin_refresh();
        let result = store.query_recipes(request.query());
        self.apply(request, result).map(|_| ())
    }

    /// Appends the next page. Returns `Ok(false)` when nothing was loaded.
    pub fn load_more<S: DocumentStore + ?Sized>(&mut self, store: &S) -> Result<bool, StoreError> {
        let Some(request) = self.begin_load_more() else {
            return Ok(false);
        };
        let result = store.query_recipes(request.query());
        self.apply(request, result)
    }

    /// Drops a recipe from the loaded list, e.g. after deleting it.
    pub fn remove_recipe(&mut self, id: &str) -> bool {
        let before = self.recipes.len();
        self.recipes.retain(|recipe| recipe.id != id);
        self.recipes.len() != before
    }

    /// Computes the numbered-page window for the loaded list.
    pub fn page_window(&self, requested_page: usize) -> PageWindow {
        PageWindow::compute(
            self.recipes.len(),
            self.has_more,
            self.page_size,
            requested_page,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PrepTimeBucket, RecipeData};
    use crate::store::MemoryStore;
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn recipe(index: usize, title: &str, category: &str, prep_time: u32) -> Recipe {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Recipe {
            id: format!("r{index:02}"),
            data: RecipeData {
                title: title.to_string(),
                description: String::new(),
                category: category.to_string(),
                cuisine: String::new(),
                prep_time,
                rating: 4.0,
                ingredients: vec!["water".to_string()],
                instructions: vec!["boil".to_string()],
                image: String::new(),
                author: "Cook".to_string(),
                user_id: "u1".to_string(),
            },
            created_at: Some(base + Duration::minutes(index as i64)),
            updated_at: None,
        }
    }

    fn numbered_store(count: usize) -> MemoryStore {
        MemoryStore::with_recipes(
            (0..count).map(|i| recipe(i, &format!("Recipe {i:02}"), "Main", 10)),
        )
    }

    /// Fails every query while `failing` is set.
    struct FlakyStore {
        inner: MemoryStore,
        failing: AtomicBool,
    }

    impl DocumentStore for FlakyStore {
        fn query_recipes(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, StoreError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("offline".to_string()));
            }
            self.inner.query_recipes(query)
        }
        fn get_recipe(&self, id: &str) -> Result<Option<Recipe>, StoreError> {
            self.inner.get_recipe(id)
        }
        fn create_recipe(&self, data: RecipeData) -> Result<Recipe, StoreError> {
            self.inner.create_recipe(data)
        }
        fn update_recipe(&self, id: &str, data: RecipeData) -> Result<Recipe, StoreError> {
            self.inner.update_recipe(id, data)
        }
        fn delete_recipe(&self, id: &str) -> Result<(), StoreError> {
            self.inner.delete_recipe(id)
        }
        fn get_profile(
            &self,
            uid: &str,
        ) -> Result<Option<crate::model::UserProfile>, StoreError> {
            self.inner.get_profile(uid)
        }
        fn set_profile(&self, profile: &crate::model::UserProfile) -> Result<(), StoreError> {
            self.inner.set_profile(profile)
        }
        fn merge_favorites(&self, uid: &str, favorites: &[String]) -> Result<(), StoreError> {
            self.inner.merge_favorites(uid, favorites)
        }
        fn get_ui_config(&self) -> Result<Option<crate::store::UiConfig>, StoreError> {
            self.inner.get_ui_config()
        }
    }

    #[test]
    fn test_build_query_modes() {
        let filters =
            RecipeFilters::new(Some("Dessert".to_string()), Some(PrepTimeBucket::Under15));
        let query = build_query("  Pan ", &filters, None, 12, HIGHEST_CODEPOINT);
        assert_eq!(query.order, QueryOrder::title_prefix("Pan", HIGHEST_CODEPOINT));
        assert_eq!(query.category.as_deref(), Some("Dessert"));
        assert_eq!(query.limit, 13);

        let query = build_query("   ", &RecipeFilters::default(), None, 12, HIGHEST_CODEPOINT);
        assert_eq!(query.order, QueryOrder::CreatedDesc);
        assert_eq!(query.category, None);
    }

    #[test]
    fn test_thirteen_recipes_two_pages() {
        let store = numbered_store(13);
        let mut feed = RecipeFeed::new(12);

        feed.refresh(&store).unwrap();
        assert_eq!(feed.recipes().len(), 12);
        assert!(feed.has_more());

        assert!(feed.load_more(&store).unwrap());
        assert_eq!(feed.recipes().len(), 13);
        assert!(!feed.has_more());

        assert!(!feed.load_more(&store).unwrap());
        assert_eq!(feed.recipes().len(), 13);
    }

    #[test]
    fn test_newest_first_across_pages() {
        let store = numbered_store(30);
        let mut feed = RecipeFeed::new(7);
        feed.refresh(&store).unwrap();
        while feed.load_more(&store).unwrap() {}

        let recipes = feed.recipes();
        assert_eq!(recipes.len(), 30);
        assert!(recipes
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
    }

    #[test]
    fn test_pagination_terminates() {
        for count in [0, 1, 11, 12, 24, 25] {
            let store = numbered_store(count);
            let mut feed = RecipeFeed::new(12);
            feed.refresh(&store).unwrap();

            let mut rounds = 0;
            while feed.load_more(&store).unwrap() {
                rounds += 1;
                assert!(rounds <= count, "load_more did not terminate");
            }
            assert!(!feed.has_more());
            assert_eq!(feed.recipes().len(), count);
        }
    }

    #[test]
    fn test_prefix_search() {
        let store = MemoryStore::with_recipes(vec![
            recipe(0, "Pancakes", "Breakfast", 20),
            recipe(1, "Pan-fried fish", "Main", 25),
            recipe(2, "Omelette", "Breakfast", 10),
            recipe(3, "pancakes (lowercase)", "Breakfast", 20),
        ]);
        let mut feed = RecipeFeed::new(12);
        feed.set_search_text("Pan");
        feed.refresh(&store).unwrap();

        let titles: Vec<_> = feed.recipes().iter().map(|r| r.title()).collect();
        assert_eq!(titles, vec!["Pan-fried fish", "Pancakes"]);
        assert!(feed.recipes().iter().all(|r| r.title().starts_with("Pan")));
    }

    #[test]
    fn test_category_filter() {
        let store = MemoryStore::with_recipes(vec![
            recipe(0, "Cake", "Dessert", 60),
            recipe(1, "Stew", "Main", 90),
        ]);
        let mut feed = RecipeFeed::new(12);
        feed.set_filters(RecipeFilters::new(Some("Dessert".to_string()), None));
        feed.refresh(&store).unwrap();
        assert_eq!(feed.recipes().len(), 1);
        assert_eq!(feed.recipes()[0].title(), "Cake");

        feed.set_filters(RecipeFilters::new(Some("All".to_string()), None));
        feed.refresh(&store).unwrap();
        assert_eq!(feed.recipes().len(), 2);
    }

    #[test]
    fn test_prep_time_filter_applied_locally() {
        let store = MemoryStore::with_recipes(vec![
            recipe(0, "Quick salad", "Main", 10),
            recipe(1, "Roast", "Main", 70),
        ]);
        let mut feed = RecipeFeed::new(12);
        feed.set_filters(RecipeFilters::new(None, Some(PrepTimeBucket::Under15)));
        feed.refresh(&store).unwrap();

        assert_eq!(feed.recipes().len(), 1);
        assert_eq!(feed.recipes()[0].title(), "Quick salad");
    }

    #[test]
    fn test_every_bucket_holds() {
        let store = MemoryStore::with_recipes(
            [5, 14, 15, 29, 30, 59, 60, 61, 120]
                .iter()
                .enumerate()
                .map(|(i, prep)| recipe(i, &format!("R{i}"), "Main", *prep)),
        );
        for bucket in [
            PrepTimeBucket::Under15,
            PrepTimeBucket::Under30,
            PrepTimeBucket::Under60,
            PrepTimeBucket::Over60,
        ] {
            let mut feed = RecipeFeed::new(4);
            feed.set_filters(RecipeFilters::new(None, Some(bucket)));
            feed.refresh(&store).unwrap();
            while feed.load_more(&store).unwrap() {}
            assert!(feed.recipes().iter().all(|r| bucket.matches(r.prep_time())));
        }
    }

    #[test]
    fn test_prep_time_filter_can_underfill_page() {
        // Newest three are slow, the rest quick
        let store = MemoryStore::with_recipes((0..6).map(|i| {
            let prep = if i >= 3 { 90 } else { 5 };
            recipe(i, &format!("R{i}"), "Main", prep)
        }));
        let mut feed = RecipeFeed::new(3);
        feed.set_filters(RecipeFilters::new(None, Some(PrepTimeBucket::Under15)));

        feed.refresh(&store).unwrap();
        assert!(feed.recipes().is_empty());
        assert!(feed.has_more());

        feed.load_more(&store).unwrap();
        assert_eq!(feed.recipes().len(), 3);
        assert!(!feed.has_more());
    }

    #[test]
    fn test_refresh_replaces_list() {
        let store = numbered_store(20);
        let mut feed = RecipeFeed::new(5);
        feed.refresh(&store).unwrap();
        feed.load_more(&store).unwrap();
        assert_eq!(feed.recipes().len(), 10);

        feed.refresh(&store).unwrap();
        assert_eq!(feed.recipes().len(), 5);
        assert_eq!(feed.recipes()[0].id, "r19");
    }

    #[test]
    fn test_failed_load_keeps_last_good_state() {
        let store = FlakyStore {
            inner: numbered_store(20),
            failing: AtomicBool::new(false),
        };
        let mut feed = RecipeFeed::new(12);
        feed.refresh(&store).unwrap();
        let before: Vec<_> = feed.recipes().iter().map(|r| r.id.clone()).collect();

        store.failing.store(true, Ordering::SeqCst);
        assert!(feed.load_more(&store).is_err());
        assert!(!feed.is_loading());
        assert!(feed.has_more());
        let after: Vec<_> = feed.recipes().iter().map(|r| r.id.clone()).collect();
        assert_eq!(before, after);

        assert!(feed.refresh(&store).is_err());
        assert!(!feed.is_refreshing());
        assert_eq!(feed.recipes().len(), 12);

        store.failing.store(false, Ordering::SeqCst);
        assert!(feed.load_more(&store).unwrap());
        assert_eq!(feed.recipes().len(), 20);
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let store = MemoryStore::with_recipes(vec![
            recipe(0, "Pancakes", "Breakfast", 20),
            recipe(1, "Pasta", "Main", 25),
        ]);
        let mut feed = RecipeFeed::new(12);

        feed.set_search_text("Pan");
        let slow = feed.begin_refresh();
        feed.set_search_text("Pas");
        let fast = feed.begin_refresh();

        let fast_result = store.query_recipes(fast.query());
        assert!(feed.apply(fast, fast_result).unwrap());
        let slow_result = store.query_recipes(slow.query());
        assert!(!feed.apply(slow, slow_result).unwrap());

        assert_eq!(feed.recipes().len(), 1);
        assert_eq!(feed.recipes()[0].title(), "Pasta");
    }

    #[test]
    fn test_filter_change_drops_pending_load_more() {
        let store = numbered_store(30);
        let mut feed = RecipeFeed::new(5);
        feed.refresh(&store).unwrap();

        let pending = feed.begin_load_more().unwrap();
        feed.set_filters(RecipeFilters::new(Some("Dessert".to_string()), None));
        assert!(!feed.is_loading());

        let result = store.query_recipes(pending.query());
        assert!(!feed.apply(pending, result).unwrap());
        assert_eq!(feed.recipes().len(), 5);
    }

    #[test]
    fn test_filter_change_requires_refresh_before_load_more() {
        let store = MemoryStore::with_recipes((0..10).map(|i| {
            let prep = if i % 2 == 0 { 10 } else { 90 };
            recipe(i, &format!("R{i}"), "Main", prep)
        }));
        let mut feed = RecipeFeed::new(3);
        feed.refresh(&store).unwrap();
        assert!(feed.has_more());

        feed.set_filters(RecipeFilters::new(None, Some(PrepTimeBucket::Under15)));
        assert!(feed.needs_refresh());
        assert!(!feed.load_more(&store).unwrap());
        assert_eq!(feed.recipes().len(), 3);

        feed.refresh(&store).unwrap();
        assert!(!feed.needs_refresh());
        while feed.load_more(&store).unwrap() {}
        assert_eq!(feed.recipes().len(), 5);
        assert!(feed.recipes().iter().all(|r| r.prep_time() < 15));
    }

    #[test]
    fn test_failed_refresh_after_search_change_keeps_load_more_blocked() {
        let store = FlakyStore {
            inner: numbered_store(20),
            failing: AtomicBool::new(false),
        };
        let mut feed = RecipeFeed::new(5);
        feed.refresh(&store).unwrap();

        feed.set_search_text("Recipe 1");
        store.failing.store(true, Ordering::SeqCst);
        assert!(feed.refresh(&store).is_err());
        store.failing.store(false, Ordering::SeqCst);

        assert!(!feed.load_more(&store).unwrap());
        feed.refresh(&store).unwrap();
        assert!(feed.recipes().iter().all(|r| r.title().starts_with("Recipe 1")));
    }

    #[test]
    fn test_load_more_while_busy_is_noop() {
        let store = numbered_store(30);
        let mut feed = RecipeFeed::new(5);
        feed.refresh(&store).unwrap();

        let pending = feed.begin_load_more().unwrap();
        assert!(feed.is_loading());
        assert!(feed.begin_load_more().is_none());

        let result = store.query_recipes(pending.query());
        feed.apply(pending, result).unwrap();
        assert_eq!(feed.recipes().len(), 10);
    }

    #[test]
    fn test_remove_recipe() {
        let store = numbered_store(3);
        let mut feed = RecipeFeed::new(12);
        feed.refresh(&store).unwrap();

        assert!(feed.remove_recipe("r01"));
        assert!(!feed.remove_recipe("r01"));
        assert_eq!(feed.recipes().len(), 2);
    }

    #[test]
    fn test_page_from_fetch_cursor_ignores_local_filter() {
        let docs = vec![
            recipe(2, "Slow", "Main", 90),
            recipe(1, "Quick", "Main", 5),
            recipe(0, "Slower", "Main", 120),
        ];
        let filters = RecipeFilters::new(None, Some(PrepTimeBucket::Under15));
        let page = Page::from_fetch(docs, 2, &filters);

        assert!(page.has_more);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.cursor.unwrap().recipe_id(), "r01");
    }
}
