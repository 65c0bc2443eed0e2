//! Signed-in user state.
//!
//! A [`Session`] exists from sign-in until sign-out and is handed to
//! whatever needs the current user: favorites, recipe ownership, author
//! names. Signing out consumes it, dropping the profile and favorites with
//! it.

use chrono::Utc;
use tracing::{info, warn};

use crate::favorites::Favorites;
use crate::model::{AuthUser, Recipe, UserProfile};
use crate::store::{DocumentStore, StoreError};

/// Author name stored when the user has no profile.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

#[derive(Debug, Clone)]
pub struct Session {
    user: AuthUser,
    profile: Option<UserProfile>,
    favorites: Favorites,
}

impl Session {
    /// Starts a session for an already authenticated user.
    ///
    /// Loads the profile when one exists; favorites come from it.
    pub fn sign_in<S: DocumentStore + ?Sized>(
        store: &S,
        user: AuthUser,
    ) -> Result<Self, StoreError> {
        let profile = store.get_profile(&user.uid)?;
        info!(uid = %user.uid, has_profile = profile.is_some(), "signed in");
        Ok(Self::with_profile(user, profile))
    }

    /// Starts a session after federated sign-in, creating the profile from
    /// the provider's display name on first use.
    pub fn sign_in_federated<S: DocumentStore + ?Sized>(
        store: &S,
        user: AuthUser,
    ) -> Result<Self, StoreError> {
        let profile = match store.get_profile(&user.uid)? {
            Some(profile) => profile,
            None => {
                let profile = UserProfile::from_display_name(&user, Utc::now());
                store.set_profile(&profile)?;
                info!(uid = %user.uid, "created profile from display name");
                profile
            }
        };
        Ok(Self::with_profile(user, Some(profile)))
    }

    /// Writes the profile of a freshly registered account and signs in.
    pub fn register<S: DocumentStore + ?Sized>(
        store: &S,
        user: AuthUser,
        first_name: &str,
        last_name: &str,
    ) -> Result<Self, StoreError> {
        let profile = UserProfile {
            uid: user.uid.clone(),
            email: user.email.clone().unwrap_or_default(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            favorites: Vec::new(),
            created_at: Some(Utc::now()),
        };
        store.set_profile(&profile)?;
        info!(uid = %user.uid, "registered");
        Ok(Self::with_profile(user, Some(profile)))
    }

    fn with_profile(user: AuthUser, profile: Option<UserProfile>) -> Self {
        let favorites = profile
            .as_ref()
            .map(|p| Favorites::new(p.favorites.clone()))
            .unwrap_or_default();
        Session {
            user,
            profile,
            favorites,
        }
    }

    /// Ends the session.
    pub fn sign_out(self) {
        info!(uid = %self.user.uid, "signed out");
    }

    pub fn uid(&self) -> &str {
        &self.user.uid
    }

    pub fn user(&self) -> &AuthUser {
        &self.user
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// `"First Last"` from the profile, if there is one with a name.
    pub fn display_name(&self) -> Option<String> {
        self.profile
            .as_ref()
            .map(UserProfile::full_name)
            .filter(|name| !name.is_empty())
    }

    /// Name written into a recipe's `author` field on save.
    pub fn author_name(&self) -> String {
        self.display_name()
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn is_favorite(&self, recipe_id: &str) -> bool {
        self.favorites.contains(recipe_id)
    }

    pub fn toggle_favorite<S: DocumentStore + ?Sized>(
        &mut self,
        store: &S,
        recipe_id: &str,
    ) -> Result<bool, StoreError> {
        let uid = self.user.uid.clone();
        self.favorites.toggle(store, &uid, recipe_id)
    }

    /// Re-reads favorites from the store, keeping the current set on error.
    pub fn reload_favorites<S: DocumentStore + ?Sized>(&mut self, store: &S) {
        if let Ok(favorites) = Favorites::load(store, &self.user.uid) {
            self.favorites = favorites;
        }
    }

    pub fn favorite_recipes<S: DocumentStore + ?Sized>(&self, store: &S) -> Vec<Recipe> {
        self.favorites.recipes(store)
    }

    pub fn owns(&self, recipe: &Recipe) -> bool {
        recipe.is_owned_by(&self.user.uid)
    }
}

/// Reads the sign-in screen's hero image URL from `appConfig/ui`.
///
/// Missing, empty or unreadable configuration yields `None`.
pub fn fetch_signin_hero_image<S: DocumentStore + ?Sized>(store: &S) -> Option<String> {
    match store.get_ui_config() {
        Ok(config) => config
            .and_then(|c| c.signin_hero_url)
            .filter(|url| !url.is_empty()),
        Err(e) => {
            warn!("Error loading ui config: {e}");
            None
        }
    }
}
