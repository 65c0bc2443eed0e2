//! Single-recipe operations: detail load, save from the editor, delete.

use thiserror::Error;
use tracing::info;

use crate::model::{Recipe, RecipeDraft, ValidationError};
use crate::session::Session;
use crate::store::{DocumentStore, StoreError};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Recipe not found: {0}")]
    NotFound(String),

    #[error("Recipe {0} belongs to another user")]
    NotOwner(String),

    #[error("Sign in required")]
    NotSignedIn,

    #[error("Invalid recipe: {0}")]
    Validation(#[from] ValidationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Loads a recipe for the detail view. A missing document is an error.
pub fn load_recipe<S: DocumentStore + ?Sized>(store: &S, id: &str) -> Result<Recipe, CatalogError> {
    store
        .get_recipe(id)?
        .ok_or_else(|| CatalogError::NotFound(id.to_string()))
}

/// Returns true if the signed-in user may edit or delete `recipe`.
pub fn can_edit(session: Option<&Session>, recipe: &Recipe) -> bool {
    session.is_some_and(|s| s.owns(recipe))
}

/// Validates `draft` and writes it.
///
/// With `existing_id` the recipe is updated in place, keeping its creation
/// time; otherwise a new recipe is created. Author and owner are taken from
/// the session. Validation happens before any store call.
pub fn save_recipe<S: DocumentStore + ?Sized>(
    store: &S,
    session: &Session,
    draft: &RecipeDraft,
    existing_id: Option<&str>,
) -> Result<Recipe, CatalogError> {
    let valid = draft.validate()?;
    let data = valid.into_data(session.author_name(), session.uid().to_string());

    match existing_id {
        Some(id) => {
            let existing = load_recipe(store, id)?;
            if !session.owns(&existing) {
                return Err(CatalogError::NotOwner(id.to_string()));
            }
            let recipe = store.update_recipe(id, data)?;
            info!(id = %recipe.id, "recipe updated");
            Ok(recipe)
        }
        None => {
            let recipe = store.create_recipe(data)?;
            info!(id = %recipe.id, "recipe created");
            Ok(recipe)
        }
    }
}

/// Hard-deletes `recipe` after checking that the session owns it.
///
/// A recipe without an id was never persisted and is left alone.
pub fn delete_recipe<S: DocumentStore + ?Sized>(
    store: &S,
    session: &Session,
    recipe: &Recipe,
) -> Result<(), CatalogError> {
    if recipe.id.is_empty() {
        return Ok(());
    }
    if !session.owns(recipe) {
        return Err(CatalogError::NotOwner(recipe.id.clone()));
    }
    store.delete_recipe(&recipe.id)?;
    info!(id = %recipe.id, "recipe deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AuthUser;
    use crate::store::MemoryStore;

    fn draft(title: &str) -> RecipeDraft {
        RecipeDraft {
            title: title.to_string(),
            description: "Family recipe".to_string(),
            category: "Dessert".to_string(),
            cuisine: "French".to_string(),
            prep_time: "35".to_string(),
            rating: "4.2".to_string(),
            ingredients: vec!["apples".to_string(), "".to_string()],
            instructions: vec!["Bake".to_string()],
            image: "https://img.example/tarte.jpg".to_string(),
        }
    }

    fn signed_in(store: &MemoryStore, uid: &str) -> Session {
        Session::register(store, AuthUser::new(uid, None), "Julia", "Child").unwrap()
    }

    #[test]
    fn test_create_stamps_author_and_owner() {
        let store = MemoryStore::new();
        let session = signed_in(&store, "u1");

        let recipe = save_recipe(&store, &session, &draft("Tarte Tatin"), None).unwrap();
        assert_eq!(recipe.data.author, "Julia Child");
        assert_eq!(recipe.data.user_id, "u1");
        assert_eq!(recipe.data.prep_time, 35);
        assert_eq!(recipe.data.ingredients, vec!["apples"]);
        assert!(recipe.created_at.is_some());
        assert_eq!(load_recipe(&store, &recipe.id).unwrap(), recipe);
    }

    #[test]
    fn test_update_keeps_identity() {
        let store = MemoryStore::new();
        let session = signed_in(&store, "u1");
        let created = save_recipe(&store, &session, &draft("Tarte"), None).unwrap();

        let mut edited = RecipeDraft::from_recipe(&created);
        edited.title = "Tarte Tatin".to_string();
        let updated = save_recipe(&store, &session, &edited, Some(&created.id)).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.title(), "Tarte Tatin");
        assert_eq!(store.recipe_count(), 1);
    }

    #[test]
    fn test_validation_before_store() {
        let store = MemoryStore::new();
        let session = signed_in(&store, "u1");
        let mut bad = draft("Tarte");
        bad.instructions = vec!["  ".to_string()];

        let result = save_recipe(&store, &session, &bad, Some("does-not-exist"));
        assert!(matches!(
            result,
            Err(CatalogError::Validation(ValidationError::NoInstructions))
        ));
        assert_eq!(store.recipe_count(), 0);
    }

    #[test]
    fn test_edit_other_users_recipe_rejected() {
        let store = MemoryStore::new();
        let owner = signed_in(&store, "u1");
        let other = signed_in(&store, "u2");
        let created = save_recipe(&store, &owner, &draft("Tarte"), None).unwrap();

        let result = save_recipe(&store, &other, &draft("Mine now"), Some(&created.id));
        assert!(matches!(result, Err(CatalogError::NotOwner(_))));
        assert!(!can_edit(Some(&other), &created));
        assert!(can_edit(Some(&owner), &created));
        assert!(!can_edit(None, &created));
    }

    #[test]
    fn test_delete() {
        let store = MemoryStore::new();
        let owner = signed_in(&store, "u1");
        let other = signed_in(&store, "u2");
        let created = save_recipe(&store, &owner, &draft("Tarte"), None).unwrap();

        assert!(matches!(
            delete_recipe(&store, &other, &created),
            Err(CatalogError::NotOwner(_))
        ));
        delete_recipe(&store, &owner, &created).unwrap();
        assert!(matches!(
            load_recipe(&store, &created.id),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_unsaved_is_noop() {
        let store = MemoryStore::new();
        let owner = signed_in(&store, "u1");
        let data = draft("x")
            .validate()
            .unwrap()
            .into_data("Julia Child".to_string(), "u1".to_string());
        let unsaved = Recipe::new("", data);
        delete_recipe(&store, &owner, &unsaved).unwrap();
    }
}
