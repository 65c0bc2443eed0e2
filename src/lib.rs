uniffi::setup_scaffolding!();

pub mod catalog;
pub mod config;
pub mod favorites;
pub mod feed;
pub mod ffi;
pub mod format;
pub mod model;
pub mod session;
pub mod store;

pub use catalog::{can_edit, delete_recipe, load_recipe, save_recipe, CatalogError};
pub use config::{CatalogConfig, ConfigError};
pub use favorites::Favorites;
pub use feed::{PageWindow, RecipeFeed};
pub use model::*;
pub use session::{fetch_signin_hero_image, Session};
pub use store::{DocumentStore, MemoryStore, StoreError};
