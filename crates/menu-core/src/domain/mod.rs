//! # Menu Core - Domain Module
//! 
//! Domain entities for the menu management system.

pub mod auth;
pub mod category;
pub mod image_upload;
pub mod menu_item;
pub mod orphan;

// Re-export all entities and enums
pub use auth::{AuthState, AuthUser, SignedInSession};
pub use category::{CategoryCatalog, CategoryFilter};
pub use image_upload::ImageUpload;
pub use menu_item::{ImageRef, MenuItem, MenuItemFields};
pub use orphan::{OrphanKind, OrphanRecord};
