//! HTTP request handlers

pub mod auth;
pub mod categories;
pub mod events;
pub mod health;
pub mod media;
pub mod menu_items;
