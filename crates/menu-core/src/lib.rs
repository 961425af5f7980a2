//! # Menu Core
//! 
//! Domain entities, ports and services for the menu management system.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;
