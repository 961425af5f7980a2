//! Object store adapters

pub mod memory_object_store;

pub use memory_object_store::{InMemoryObjectStore, ObjectStoreSettings};
