//! Document store adapters

pub mod memory_store;

pub use memory_store::InMemoryDocumentStore;
