//! Auth provider adapters

pub mod memory_provider;

pub use memory_provider::InMemoryAuthProvider;
