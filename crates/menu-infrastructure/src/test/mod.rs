//! End-to-end lifecycle scenarios over the in-memory adapters
