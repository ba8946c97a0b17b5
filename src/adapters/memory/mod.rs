//! In-memory store backend
//!
//! Used by `store.target = "memory"` and as the reference store in tests.

pub mod store;

pub use store::MemoryStore;
