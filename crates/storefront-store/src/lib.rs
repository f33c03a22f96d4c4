//! Storefront — in-memory storage.
//!
//! Implements the audit log and order repositories over process memory.
//! Contents live as long as the store and are dumped at the end of a run.

pub mod memory;

pub use memory::InMemoryStore;
