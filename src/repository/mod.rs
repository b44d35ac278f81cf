//! Repository module
//!
//! Public CRUD and query facade over a `SearchBackend`.

pub mod product;

// Re-export key types for convenience
pub use product::ProductRepository;
