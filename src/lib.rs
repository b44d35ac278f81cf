//! solrbuddy - typed product repository over Apache Solr
//!
//! # Architecture
//!
//! - **types**: `Product` document model and pagination
//! - **query**: explicit criteria plus named, declarative query templates
//! - **client**: `SearchBackend` contract with Solr (HTTP/JSON) and in-memory backends
//! - **repository**: CRUD and search facade over an injected backend
//! - **config** / **cli**: TOML configuration and the `solrbuddy` command line

pub mod errors;
pub mod types;
pub mod query;
pub mod client;
pub mod repository;

// Re-export commonly used types
pub use errors::{RepositoryError, Result};
pub use repository::ProductRepository;
pub use types::{Page, PageRequest, Product};

// Application layer
pub mod config;
pub mod cli;
