//! Search client module
//!
//! `SearchBackend` is the operation contract every backend honors. The Solr
//! client talks HTTP/JSON to a running core; the in-memory backend keeps
//! documents in process for tests and offline use.

pub mod memory;
pub mod solr;

use crate::errors::Result;
use crate::query::Criteria;
use crate::types::{PageRequest, Product};
use async_trait::async_trait;

// Re-export commonly used types
pub use memory::InMemoryBackend;
pub use solr::{SolrClient, SolrConfig, DEFAULT_CORE, DEFAULT_SOLR_URL};

/// One page of matches plus the total match count
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResponse {
    pub docs: Vec<Product>,
    pub num_found: u64,
}

/// Network and encoding boundary to a document-search engine
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Insert or overwrite documents keyed by id
    async fn add(&self, products: &[Product]) -> Result<()>;

    /// Point lookup by id
    async fn get_by_id(&self, id: &str) -> Result<Option<Product>>;

    /// Remove a document; absent ids are not an error
    async fn delete_by_id(&self, id: &str) -> Result<()>;

    /// Remove every document in the backend's scope
    async fn delete_all(&self) -> Result<()>;

    /// Run criteria and return the requested page
    async fn query(&self, criteria: &Criteria, page: PageRequest) -> Result<QueryResponse>;

    /// Total number of stored documents
    async fn count(&self) -> Result<u64>;

    /// Whether the backend answers at all
    async fn ping(&self) -> Result<bool>;
}
