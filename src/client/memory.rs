//! In-memory search backend
//!
//! Honors the same contract as the Solr client: upsert by id, exact and
//! substring criteria, results ordered by id. Writes are visible
//! immediately.

use crate::client::{QueryResponse, SearchBackend};
use crate::errors::Result;
use crate::query::Criteria;
use crate::types::{PageRequest, Product};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Process-local backend, cheap to clone and share across tasks
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    documents: Arc<RwLock<BTreeMap<String, Product>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-loaded with documents
    pub fn with_documents(products: impl IntoIterator<Item = Product>) -> Self {
        let documents = products
            .into_iter()
            .map(|p| (p.id().to_string(), p))
            .collect();
        Self {
            documents: Arc::new(RwLock::new(documents)),
        }
    }
}

#[async_trait]
impl SearchBackend for InMemoryBackend {
    async fn add(&self, products: &[Product]) -> Result<()> {
        let mut documents = self.documents.write().await;
        for product in products {
            documents.insert(product.id().to_string(), product.clone());
        }
        debug!(count = products.len(), "stored documents in memory");
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Product>> {
        Ok(self.documents.read().await.get(id).cloned())
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        self.documents.write().await.remove(id);
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        self.documents.write().await.clear();
        Ok(())
    }

    async fn query(&self, criteria: &Criteria, page: PageRequest) -> Result<QueryResponse> {
        let documents = self.documents.read().await;
        let matching: Vec<&Product> = documents
            .values()
            .filter(|p| criteria.matches(p))
            .collect();

        let num_found = matching.len() as u64;
        let docs = matching
            .into_iter()
            .skip(page.offset())
            .take(page.size())
            .cloned()
            .collect();

        Ok(QueryResponse { docs, num_found })
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.documents.read().await.len() as u64)
    }

    async fn ping(&self) -> Result<bool> {
        Ok(true)
    }
}
