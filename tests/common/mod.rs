//! Shared fixtures for integration tests

use solrbuddy::client::{InMemoryBackend, SolrClient, SolrConfig};
use solrbuddy::{Product, ProductRepository};
use std::sync::Arc;

/// Repository over a fresh in-memory index
pub fn memory_repository() -> ProductRepository {
    ProductRepository::new(Arc::new(InMemoryBackend::new())).unwrap()
}

/// Repository over a live Solr core named by `SOLR_URL` / `SOLR_CORE`
pub fn solr_repository() -> ProductRepository {
    let config = SolrConfig {
        base_url: std::env::var("SOLR_URL").unwrap_or_else(|_| "http://localhost:8983/solr".into()),
        core: std::env::var("SOLR_CORE").unwrap_or_else(|_| "product".into()),
        ..SolrConfig::default()
    };
    ProductRepository::new(Arc::new(SolrClient::with_config(config).unwrap())).unwrap()
}

/// Three products that each mention "Phone" in a different field
pub fn phone_catalog() -> Vec<Product> {
    vec![
        Product::new("P0001", "Smart Phone", "Electronics", "New Item"),
        Product::new("P0002", "Cover", "Phone", "New Product"),
        Product::new("P0003", "Charging Cable", "Cable", "Wireless Charger for Phone"),
    ]
}
