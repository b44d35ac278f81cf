//! Product repository
//!
//! CRUD and query surface consumed by application code. Every call is one
//! round trip to the injected backend; not-found outcomes come back as
//! `None` or an empty collection.

use crate::client::SearchBackend;
use crate::errors::{RepositoryError, Result};
use crate::query::{Criteria, NamedQueries, QueryTemplate, FIND_BY_NAMED_QUERY, FREE_TEXT_TEMPLATE};
use crate::types::{Page, PageRequest, Product, FIELD_NAME};
use std::sync::Arc;
use tracing::{debug, info};

/// Rows fetched per request when collecting an unpaged result
const FETCH_BATCH: usize = 1000;

/// Repository of product documents over a search backend
#[derive(Clone)]
pub struct ProductRepository {
    backend: Arc<dyn SearchBackend>,
    custom_query: QueryTemplate,
    named_queries: NamedQueries,
}

impl ProductRepository {
    /// Create a repository with the predefined named queries
    pub fn new(backend: Arc<dyn SearchBackend>) -> Result<Self> {
        Self::with_named_queries(backend, NamedQueries::with_defaults()?)
    }

    /// Create a repository with a custom named query table
    pub fn with_named_queries(
        backend: Arc<dyn SearchBackend>,
        named_queries: NamedQueries,
    ) -> Result<Self> {
        Ok(Self {
            backend,
            custom_query: QueryTemplate::parse(FREE_TEXT_TEMPLATE)?,
            named_queries,
        })
    }

    pub fn named_queries(&self) -> &NamedQueries {
        &self.named_queries
    }

    /// Insert or overwrite a product
    pub async fn save(&self, product: &Product) -> Result<Product> {
        product.validate()?;
        self.backend.add(std::slice::from_ref(product)).await?;
        debug!(id = product.id(), "saved product");
        Ok(product.clone())
    }

    /// Save several products in one backend request
    ///
    /// Every product is validated before anything is sent, so an invalid
    /// entry leaves the index untouched.
    pub async fn save_all(&self, products: &[Product]) -> Result<Vec<Product>> {
        for product in products {
            product.validate()?;
        }
        self.backend.add(products).await?;
        debug!(count = products.len(), "saved products");
        Ok(products.to_vec())
    }

    /// Remove every document in the core
    pub async fn delete_all(&self) -> Result<()> {
        self.backend.delete_all().await?;
        info!("deleted all products");
        Ok(())
    }

    /// Remove the document with the product's id; absent ids are ignored
    pub async fn delete(&self, product: &Product) -> Result<()> {
        self.delete_by_id(product.id()).await
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<()> {
        if id.trim().is_empty() {
            return Err(RepositoryError::Validation(
                "product id must not be empty".to_string(),
            ));
        }
        self.backend.delete_by_id(id).await?;
        debug!(id, "deleted product");
        Ok(())
    }

    /// Point lookup by id
    pub async fn find_one(&self, id: &str) -> Result<Option<Product>> {
        self.backend.get_by_id(id).await
    }

    pub async fn exists_by_id(&self, id: &str) -> Result<bool> {
        Ok(self.find_one(id).await?.is_some())
    }

    /// Number of documents in the core
    pub async fn count(&self) -> Result<u64> {
        self.backend.count().await
    }

    /// Whether the backend answers
    pub async fn ping(&self) -> Result<bool> {
        self.backend.ping().await
    }

    /// Page through every document
    pub async fn find_all(&self, page: PageRequest) -> Result<Page<Product>> {
        self.run(&Criteria::All, page).await
    }

    /// Exact match on `name`, collecting every matching document
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Product>> {
        if name.is_empty() {
            return Err(RepositoryError::Validation(
                "name must not be empty".to_string(),
            ));
        }
        let criteria = Criteria::equals(FIELD_NAME, name);
        self.collect_all(&criteria).await
    }

    /// Free-text match of `term` over name, category and description
    pub async fn find_by_custom_query(
        &self,
        term: &str,
        page: PageRequest,
    ) -> Result<Page<Product>> {
        let criteria = self.custom_query.bind(&[term])?;
        self.run(&criteria, page).await
    }

    /// Free-text match using the predefined `Product.findByNamedQuery` template
    pub async fn find_by_named_query(
        &self,
        term: &str,
        page: PageRequest,
    ) -> Result<Page<Product>> {
        self.find_by_query(FIND_BY_NAMED_QUERY, &[term], page).await
    }

    /// Run any registered named query with positional arguments
    pub async fn find_by_query(
        &self,
        name: &str,
        args: &[&str],
        page: PageRequest,
    ) -> Result<Page<Product>> {
        let criteria = self.named_queries.get(name)?.bind(args)?;
        self.run(&criteria, page).await
    }

    /// Walk the pages of `criteria` until every match has been read
    async fn collect_all(&self, criteria: &Criteria) -> Result<Vec<Product>> {
        let mut request = PageRequest::first(FETCH_BATCH)?;
        let mut products = Vec::new();
        loop {
            let page = self.run(criteria, request).await?;
            let total = page.total_elements();
            let has_next = page.has_next();
            if page.is_empty() {
                break;
            }
            products.extend(page.into_content());
            if !has_next || products.len() as u64 >= total {
                break;
            }
            request = request.next();
        }
        Ok(products)
    }

    async fn run(&self, criteria: &Criteria, page: PageRequest) -> Result<Page<Product>> {
        let response = self.backend.query(criteria, page).await?;
        debug!(
            found = response.num_found,
            returned = response.docs.len(),
            page = page.page(),
            "query finished"
        );
        Ok(Page::new(response.docs, page, response.num_found))
    }
}
