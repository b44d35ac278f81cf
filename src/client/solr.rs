//! Apache Solr HTTP client
//!
//! Speaks the Solr JSON API of a single core:
//! - `POST {base}/{core}/update` for adds and deletes
//! - `GET {base}/{core}/get` for real-time point lookups
//! - `GET {base}/{core}/select` for queries and counts
//! - `GET {base}/{core}/admin/ping` for health checks

use crate::client::{QueryResponse, SearchBackend};
use crate::errors::{RepositoryError, Result};
use crate::query::Criteria;
use crate::types::{PageRequest, Product, FIELD_CATEGORY, FIELD_DESCRIPTION, FIELD_ID, FIELD_NAME};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Solr base URL
pub const DEFAULT_SOLR_URL: &str = "http://localhost:8983/solr";

/// Default core holding product documents
pub const DEFAULT_CORE: &str = "product";

/// Default request timeout (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for one Solr core
#[derive(Debug, Clone, PartialEq)]
pub struct SolrConfig {
    pub base_url: String,
    pub core: String,
    pub timeout: Duration,
    /// Soft commit window; `None` commits on every write
    pub commit_within_ms: Option<u64>,
}

impl Default for SolrConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SOLR_URL.to_string(),
            core: DEFAULT_CORE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            commit_within_ms: None,
        }
    }
}

/// Solr client bound to a single core
#[derive(Debug, Clone)]
pub struct SolrClient {
    client: Client,
    config: SolrConfig,
}

impl SolrClient {
    /// Create a client for the default core on localhost
    pub fn new() -> Result<Self> {
        Self::with_config(SolrConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: SolrConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RepositoryError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// URL of a handler inside the core
    pub fn core_url(&self, handler: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.core,
            handler
        )
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn core(&self) -> &str {
        &self.config.core
    }

    fn commit_params(&self) -> Vec<(&'static str, String)> {
        match self.config.commit_within_ms {
            Some(ms) => vec![("commitWithin", ms.to_string()), ("wt", "json".to_string())],
            None => vec![("commit", "true".to_string()), ("wt", "json".to_string())],
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> RepositoryError {
        if e.is_timeout() {
            RepositoryError::Timeout {
                duration_ms: self.config.timeout.as_millis() as u64,
            }
        } else {
            RepositoryError::Transport(format!("Failed to reach Solr: {}", e))
        }
    }

    /// Post a JSON body to the update handler
    async fn update(&self, body: &Value) -> Result<()> {
        let url = self.core_url("update");
        debug!(%url, "sending update");

        let response = self
            .client
            .post(&url)
            .query(&self.commit_params())
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        check_status(response).await?;
        Ok(())
    }

    async fn select(&self, q: &str, start: usize, rows: usize) -> Result<SelectResponse> {
        let url = self.core_url("select");
        debug!(%url, q, start, rows, "running select");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", q.to_string()),
                ("start", start.to_string()),
                ("rows", rows.to_string()),
                ("sort", format!("{} asc", FIELD_ID)),
                ("wt", "json".to_string()),
            ])
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let response = check_status(response).await?;
        let text = response.text().await.map_err(|e| self.transport_error(e))?;
        parse_select_body(&text)
    }
}

#[async_trait]
impl SearchBackend for SolrClient {
    async fn add(&self, products: &[Product]) -> Result<()> {
        if products.is_empty() {
            return Ok(());
        }
        let body = serde_json::to_value(products)?;
        self.update(&body).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Product>> {
        let url = self.core_url("get");
        debug!(%url, id, "real-time get");

        let response = self
            .client
            .get(&url)
            .query(&[("id", id), ("wt", "json")])
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let response = check_status(response).await?;
        let text = response.text().await.map_err(|e| self.transport_error(e))?;
        parse_get_body(&text)
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        self.update(&json!({ "delete": { "id": id } })).await
    }

    async fn delete_all(&self) -> Result<()> {
        self.update(&json!({ "delete": { "query": "*:*" } })).await
    }

    async fn query(&self, criteria: &Criteria, page: PageRequest) -> Result<QueryResponse> {
        let select = self
            .select(&criteria.to_solr_query(), page.offset(), page.size())
            .await?;

        let docs = select
            .response
            .docs
            .iter()
            .map(decode_document)
            .collect::<Result<Vec<_>>>()?;

        Ok(QueryResponse {
            docs,
            num_found: select.response.num_found,
        })
    }

    async fn count(&self) -> Result<u64> {
        let select = self.select("*:*", 0, 0).await?;
        Ok(select.response.num_found)
    }

    async fn ping(&self) -> Result<bool> {
        let url = self.core_url("admin/ping");

        match self.client.get(&url).query(&[("wt", "json")]).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                debug!(error = %e, "ping failed");
                Ok(false)
            }
        }
    }
}

/// Turn non-2xx responses into backend errors carrying Solr's message
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    let message = extract_error_message(&body);
    warn!(status = status.as_u16(), %message, "Solr reported an error");

    Err(RepositoryError::Backend {
        status: status.as_u16(),
        message,
    })
}

/// Pull `error.msg` out of a Solr error body, falling back to the raw text
pub fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.msg)
        .unwrap_or_else(|| body.trim().to_string())
}

/// Decode a `/select` response body
pub fn parse_select_body(text: &str) -> Result<SelectResponse> {
    serde_json::from_str(text).map_err(|e| RepositoryError::Backend {
        status: 200,
        message: format!("Unexpected select response: {}", e),
    })
}

/// Decode a `/get` response body
pub fn parse_get_body(text: &str) -> Result<Option<Product>> {
    let body: GetResponse = serde_json::from_str(text).map_err(|e| RepositoryError::Backend {
        status: 200,
        message: format!("Unexpected get response: {}", e),
    })?;

    match body.doc {
        Some(Value::Null) | None => Ok(None),
        Some(doc) => decode_document(&doc).map(Some),
    }
}

/// Build a product from a Solr document, accepting scalar or multi-valued fields
pub fn decode_document(doc: &Value) -> Result<Product> {
    let id = field_text(doc, FIELD_ID).ok_or_else(|| RepositoryError::Backend {
        status: 200,
        message: format!("Document without id: {}", doc),
    })?;

    Ok(Product::new(
        id,
        field_text(doc, FIELD_NAME).unwrap_or_default(),
        field_text(doc, FIELD_CATEGORY).unwrap_or_default(),
        field_text(doc, FIELD_DESCRIPTION).unwrap_or_default(),
    ))
}

fn field_text(doc: &Value, field: &str) -> Option<String> {
    let value = match doc.get(field)? {
        Value::Array(values) => values.first()?,
        other => other,
    };
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// `/select` response envelope
#[derive(Debug, Deserialize)]
pub struct SelectResponse {
    pub response: SelectDocs,
}

#[derive(Debug, Deserialize)]
pub struct SelectDocs {
    #[serde(rename = "numFound")]
    pub num_found: u64,
    #[serde(default)]
    pub docs: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct GetResponse {
    #[serde(default)]
    doc: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    msg: Option<String>,
}
