//! Wire-level tests for the Solr client against a canned HTTP responder

use solrbuddy::client::{SearchBackend, SolrClient, SolrConfig};
use solrbuddy::query::Criteria;
use solrbuddy::{PageRequest, Product, RepositoryError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Request as seen by the fake server
#[derive(Debug)]
struct CapturedRequest {
    method: String,
    target: String,
    body: String,
}

/// Answer exactly one request with `status` and `reply`, returning what was received
async fn serve_once(status: u16, reply: &'static str) -> (SolrClient, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut buffer = Vec::new();
        let mut chunk = [0u8; 4096];
        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before headers were complete");
            buffer.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        while buffer.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..n]);
        }

        let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
        let method = request_line.next().unwrap_or_default().to_string();
        let target = request_line.next().unwrap_or_default().to_string();
        let body = String::from_utf8_lossy(&buffer[header_end..]).to_string();

        let response = format!(
            "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            reply.len(),
            reply
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        CapturedRequest {
            method,
            target,
            body,
        }
    });

    let client = SolrClient::with_config(SolrConfig {
        base_url: format!("http://{}/solr", addr),
        core: "product".to_string(),
        ..SolrConfig::default()
    })
    .unwrap();

    (client, handle)
}

const UPDATE_OK: &str = r#"{"responseHeader":{"status":0,"QTime":3}}"#;

#[tokio::test]
async fn test_add_posts_json_array_with_commit() {
    let (client, server) = serve_once(200, UPDATE_OK).await;

    client
        .add(&[Product::new("P0001", "Desk", "Furniture", "New Desk")])
        .await
        .unwrap();

    let request = server.await.unwrap();
    assert_eq!(request.method, "POST");
    assert!(request.target.starts_with("/solr/product/update?"));
    assert!(request.target.contains("commit=true"));

    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body[0]["id"], "P0001");
    assert_eq!(body[0]["category"], "Furniture");
}

#[tokio::test]
async fn test_delete_by_id_body() {
    let (client, server) = serve_once(200, UPDATE_OK).await;

    client.delete_by_id("P0001").await.unwrap();

    let request = server.await.unwrap();
    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body["delete"]["id"], "P0001");
}

#[tokio::test]
async fn test_delete_all_body() {
    let (client, server) = serve_once(200, UPDATE_OK).await;

    client.delete_all().await.unwrap();

    let request = server.await.unwrap();
    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body["delete"]["query"], "*:*");
}

#[tokio::test]
async fn test_get_by_id_missing_is_none() {
    let (client, server) = serve_once(200, r#"{"doc":null}"#).await;

    assert!(client.get_by_id("P404").await.unwrap().is_none());

    let request = server.await.unwrap();
    assert_eq!(request.method, "GET");
    assert!(request.target.starts_with("/solr/product/get?"));
    assert!(request.target.contains("id=P404"));
}

#[tokio::test]
async fn test_query_decodes_page_and_total() {
    let reply = r#"{
        "responseHeader": {"status": 0},
        "response": {"numFound": 3, "start": 0, "docs": [
            {"id": "P0001", "name": ["Smart Phone"], "category": ["Electronics"], "description": ["New Item"]},
            {"id": "P0002", "name": ["Cover"], "category": ["Phone"], "description": ["New Product"]}
        ]}
    }"#;
    let (client, server) = serve_once(200, reply).await;

    let criteria = Criteria::contains("name", "Phone").or(Criteria::contains("category", "Phone"));
    let response = client
        .query(&criteria, PageRequest::new(0, 2).unwrap())
        .await
        .unwrap();

    assert_eq!(response.num_found, 3);
    assert_eq!(response.docs.len(), 2);
    assert_eq!(response.docs[1], Product::new("P0002", "Cover", "Phone", "New Product"));

    let request = server.await.unwrap();
    assert!(request.target.starts_with("/solr/product/select?"));
    assert!(request.target.contains("rows=2"));
    assert!(request.target.contains("start=0"));
}

#[tokio::test]
async fn test_backend_error_carries_solr_message() {
    let reply = r#"{"responseHeader":{"status":400},"error":{"msg":"undefined field nme","code":400}}"#;
    let (client, _server) = serve_once(400, reply).await;

    let err = client
        .query(&Criteria::equals("name", "Desk"), PageRequest::default())
        .await
        .unwrap_err();

    match err {
        RepositoryError::Backend { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "undefined field nme");
        }
        other => panic!("expected backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_count_reads_num_found() {
    let reply = r#"{"response":{"numFound":42,"start":0,"docs":[]}}"#;
    let (client, server) = serve_once(200, reply).await;

    assert_eq!(client.count().await.unwrap(), 42);

    let request = server.await.unwrap();
    assert!(request.target.contains("rows=0"));
}

#[tokio::test]
async fn test_silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Accept and hold the connection without ever answering
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        drop(socket);
    });

    let client = SolrClient::with_config(SolrConfig {
        base_url: format!("http://{}/solr", addr),
        core: "product".to_string(),
        timeout: Duration::from_millis(300),
        ..SolrConfig::default()
    })
    .unwrap();

    let started = Instant::now();
    let err = client.count().await.unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(err.is_transport());
    match err {
        RepositoryError::Timeout { duration_ms } => assert_eq!(duration_ms, 300),
        other => panic!("expected timeout, got {:?}", other),
    }

    server.abort();
}
