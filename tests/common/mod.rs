#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use merchantinfo::config::{Config, SheetUrls, StoreBackend};
use merchantinfo::db::{MemorySheetStore, SheetStore, StoreError};
use merchantinfo::models::Cell;
use merchantinfo::state::SharedState;

/// A running test server instance backed by an in-memory sheet.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: SharedState,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST a JSON record to the write endpoint, return (body, status).
    pub async fn append_json(&self, record: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/sheet"))
            .json(record)
            .send()
            .await
            .expect("append request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// POST a raw body with the given content type to the write endpoint.
    pub async fn append_raw(&self, content_type: &str, body: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/sheet"))
            .header("content-type", content_type)
            .body(body.to_string())
            .send()
            .await
            .expect("append request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// GET the read endpoint, return (body, status).
    pub async fn read_sheet(&self) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url("/api/sheet"))
            .send()
            .await
            .expect("read request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// GET an HTML page, return (text, status).
    pub async fn get_page(&self, path: &str) -> (String, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("page request failed");
        let status = resp.status();
        (resp.text().await.unwrap_or_default(), status)
    }

    /// POST the merchant form, return (html, status).
    pub async fn post_form(&self, fields: &[(&str, &str)]) -> (String, StatusCode) {
        let resp = self
            .client
            .post(self.url("/form"))
            .form(fields)
            .send()
            .await
            .expect("form request failed");
        let status = resp.status();
        (resp.text().await.unwrap_or_default(), status)
    }

    /// POST the merchant form as if relayed for `visitor` by a proxy.
    pub async fn post_form_for(
        &self,
        visitor: &str,
        fields: &[(&str, &str)],
    ) -> (String, StatusCode) {
        let resp = self
            .client
            .post(self.url("/form"))
            .header("x-forwarded-for", visitor)
            .form(fields)
            .send()
            .await
            .expect("form request failed");
        let status = resp.status();
        (resp.text().await.unwrap_or_default(), status)
    }

    pub async fn stored_rows(&self) -> Vec<Vec<Cell>> {
        self.state.store.read_rows().await.expect("store read failed")
    }
}

pub fn test_config(addr: SocketAddr) -> Config {
    let base_url = format!("http://{addr}");
    Config {
        host: addr.ip(),
        port: addr.port(),
        sheet: SheetUrls::local(&base_url),
        base_url,
        store: StoreBackend::Memory,
        provision_header: true,
        cors_origins: "*".to_string(),
        max_body_size: 65_536,
        rate_limit: 1_000,
        rate_limit_window_secs: 60,
        trusted_proxies: vec![],
        http_timeout_secs: 5,
        log_level: "warn".to_string(),
    }
}

/// Spawn the app with a fresh in-memory sheet holding the header row.
pub async fn spawn_app() -> TestApp {
    spawn_with(Arc::new(MemorySheetStore::new()), |_| {}).await
}

/// Spawn the app with the given store and config adjustments.
pub async fn spawn_with(
    store: Arc<dyn SheetStore>,
    configure: impl FnOnce(&mut Config),
) -> TestApp {
    // Bind first so the sheet client can point back at this server
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    let mut config = test_config(addr);
    configure(&mut config);

    merchantinfo::prepare_store(store.as_ref(), &config)
        .await
        .expect("Failed to prepare store");

    let (app, state) = merchantinfo::build_app(store, config).expect("Failed to build app");

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        client,
        state,
    }
}

/// Spawn a bare server answering every POST with the given status and body.
pub async fn spawn_stub_sheet(status: StatusCode, body: &'static str) -> SocketAddr {
    let status = axum::http::StatusCode::from_u16(status.as_u16()).unwrap();
    let app = axum::Router::new().route(
        "/exec",
        axum::routing::post(move || async move { (status, body) }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Stub failed");
    });
    addr
}

/// Spawn a raw server that answers one write with a 200 whose body is cut
/// short, so reading the body fails after the status arrived.
pub async fn spawn_truncating_sheet() -> SocketAddr {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };

        // Drain the request so closing the socket does not reset it
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap_or(0);
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if request_complete(&request) {
                break;
            }
        }

        let _ = socket
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 100\r\n\r\n{\"succ")
            .await;
        let _ = socket.shutdown().await;
    });
    addr
}

fn request_complete(request: &[u8]) -> bool {
    let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let head = String::from_utf8_lossy(&request[..end]).to_ascii_lowercase();
    let length = head
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    request.len() >= end + 4 + length
}

/// A sheet whose backend is down.
pub struct FailingStore;

#[async_trait]
impl SheetStore for FailingStore {
    fn kind(&self) -> &'static str {
        "failing"
    }

    async fn append_row(&self, _cells: Vec<Cell>) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("backend offline".to_string()))
    }

    async fn read_rows(&self) -> Result<Vec<Vec<Cell>>, StoreError> {
        Err(StoreError::Unavailable("backend offline".to_string()))
    }

    async fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(false)
    }
}

/// Form fields that pass every validator.
pub fn valid_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("store_name", "Fresh Mart"),
        ("merchant_name", "A B"),
        ("phone_number", "+91 98765-43210"),
        ("address", "123 Main Street"),
        ("pin_code", "560001"),
        ("latitude", "12.9716"),
        ("longitude", "77.5946"),
        ("interest", "interested"),
        ("potential_problems", "  Slow payouts  "),
    ]
}
