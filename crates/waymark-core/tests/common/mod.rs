#![allow(dead_code)]

use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};
use waymark_core::{params::TagLocation, LocationRegistry, RegistryBuilder, RemoteConfig};

/// Helper function to create a local-only test registry
pub async fn create_test_registry() -> (TempDir, LocationRegistry) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let registry = RegistryBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create registry");
    (temp_dir, registry)
}

/// Helper function to create a registry backed by a remote store
pub async fn create_remote_registry(
    temp_dir: &TempDir,
    remote: RemoteConfig,
) -> LocationRegistry {
    RegistryBuilder::new()
        .with_database_path(Some(temp_dir.path().join("test.db")))
        .with_remote(Some(remote))
        .build()
        .await
        .expect("Failed to create registry")
}

pub fn tag(name: &str, category: &str, latitude: f64, longitude: f64) -> TagLocation {
    TagLocation {
        name: name.to_string(),
        category: category.to_string(),
        latitude,
        longitude,
    }
}

/// Remote settings with short timeouts suitable for tests.
pub fn remote_config(endpoint: &str) -> RemoteConfig {
    RemoteConfig::new(endpoint).with_timeouts(Duration::from_millis(500), Duration::from_secs(2))
}

/// An endpoint nothing listens on.
pub async fn unreachable_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read local addr");
    drop(listener);
    format!("http://{addr}/api")
}

#[derive(Debug, Default)]
struct FakeState {
    documents: Mutex<Vec<Value>>,
    offline: AtomicBool,
    next_id: AtomicU64,
    requests: Mutex<Vec<String>>,
    authorization: Mutex<Option<String>>,
}

/// In-process stand-in for the remote document collection.
///
/// Speaks just enough HTTP/1.1 for the remote store: one request per
/// connection, `Connection: close` on every response. Inserted documents get
/// Mongo-style `{"$oid": …}` ids.
pub struct FakeRemote {
    addr: SocketAddr,
    state: Arc<FakeState>,
    collection: String,
}

impl FakeRemote {
    pub async fn start() -> Self {
        Self::start_with_collection("tagged_locations").await
    }

    pub async fn start_with_collection(collection: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake remote");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let state = Arc::new(FakeState::default());

        let server_state = Arc::clone(&state);
        let server_collection = collection.to_string();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let state = Arc::clone(&server_state);
                let collection = server_collection.clone();
                tokio::spawn(async move {
                    let _ = handle_connection(stream, &state, &collection).await;
                });
            }
        });

        Self {
            addr,
            state,
            collection: collection.to_string(),
        }
    }

    /// Base URL to configure the remote store with.
    pub fn endpoint(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn config(&self) -> RemoteConfig {
        remote_config(&self.endpoint()).with_collection(self.collection.clone())
    }

    /// Adds a document as if another client had written it.
    pub fn seed(&self, document: Value) {
        self.state.documents.lock().unwrap().push(document);
    }

    pub fn documents(&self) -> Vec<Value> {
        self.state.documents.lock().unwrap().clone()
    }

    /// Makes every later request fail with 503.
    pub fn go_offline(&self) {
        self.state.offline.store(true, Ordering::SeqCst);
    }

    /// Request lines received so far, e.g. `GET /api/tagged_locations`.
    pub fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.state.authorization.lock().unwrap().clone()
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    state: &FakeState,
    collection: &str,
) -> std::io::Result<()> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            return Ok(());
        }
        buffer.extend_from_slice(&chunk[..read]);
        if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let content_length = header_value(&head, "content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    while buffer.len() < header_end + content_length {
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
    }
    let body_end = buffer.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&buffer[header_end..body_end]).to_string();

    let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();

    state.requests.lock().unwrap().push(format!("{method} {path}"));
    if let Some(auth) = header_value(&head, "authorization") {
        *state.authorization.lock().unwrap() = Some(auth);
    }

    let (status, payload) = respond(state, collection, &method, &path, &body);
    let reason = match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        _ => "Service Unavailable",
    };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
        payload.len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

fn header_value(head: &str, name: &str) -> Option<String> {
    head.lines().skip(1).find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim()
            .eq_ignore_ascii_case(name)
            .then(|| value.trim().to_string())
    })
}

fn respond(
    state: &FakeState,
    collection: &str,
    method: &str,
    path: &str,
    body: &str,
) -> (u16, String) {
    if state.offline.load(Ordering::SeqCst) {
        return (503, json!({"error": "maintenance"}).to_string());
    }

    let collection_path = format!("/api/{collection}");
    let document_id = path
        .strip_prefix(&collection_path)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|rest| !rest.is_empty());

    let mut documents = state.documents.lock().unwrap();
    match (method, path == collection_path, document_id) {
        ("GET", true, _) => (200, Value::Array(documents.clone()).to_string()),
        ("POST", true, _) => {
            let Ok(Value::Object(mut document)) = serde_json::from_str::<Value>(body) else {
                return (400, json!({"error": "expected a JSON object"}).to_string());
            };
            let oid = format!("{:024x}", state.next_id.fetch_add(1, Ordering::SeqCst) + 1);
            document.insert("_id".to_string(), json!({"$oid": oid}));
            documents.push(Value::Object(document));
            (201, json!({"insertedId": {"$oid": oid}}).to_string())
        }
        ("DELETE", true, _) => {
            documents.clear();
            (204, String::new())
        }
        ("DELETE", false, Some(id)) => {
            let before = documents.len();
            documents.retain(|doc| native_id(doc).as_deref() != Some(id));
            if documents.len() == before {
                (404, json!({"error": "not found"}).to_string())
            } else {
                (204, String::new())
            }
        }
        _ => (404, json!({"error": "no route"}).to_string()),
    }
}

fn native_id(document: &Value) -> Option<String> {
    match document.get("_id")? {
        Value::String(id) => Some(id.clone()),
        Value::Object(object) => object.get("$oid")?.as_str().map(str::to_string),
        _ => None,
    }
}
