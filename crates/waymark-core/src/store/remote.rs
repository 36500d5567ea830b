//! Primary store: a remote JSON document collection over HTTP.
//!
//! Wire contract:
//!
//! - `GET    {endpoint}/{collection}`            → array of documents
//! - `POST   {endpoint}/{collection}`            → `{"_id": …}` or `{"insertedId": …}`
//! - `DELETE {endpoint}/{collection}/{native_id}` → 2xx, or 404 when already gone
//! - `DELETE {endpoint}/{collection}`            → removes every document
//!
//! Documents are keyed by a backend-native `_id` (a plain string or Mongo
//! extended JSON `{"$oid": …}`) and carry the client id as `clientId`. The
//! native id never leaves this module: documents are translated into
//! [`TaggedLocation`]s on the way in, and [`RemoteStore`] remembers which
//! native id belongs to which [`LocationId`] for deletes.

use std::{collections::HashMap, fmt, time::Duration};

use jiff::Timestamp;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{
    error::{Result, WaymarkError},
    models::{Category, LocationId, TaggedLocation},
};

/// Collection name used when none is configured.
pub const DEFAULT_COLLECTION: &str = "tagged_locations";

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Base URL of the document service, e.g. `https://api.example.com/v1`
    pub endpoint: String,
    /// Collection holding the location documents
    pub collection: String,
    /// Optional bearer token sent with every request
    pub auth_token: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl RemoteConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            collection: DEFAULT_COLLECTION.to_string(),
            auth_token: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token;
        self
    }

    pub fn with_timeouts(mut self, connect: Duration, request: Duration) -> Self {
        self.connect_timeout = connect;
        self.request_timeout = request;
        self
    }
}

/// Failures talking to the remote store.
///
/// These never reach callers of [`super::LocationStore`]; they trigger the
/// fallback to the local store and are logged.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("failed to connect to remote store: {0}")]
    Connect(#[source] reqwest::Error),
    #[error("remote store request timed out: {0}")]
    Timeout(#[source] reqwest::Error),
    #[error("remote store request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("remote store returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("failed to decode remote store response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RemoteError::Timeout(e)
        } else if e.is_connect() {
            RemoteError::Connect(e)
        } else if e.is_decode() {
            RemoteError::Decode(e.to_string())
        } else {
            RemoteError::Request(e)
        }
    }
}

/// Backend-native document id, as plain text or extended JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum NativeId {
    Plain(String),
    ObjectId {
        #[serde(rename = "$oid")]
        oid: String,
    },
}

impl NativeId {
    fn into_string(self) -> String {
        match self {
            NativeId::Plain(id) => id,
            NativeId::ObjectId { oid } => oid,
        }
    }
}

/// A location document as the remote collection returns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteDocument {
    #[serde(rename = "_id")]
    native_id: NativeId,
    #[serde(default, alias = "id")]
    client_id: Option<String>,
    name: String,
    #[serde(alias = "type")]
    category: Category,
    latitude: f64,
    longitude: f64,
    created_at: Timestamp,
}

/// A location document as it is sent on insert.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewDocument<'a> {
    client_id: &'a LocationId,
    name: &'a str,
    category: Category,
    latitude: f64,
    longitude: f64,
    created_at: Timestamp,
}

impl<'a> From<&'a TaggedLocation> for NewDocument<'a> {
    fn from(location: &'a TaggedLocation) -> Self {
        Self {
            client_id: &location.id,
            name: &location.name,
            category: location.category,
            latitude: location.latitude,
            longitude: location.longitude,
            created_at: location.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct InsertResponse {
    #[serde(rename = "_id", alias = "insertedId")]
    native_id: NativeId,
}

/// HTTP client for the remote document collection.
pub struct RemoteStore {
    client: Client,
    collection_url: Url,
    auth_token: Option<String>,
    native_ids: HashMap<LocationId, String>,
}

impl RemoteStore {
    /// Builds a client for the configured collection.
    ///
    /// # Errors
    ///
    /// Returns `WaymarkError::Configuration` when the endpoint is not a
    /// usable base URL or the HTTP client cannot be created.
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let collection_url = collection_url(&config.endpoint, &config.collection)?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| WaymarkError::Configuration {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            collection_url,
            auth_token: config.auth_token.clone(),
            native_ids: HashMap::new(),
        })
    }

    /// Checks that the collection is reachable.
    pub async fn ping(&self) -> std::result::Result<(), RemoteError> {
        let response = self.send(self.client.get(self.collection_url.clone())).await?;
        check_status(response).await?;
        Ok(())
    }

    /// Fetches every document and translates it into a location.
    pub async fn fetch_all(&mut self) -> std::result::Result<Vec<TaggedLocation>, RemoteError> {
        let response = self.send(self.client.get(self.collection_url.clone())).await?;
        let documents: Vec<Value> = check_status(response).await?.json().await?;

        let (locations, native_ids) = decode_documents(documents);
        self.native_ids = native_ids;
        debug!("Remote store: fetched {} locations", locations.len());
        Ok(locations)
    }

    pub async fn insert(&mut self, location: &TaggedLocation) -> std::result::Result<(), RemoteError> {
        let request = self
            .client
            .post(self.collection_url.clone())
            .json(&NewDocument::from(location));
        let inserted: InsertResponse = check_status(self.send(request).await?).await?.json().await?;

        self.native_ids
            .insert(location.id.clone(), inserted.native_id.into_string());
        Ok(())
    }

    /// Deletes the document for `id`. Returns whether one was deleted.
    pub async fn remove_by_id(&mut self, id: &LocationId) -> std::result::Result<bool, RemoteError> {
        if !self.native_ids.contains_key(id) {
            // The id may belong to a document inserted by another session.
            self.fetch_all().await?;
        }
        let Some(native_id) = self.native_ids.get(id).cloned() else {
            return Ok(false);
        };

        let response = self.send(self.client.delete(self.document_url(&native_id))).await?;
        if response.status() == StatusCode::NOT_FOUND {
            self.native_ids.remove(id);
            return Ok(false);
        }
        check_status(response).await?;

        self.native_ids.remove(id);
        Ok(true)
    }

    pub async fn clear(&mut self) -> std::result::Result<(), RemoteError> {
        let response = self.send(self.client.delete(self.collection_url.clone())).await?;
        check_status(response).await?;
        self.native_ids.clear();
        Ok(())
    }

    fn document_url(&self, native_id: &str) -> Url {
        let mut url = self.collection_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(native_id);
        }
        url
    }

    async fn send(&self, request: RequestBuilder) -> std::result::Result<Response, RemoteError> {
        let request = match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        Ok(request.send().await?)
    }
}

impl fmt::Debug for RemoteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteStore")
            .field("collection_url", &self.collection_url.as_str())
            .field("has_auth_token", &self.auth_token.is_some())
            .field("known_ids", &self.native_ids.len())
            .finish()
    }
}

async fn check_status(response: Response) -> std::result::Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::Status { status, body })
}

fn collection_url(endpoint: &str, collection: &str) -> Result<Url> {
    let invalid = |reason: String| WaymarkError::Configuration {
        message: format!("Invalid remote endpoint '{endpoint}': {reason}"),
    };

    let mut url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
    if collection.trim().is_empty() {
        return Err(invalid("collection name is empty".to_string()));
    }
    url.path_segments_mut()
        .map_err(|()| invalid("not a base URL".to_string()))?
        .pop_if_empty()
        .push(collection);
    Ok(url)
}

/// Translates raw documents into locations plus the id map.
///
/// Documents that fail to decode or validate are skipped. The uniform id is
/// the client id when the document has one, otherwise the native id.
fn decode_documents(
    documents: Vec<Value>,
) -> (Vec<TaggedLocation>, HashMap<LocationId, String>) {
    let mut locations = Vec::with_capacity(documents.len());
    let mut native_ids = HashMap::with_capacity(documents.len());

    for raw in documents {
        let document = match serde_json::from_value::<RemoteDocument>(raw) {
            Ok(document) => document,
            Err(e) => {
                warn!("Skipping undecodable remote document: {e}");
                continue;
            }
        };

        let native_id = document.native_id.into_string();
        let id = LocationId::from(document.client_id.unwrap_or_else(|| native_id.clone()));
        let location = TaggedLocation {
            id,
            name: document.name,
            category: document.category,
            latitude: document.latitude,
            longitude: document.longitude,
            created_at: document.created_at,
        };

        if let Err(e) = location.validate() {
            warn!("Skipping remote document {native_id}: {e}");
            continue;
        }

        native_ids.insert(location.id.clone(), native_id);
        locations.push(location);
    }

    (locations, native_ids)
}
