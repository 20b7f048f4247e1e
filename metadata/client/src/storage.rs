//! Off-chain content storage for token images and JSON descriptors.

use {
    async_trait::async_trait,
    log::debug,
    reqwest::{
        multipart::{Form, Part},
        Client,
    },
    serde::{Deserialize, Serialize},
    solana_sdk::hash::hash,
    std::{
        collections::HashMap,
        fs, io,
        path::Path,
        sync::RwLock,
        time::Duration,
    },
    thiserror::Error,
};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("no content stored at {0}")]
    NotFound(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A named blob ready to be uploaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageFile {
    pub buffer: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

impl StorageFile {
    pub fn new(buffer: Vec<u8>, file_name: &str) -> Self {
        Self {
            buffer,
            file_name: file_name.to_string(),
            content_type: content_type_for(file_name).to_string(),
        }
    }

    /// Read a local file; the file name is kept for the content type.
    pub fn from_path(path: &Path) -> StorageResult<Self> {
        let buffer = fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(buffer, &file_name))
    }

    pub fn json<T: Serialize>(value: &T, file_name: &str) -> serde_json::Result<Self> {
        Ok(Self {
            buffer: serde_json::to_vec(value)?,
            file_name: file_name.to_string(),
            content_type: "application/json".to_string(),
        })
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

/// Content storage returning a stable URI per upload. Uploads never update
/// existing content in place.
#[async_trait]
pub trait StorageDriver: Send + Sync {
    async fn upload(&self, file: &StorageFile) -> StorageResult<String>;

    async fn download(&self, uri: &str) -> StorageResult<Vec<u8>>;
}

/// Reply of the Kubo `add` call; `Hash` is the CID of the uploaded content.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AddResponse {
    hash: String,
}

/// IPFS storage through the Kubo RPC API of a node: each file is posted as
/// multipart field `file` to `<api_url>/api/v0/add` and pinned there. The
/// returned CID is served from `<gateway_url>/ipfs/<cid>`, so identical
/// content always maps to the same URI.
#[derive(Debug)]
pub struct IpfsStorage {
    client: Client,
    api_url: String,
    gateway_url: String,
}

impl IpfsStorage {
    pub const ADD_PATH: &'static str = "/api/v0/add";

    pub fn new(api_url: &str, gateway_url: &str, timeout: Duration) -> StorageResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn add_url(&self) -> String {
        format!("{}{}?cid-version=1&pin=true", self.api_url, Self::ADD_PATH)
    }

    pub fn uri_for(&self, cid: &str) -> String {
        format!("{}/ipfs/{}", self.gateway_url, cid)
    }
}

#[async_trait]
impl StorageDriver for IpfsStorage {
    async fn upload(&self, file: &StorageFile) -> StorageResult<String> {
        debug!(
            "Adding {} ({} bytes, {}) to IPFS",
            file.file_name,
            file.buffer.len(),
            file.content_type
        );
        let part = Part::bytes(file.buffer.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)?;
        let response = self
            .client
            .post(self.add_url())
            .multipart(Form::new().part("file", part))
            .send()
            .await?
            .error_for_status()?
            .json::<AddResponse>()
            .await?;

        Ok(self.uri_for(&response.hash))
    }

    async fn download(&self, uri: &str) -> StorageResult<Vec<u8>> {
        let bytes = self
            .client
            .get(uri)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}

/// In-process storage keyed by the SHA-256 of the content.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub const URI_SCHEME: &'static str = "memory://";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.read().map(|files| files.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl StorageDriver for MemoryStorage {
    async fn upload(&self, file: &StorageFile) -> StorageResult<String> {
        let uri = format!("{}{}", Self::URI_SCHEME, hash(&file.buffer));
        let mut files = self
            .files
            .write()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "memory storage lock poisoned"))?;
        files
            .entry(uri.clone())
            .or_insert_with(|| file.buffer.clone());
        Ok(uri)
    }

    async fn download(&self, uri: &str) -> StorageResult<Vec<u8>> {
        let files = self
            .files
            .read()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "memory storage lock poisoned"))?;
        files
            .get(uri)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(uri.to_string()))
    }
}
