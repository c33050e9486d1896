//! # api: interface to the biblib HTTP API
//!
//! This module defines a single trait ([`LibraryService`]) covering the four
//! endpoints the copy needs — paged library read, library listing, library
//! creation, and bulk document addition — plus the concrete reqwest-backed
//! client ([`AdsClient`]).
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall` so consumers can generate
//!   deterministic mocks for unit/integration tests.
//!
//! ## Errors
//! - All methods return [`ApiError`], which keeps transport failures,
//!   non-success statuses, and malformed bodies distinguishable at the
//!   call site.

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::config::LibraryConfig;

/// Metadata block returned alongside every library page.
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryMetadata {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub num_documents: usize,
}

/// One page of a library's contents: metadata plus the bibcodes in
/// server-returned order.
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryPage {
    pub metadata: LibraryMetadata,
    pub documents: Vec<String>,
}

/// A library as it appears in the account-wide listing.
#[derive(Debug, Clone, Deserialize)]
pub struct LibrarySummary {
    pub id: String,
    pub name: String,
}

/// Request to create a destination library with its first batch of bibcodes.
pub struct NewLibrary<'a> {
    pub name: &'a str,
    pub description: &'a str,
    /// Visibility flag; the copy always creates private libraries.
    pub public: bool,
    pub bibcodes: &'a [String],
}

/// Server response after creating a library.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedLibrary {
    pub id: String,
}

/// Server response after a bulk add. The count is absent on some
/// responses; callers must not treat absence as zero additions.
#[derive(Debug, Clone, Deserialize)]
pub struct AddOutcome {
    #[serde(default)]
    pub number_added: Option<u64>,
}

/// Error type for all LibraryService calls.
#[derive(Debug)]
pub enum ApiError {
    /// Non-success HTTP status, with the server's error message when the
    /// body carried one.
    Status { status: u16, message: String },
    /// Response body did not match the expected structure.
    Malformed(String),
    /// Connection, TLS, or timeout failure before a usable response arrived.
    Transport(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Status { status, message } => {
                write!(f, "API returned HTTP {status}: {message}")
            }
            ApiError::Malformed(msg) => write!(f, "Malformed API response: {msg}"),
            ApiError::Transport(msg) => write!(f, "Transport failure: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Malformed(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

/// Trait for reading and writing biblib libraries asynchronously.
/// Implemented by the real API client and by test mocks.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait LibraryService: Send + Sync {
    /// Fetch one page of a library's contents, `rows` bibcodes starting at
    /// offset `start`, requesting only the bibcode field.
    async fn get_library_page(
        &self,
        library_id: &str,
        start: usize,
        rows: usize,
    ) -> Result<LibraryPage, ApiError>;

    /// List all libraries owned by the authenticated account.
    async fn list_libraries(&self) -> Result<Vec<LibrarySummary>, ApiError>;

    /// Create a new library carrying its first batch of bibcodes.
    async fn create_library<'a>(&self, req: NewLibrary<'a>) -> Result<CreatedLibrary, ApiError>;

    /// Add a batch of bibcodes to an existing library.
    async fn add_documents(
        &self,
        library_id: &str,
        bibcodes: &[String],
    ) -> Result<AddOutcome, ApiError>;
}

/// Concrete client against the ADS biblib API.
///
/// Carries the base URL and bearer token from the run configuration; all
/// requests share one pooled reqwest client with a bounded timeout.
pub struct AdsClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

impl AdsClient {
    pub fn new(config: &LibraryConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(AdsClient {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    fn auth_header(&self) -> String {
        // The biblib API expects "Bearer:{token}", colon-separated.
        format!("Bearer:{}", self.token)
    }

    /// Turns a non-success response into an ApiError, extracting the
    /// server's JSON error message when one is present.
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or(body);
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl LibraryService for AdsClient {
    async fn get_library_page(
        &self,
        library_id: &str,
        start: usize,
        rows: usize,
    ) -> Result<LibraryPage, ApiError> {
        let url = format!("{}/libraries/{}", self.base_url, library_id);
        let resp = self
            .http
            .get(&url)
            .header("Authorization", self.auth_header())
            .query(&[
                ("start", start.to_string()),
                ("rows", rows.to_string()),
                ("fl", "bibcode".to_string()),
            ])
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        resp.json::<LibraryPage>()
            .await
            .map_err(|e| ApiError::Malformed(e.to_string()))
    }

    async fn list_libraries(&self) -> Result<Vec<LibrarySummary>, ApiError> {
        #[derive(Deserialize)]
        struct Listing {
            libraries: Vec<LibrarySummary>,
        }

        let url = format!("{}/libraries", self.base_url);
        let resp = self
            .http
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        let listing = resp
            .json::<Listing>()
            .await
            .map_err(|e| ApiError::Malformed(e.to_string()))?;
        Ok(listing.libraries)
    }

    async fn create_library<'a>(&self, req: NewLibrary<'a>) -> Result<CreatedLibrary, ApiError> {
        let url = format!("{}/libraries", self.base_url);
        let body = serde_json::json!({
            "name": req.name,
            "description": req.description,
            "public": req.public,
            "bibcode": req.bibcodes,
        });
        let resp = self
            .http
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(&body)
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        resp.json::<CreatedLibrary>()
            .await
            .map_err(|e| ApiError::Malformed(e.to_string()))
    }

    async fn add_documents(
        &self,
        library_id: &str,
        bibcodes: &[String],
    ) -> Result<AddOutcome, ApiError> {
        let url = format!("{}/documents/{}", self.base_url, library_id);
        let body = serde_json::json!({
            "bibcode": bibcodes,
            "action": "add",
        });
        let resp = self
            .http
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(&body)
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        resp.json::<AddOutcome>()
            .await
            .map_err(|e| ApiError::Malformed(e.to_string()))
    }
}
