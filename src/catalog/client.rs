use super::types::{ListingMode, MovieDetail, MovieSummary, ResultPage};
use futures::StreamExt;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::redirect::Policy;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/original";
pub const DEFAULT_LANGUAGE: &str = "en-US";

const MAX_RESPONSE_SIZE: usize = 5 * 1024 * 1024; // 5MB

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Request timed out")]
    Timeout,
    #[error("Network error: {0}")]
    Network(reqwest::Error),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Insecure API base URL: HTTPS required (except localhost for testing)")]
    InsecureBaseUrl,
    #[error("Detail response was for movie {received}, expected {expected}")]
    MismatchedDetail { expected: u64, received: u64 },
    #[error("Fetch task panicked: {0}")]
    TaskPanicked(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CatalogError::Timeout
        } else {
            CatalogError::Network(e)
        }
    }
}

/// Connection settings for [`CatalogClient`].
#[derive(Clone)]
pub struct CatalogOptions {
    pub api_base: String,
    pub image_base: String,
    pub language: String,
    pub token: Option<SecretString>,
    pub timeout: Duration,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            image_base: DEFAULT_IMAGE_BASE.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            token: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl std::fmt::Debug for CatalogOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogOptions")
            .field("api_base", &self.api_base)
            .field("image_base", &self.image_base)
            .field("language", &self.language)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Redirects are capped at 3 hops and loops are refused.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }
        if attempt
            .previous()
            .iter()
            .any(|prev| prev.as_str() == attempt.url().as_str())
        {
            return attempt.error("Redirect loop detected");
        }
        tracing::debug!(to = %attempt.url(), hop = attempt.previous().len() + 1, "Following redirect");
        attempt.follow()
    })
}

/// Typed client for the movie catalog endpoints.
///
/// Cheap to clone: spawned fetch tasks each take their own handle. Every call
/// is a single attempt; callers decide what a failure means.
#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    api_base: Arc<str>,
    image_base: Arc<str>,
    language: Arc<str>,
    token: Option<Arc<SecretString>>,
}

impl CatalogClient {
    pub fn new(options: CatalogOptions) -> Result<Self, CatalogError> {
        let api_base = options.api_base.trim().trim_end_matches('/').to_string();
        let parsed =
            Url::parse(&api_base).map_err(|e| CatalogError::InvalidBaseUrl(e.to_string()))?;

        // The bearer token rides on every request, so plain HTTP is only
        // acceptable against a local test server.
        if parsed.scheme() != "https" {
            let is_localhost = parsed.scheme() == "http"
                && matches!(parsed.host_str(), Some("127.0.0.1") | Some("localhost"));
            if !is_localhost {
                tracing::error!(base_url = %api_base, "Rejecting non-HTTPS catalog base URL");
                return Err(CatalogError::InsecureBaseUrl);
            }
            tracing::warn!(base_url = %api_base, "Using non-HTTPS catalog base URL (localhost only)");
        }

        if options.token.is_none() {
            tracing::warn!("No catalog API token configured; requests will be unauthenticated");
        }

        let http = reqwest::Client::builder()
            .redirect(create_redirect_policy())
            .pool_idle_timeout(Duration::from_secs(30))
            .timeout(options.timeout)
            .build()
            .map_err(CatalogError::Network)?;

        Ok(Self {
            http,
            api_base: Arc::from(api_base),
            image_base: Arc::from(options.image_base.trim_end_matches('/')),
            language: Arc::from(options.language),
            token: options.token.map(Arc::new),
        })
    }

    /// Build a displayable image URL from a relative poster or logo path.
    pub fn image_url(&self, path: Option<&str>) -> Option<String> {
        image_url(&self.image_base, path)
    }

    /// Movies currently in theaters.
    pub async fn now_playing(&self) -> Result<Vec<MovieSummary>, CatalogError> {
        let url = self.endpoint("movie/now_playing")?;
        Ok(self.get_json::<ResultPage>(url).await?.results)
    }

    pub async fn popular(&self) -> Result<Vec<MovieSummary>, CatalogError> {
        let mut url = self.endpoint("movie/popular")?;
        url.query_pairs_mut()
            .append_pair("language", &self.language)
            .append_pair("page", "1");
        Ok(self.get_json::<ResultPage>(url).await?.results)
    }

    /// Fetch the collection bound to `mode`.
    pub async fn listing(&self, mode: ListingMode) -> Result<Vec<MovieSummary>, CatalogError> {
        match mode {
            ListingMode::New => self.now_playing().await,
            ListingMode::Popular => self.popular().await,
        }
    }

    /// Server-side free-text search. The query is URL-encoded here.
    pub async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, CatalogError> {
        let mut url = self.endpoint("search/movie")?;
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("include_adult", "false")
            .append_pair("language", &self.language)
            .append_pair("page", "1");
        Ok(self.get_json::<ResultPage>(url).await?.results)
    }

    pub async fn detail(&self, movie_id: u64) -> Result<MovieDetail, CatalogError> {
        let url = self.endpoint(&format!("movie/{}", movie_id))?;
        self.get_json(url).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, CatalogError> {
        Url::parse(&format!("{}/{}", self.api_base, path))
            .map_err(|e| CatalogError::InvalidBaseUrl(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        tracing::debug!(path = %url.path(), "Catalog request");

        let mut request = self.http.get(url).header(ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.header(
                AUTHORIZATION,
                format!("Bearer {}", token.expose_secret()),
            );
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::HttpStatus(status.as_u16()));
        }

        let body = read_limited_bytes(response, MAX_RESPONSE_SIZE).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Concatenate the image CDN base with a relative path.
pub fn image_url(base: &str, path: Option<&str>) -> Option<String> {
    let path = path.map(str::trim).filter(|p| !p.is_empty())?;
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        Some(format!("{}{}", base, path))
    } else {
        Some(format!("{}/{}", base, path))
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, CatalogError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(CatalogError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(CatalogError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}
