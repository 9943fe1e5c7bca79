//! HTTP client for registry communication.
//!
//! A thin client built on reqwest for the one endpoint this tool needs:
//! `GET /v2/<name>/tags/list`, in the extended form served by Google
//! Container Registry and Artifact Registry, which carries per-manifest
//! metadata next to the tag names.

use crate::auth::Credentials;
use crate::error::{GcrError, Result};
use crate::manifest::ManifestListing;
use reqwest::{Client as ReqwestClient, Response, StatusCode};
use std::collections::HashSet;
use std::time::Duration;


/// Configuration for the HTTP client.
///
/// # Examples
///
/// ```
/// use libgcrcleaner::client::ClientConfig;
///
/// let config = ClientConfig::new().with_timeout(60);
/// assert_eq!(config.timeout_seconds, 60);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: 30)
    pub timeout_seconds: u64,
    /// Maximum idle connections per host (default: 10)
    pub max_idle_per_host: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            max_idle_per_host: 10,
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the maximum idle connections per host.
    pub fn with_max_idle_per_host(mut self, max: usize) -> Self {
        self.max_idle_per_host = max;
        self
    }
}

/// HTTP client bound to one registry.
#[derive(Debug, Clone)]
pub struct Client {
    /// The underlying HTTP client
    http_client: ReqwestClient,
    /// Base registry URL (e.g., "https://gcr.io")
    registry_url: String,
    /// Request timeout, kept for error messages
    timeout_seconds: u64,
}

impl Client {
    /// Creates a new client for the specified registry URL with default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use libgcrcleaner::client::Client;
    ///
    /// let client = Client::new("gcr.io").unwrap();
    /// assert_eq!(client.registry_url(), "https://gcr.io");
    /// ```
    pub fn new(registry_url: &str) -> Result<Self> {
        Self::with_config(registry_url, ClientConfig::default())
    }

    /// Creates a new client for the specified registry URL with custom configuration.
    pub fn with_config(registry_url: &str, config: ClientConfig) -> Result<Self> {
        let normalized_url = Self::normalize_url(registry_url)?;

        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .user_agent(concat!("gcrcleaner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GcrError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            http_client,
            registry_url: normalized_url,
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// Normalizes a registry URL by ensuring it has a scheme and removing trailing slashes.
    fn normalize_url(url: &str) -> Result<String> {
        let url = url.trim();

        if url.is_empty() {
            return Err(GcrError::validation("Registry URL cannot be empty"));
        }

        let url = if !url.starts_with("http://") && !url.starts_with("https://") {
            format!("https://{}", url)
        } else {
            url.to_string()
        };

        Ok(url.trim_end_matches('/').to_string())
    }

    /// Returns the base registry URL.
    pub fn registry_url(&self) -> &str {
        &self.registry_url
    }

    /// Lists every manifest in `repository`.
    ///
    /// Follows `Link: <...>; rel="next"` headers until the last page and
    /// merges the pages into one listing. Pagination stops at the first
    /// page that was already fetched.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The registry is unreachable or the request times out
    /// - The credentials are rejected (401 or 403)
    /// - The repository does not exist
    /// - The response cannot be decoded
    /// - A `Link` header points away from the registry
    pub async fn list_manifests(
        &self,
        repository: &str,
        credentials: &Credentials,
    ) -> Result<ManifestListing> {
        let mut listing = ManifestListing::default();
        let mut url = format!("{}/v2/{}/tags/list", self.registry_url, repository);
        let mut visited = HashSet::new();
        let mut pages = 0usize;

        loop {
            visited.insert(url.clone());

            tracing::debug!(%url, "requesting manifest listing page");

            let mut request = self.http_client.get(&url);
            if let Some(auth_header) = credentials.to_header_value() {
                request = request.header(reqwest::header::AUTHORIZATION, auth_header);
            }

            let response = request
                .send()
                .await
                .map_err(|e| self.translate_reqwest_error(e))?;

            // Extract Link header for pagination before consuming response
            let next_path = Self::extract_next_link(response.headers());

            let response = Self::check_response_status(response).await?;

            let page: ManifestListing = response.json().await.map_err(|e| {
                GcrError::validation_with_source("Failed to parse tags list response", e)
            })?;

            pages += 1;
            listing.merge(page);

            let Some(path) = next_path else { break };
            let next_url = self.resolve_next_url(&url, &path)?;
            if visited.contains(&next_url) {
                tracing::warn!(url = %next_url, "pagination revisits a fetched page, stopping");
                break;
            }
            url = next_url;
        }

        tracing::debug!(
            pages,
            manifests = listing.manifests.len(),
            "manifest listing complete"
        );

        Ok(listing)
    }

    /// Resolves a `Link` target against the page it was served with.
    ///
    /// Only targets on the registry's own origin are followed, so
    /// credentials never leave it.
    fn resolve_next_url(&self, current: &str, target: &str) -> Result<String> {
        if target.starts_with('/') && !target.starts_with("//") {
            return Ok(format!("{}{}", self.registry_url, target));
        }

        if target.starts_with('?') {
            let base = current.split('?').next().unwrap_or(current);
            return Ok(format!("{}{}", base, target));
        }

        let origin = format!("{}/", self.registry_url);
        if target.starts_with(&origin) {
            return Ok(target.to_string());
        }

        Err(GcrError::validation(format!(
            "refusing to follow pagination link to {} outside {}",
            target, self.registry_url
        )))
    }

    /// Extracts the next page URL from the Link header.
    ///
    /// Format: `</v2/project/app/tags/list?n=100&last=v9>; rel="next"`
    fn extract_next_link(headers: &reqwest::header::HeaderMap) -> Option<String> {
        let link_header = headers.get(reqwest::header::LINK)?;
        let link_str = link_header.to_str().ok()?;

        for link_part in link_str.split(',') {
            let link_part = link_part.trim();

            if link_part.contains("rel=\"next\"") || link_part.contains("rel='next'") {
                if let Some(start) = link_part.find('<')
                    && let Some(len) = link_part[start + 1..].find('>')
                {
                    return Some(link_part[start + 1..start + 1 + len].to_string());
                }
            }
        }

        None
    }

    /// Translates a reqwest error into a GcrError.
    fn translate_reqwest_error(&self, error: reqwest::Error) -> GcrError {
        if error.is_timeout() {
            GcrError::network(format!(
                "Request to {} timed out after {} seconds",
                self.registry_url, self.timeout_seconds
            ))
        } else if error.is_connect() {
            GcrError::network_with_source(
                format!("Failed to connect to registry at {}", self.registry_url),
                error,
            )
        } else {
            GcrError::network_with_source(
                format!("Network error communicating with {}", self.registry_url),
                error,
            )
        }
    }

    /// Checks the HTTP response status and translates errors to GcrError.
    async fn check_response_status(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("(unable to read response body)"));

        match status {
            StatusCode::UNAUTHORIZED => Err(GcrError::authentication(
                format!("Authentication required for {}: {}", url, error_body),
                Some(401),
            )),
            StatusCode::FORBIDDEN => Err(GcrError::authentication(
                format!("Access forbidden for {}: {}", url, error_body),
                Some(403),
            )),
            StatusCode::NOT_FOUND => Err(GcrError::not_found("repository", url.as_str())),
            StatusCode::TOO_MANY_REQUESTS => Err(GcrError::rate_limit(format!(
                "Rate limit exceeded for {}",
                url
            ))),
            s if s.is_server_error() => Err(GcrError::server(
                format!("Server error from {}: {}", url, error_body),
                status.as_u16(),
            )),
            _ => Err(GcrError::network(format!(
                "HTTP {} from {}: {}",
                status.as_u16(),
                url,
                error_body
            ))),
        }
    }
}
