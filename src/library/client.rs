//! Audiobookshelf HTTP client
//!
//! Handles communication with an Audiobookshelf server.
//! See: https://api.audiobookshelf.org/
//!
//! Every call except [`AbsClient::login`] needs a bearer token, either an API
//! key or the token returned by login.

use std::time::Duration;

use super::{adapter, dto, error::LibraryError};
use crate::enrichment::Asin;
use crate::model::{LibrarySummary, SeriesPage};

/// Timeout for login, library listing and series page calls
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for a single write-back call
const WRITE_BACK_TIMEOUT: Duration = Duration::from_secs(5);

/// Audiobookshelf API client, bound to one server
#[derive(Debug)]
pub struct AbsClient {
    http_client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl AbsClient {
    /// Create a client for `base_url`. Trailing slashes are removed.
    pub fn new(base_url: &str) -> Result<Self, LibraryError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .gzip(true)
            .build()
            .map_err(|e| LibraryError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Attach a bearer token (API key or login token)
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into()).filter(|t| !t.is_empty());
        self
    }

    /// Override the timeout for login and read calls
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Log in with username/password and return the user's token
    pub async fn login(&self, username: &str, password: &str) -> Result<String, LibraryError> {
        let url = format!("{}/login", self.base_url);
        let body = dto::LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LibraryError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            return Err(LibraryError::LoginFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                details.chars().take(200).collect::<String>()
            )));
        }

        let login = response
            .json::<dto::LoginResponse>()
            .await
            .map_err(|e| LibraryError::Parse(e.to_string()))?;

        login
            .user
            .and_then(|user| user.token)
            .filter(|token| !token.is_empty())
            .ok_or(LibraryError::MissingToken)
    }

    /// List the server's audiobook libraries (podcast libraries are skipped)
    pub async fn list_libraries(&self) -> Result<Vec<LibrarySummary>, LibraryError> {
        let url = format!("{}/api/libraries", self.base_url);
        let response: dto::LibrariesResponse = self.get_json(&url).await?;
        Ok(adapter::to_book_libraries(response))
    }

    /// Fetch one page of a library's series listing
    pub async fn fetch_series_page(
        &self,
        library_id: &str,
        page: usize,
        limit: usize,
    ) -> Result<SeriesPage, LibraryError> {
        let url = format!(
            "{}/api/libraries/{}/series?limit={}&page={}",
            self.base_url,
            urlencoding::encode(library_id),
            limit,
            page
        );
        let response: dto::SeriesPageResponse = self.get_json(&url).await?;
        Ok(adapter::to_series_page(response))
    }

    /// Set the ASIN on a library item's metadata
    pub async fn update_item_asin(&self, item_id: &str, asin: &Asin) -> Result<(), LibraryError> {
        let token = self.token.as_deref().ok_or(LibraryError::MissingToken)?;
        let url = format!(
            "{}/api/items/{}/media",
            self.base_url,
            urlencoding::encode(item_id)
        );
        let body = dto::UpdateMediaRequest {
            metadata: dto::UpdateMetadata {
                asin: asin.to_string(),
            },
        };

        let response = self
            .http_client
            .patch(&url)
            .bearer_auth(token)
            .json(&body)
            .timeout(WRITE_BACK_TIMEOUT)
            .send()
            .await
            .map_err(|e| LibraryError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LibraryError::Http {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        Ok(())
    }

    /// Best-effort [`update_item_asin`](Self::update_item_asin): logs failures
    /// and reports success as a bool.
    pub async fn write_back(&self, item_id: &str, asin: &Asin) -> bool {
        match self.update_item_asin(item_id, asin).await {
            Ok(()) => {
                tracing::info!("Updated ASIN {} for item {} in Audiobookshelf", asin, item_id);
                true
            }
            Err(e) => {
                tracing::warn!("Failed to update ASIN for item {}: {}", item_id, e);
                false
            }
        }
    }

    /// Authorized GET, decoding a JSON body
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, LibraryError> {
        let token = self.token.as_deref().ok_or(LibraryError::MissingToken)?;

        let response = self
            .http_client
            .get(url)
            .bearer_auth(token)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LibraryError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LibraryError::Http {
                status: status.as_u16(),
                message: format!(
                    "{} - {}",
                    status.canonical_reason().unwrap_or("Unknown"),
                    body.chars().take(200).collect::<String>()
                ),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| LibraryError::Parse(e.to_string()))
    }
}
