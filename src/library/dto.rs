//! Audiobookshelf API Data Transfer Objects
//!
//! These types match what the Audiobookshelf server returns, restricted to
//! the fields we read. Every field is optional: older servers and sparse
//! items omit a lot, and missing values get defaults in the adapter.
//! DO NOT use these types outside the library module - convert to domain types.
//!
//! Example series page:
//! ```json
//! {
//!   "total": 45,
//!   "results": [{
//!     "name": "Mystery",
//!     "books": [{
//!       "id": "li_123",
//!       "sequence": "1",
//!       "media": { "metadata": {
//!         "title": "The Case", "authorName": "A. Writer",
//!         "asin": null, "seriesName": "Mystery #1"
//!       } }
//!     }]
//!   }]
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `GET /api/libraries/{id}/series`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SeriesPageResponse {
    pub total: Option<u64>,
    pub results: Vec<Series>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Series {
    pub name: Option<String>,
    pub books: Vec<Book>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Book {
    /// Library item id
    pub id: Option<String>,
    /// Position in this series (string or number)
    pub sequence: Option<Value>,
    pub media: Media,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Media {
    pub metadata: BookMetadata,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookMetadata {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author_name: Option<String>,
    pub asin: Option<String>,
    /// Display series string, e.g. "Mystery #1"
    pub series_name: Option<String>,
    pub sequence: Option<Value>,
}

/// `PATCH /api/items/{id}/media` body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateMediaRequest {
    pub metadata: UpdateMetadata,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateMetadata {
    pub asin: String,
}

/// `POST /login` body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `POST /login` response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoginResponse {
    pub user: Option<LoginUser>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoginUser {
    pub token: Option<String>,
}

/// `GET /api/libraries`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrariesResponse {
    pub libraries: Vec<Library>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Library {
    pub id: Option<String>,
    pub name: Option<String>,
    /// "book" or "podcast"
    pub media_type: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs accept what the real server returns.
// ============================================================================
