//! Internal domain models for ASIN enrichment.
//!
//! These types are OUR types - they don't change when the search page or the
//! library API change. Scraped values only become an [`Asin`] after passing
//! validation.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static ASIN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^B0[A-Z0-9]{8}$").unwrap());

/// An Audible catalog identifier (`B0` followed by eight upper-case
/// alphanumerics).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Asin(String);

impl Asin {
    /// Validate and wrap an identifier. Returns `None` if the text does not
    /// match the ASIN pattern exactly.
    pub fn parse(value: &str) -> Option<Self> {
        ASIN_PATTERN
            .is_match(value)
            .then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Asin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Asin {
    type Error = EnrichmentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or(EnrichmentError::InvalidAsin(value))
    }
}

impl From<Asin> for String {
    fn from(asin: Asin) -> Self {
        asin.0
    }
}

/// A memoized search outcome.
///
/// A cache key maps to exactly one of these; a missing key means the pair was
/// never searched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry {
    /// The search found this identifier
    Found(Asin),
    /// The search ran and found nothing (or failed)
    NotFound,
}

impl CacheEntry {
    pub fn asin(&self) -> Option<&Asin> {
        match self {
            Self::Found(asin) => Some(asin),
            Self::NotFound => None,
        }
    }

    pub fn into_asin(self) -> Option<Asin> {
        match self {
            Self::Found(asin) => Some(asin),
            Self::NotFound => None,
        }
    }
}

impl From<Option<Asin>> for CacheEntry {
    fn from(result: Option<Asin>) -> Self {
        result.map_or(Self::NotFound, Self::Found)
    }
}

/// Errors that can occur during an ASIN search
#[derive(Debug, Clone, thiserror::Error)]
pub enum EnrichmentError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Search page returned HTTP {0}")]
    HttpStatus(u16),

    #[error("No ASIN found on the search page")]
    NoMatches,

    #[error("Not a valid ASIN: {0:?}")]
    InvalidAsin(String),

    #[error("Unknown Audible region: {0:?}")]
    UnknownRegion(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}
