//! Audible marketplaces.

use std::fmt;
use std::str::FromStr;

use crate::enrichment::domain::EnrichmentError;

/// Marketplace whose search page is scraped.
///
/// ASINs differ between marketplaces for the same title, so this should match
/// the region the library's metadata provider uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AudibleRegion {
    #[default]
    De,
    Us,
    Uk,
    Ca,
    Au,
    Fr,
    It,
    Es,
    Jp,
    In,
}

impl AudibleRegion {
    pub const ALL: [AudibleRegion; 10] = [
        Self::De,
        Self::Us,
        Self::Uk,
        Self::Ca,
        Self::Au,
        Self::Fr,
        Self::It,
        Self::Es,
        Self::Jp,
        Self::In,
    ];

    /// Short region code, as used by Audiobookshelf.
    pub fn code(self) -> &'static str {
        match self {
            Self::De => "de",
            Self::Us => "us",
            Self::Uk => "uk",
            Self::Ca => "ca",
            Self::Au => "au",
            Self::Fr => "fr",
            Self::It => "it",
            Self::Es => "es",
            Self::Jp => "jp",
            Self::In => "in",
        }
    }

    /// Storefront root, without trailing slash.
    pub fn base_url(self) -> &'static str {
        match self {
            Self::De => "https://www.audible.de",
            Self::Us => "https://www.audible.com",
            Self::Uk => "https://www.audible.co.uk",
            Self::Ca => "https://www.audible.ca",
            Self::Au => "https://www.audible.com.au",
            Self::Fr => "https://www.audible.fr",
            Self::It => "https://www.audible.it",
            Self::Es => "https://www.audible.es",
            Self::Jp => "https://www.audible.co.jp",
            Self::In => "https://www.audible.in",
        }
    }
}

impl fmt::Display for AudibleRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AudibleRegion {
    type Err = EnrichmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        if code == "gb" {
            return Ok(Self::Uk);
        }
        Self::ALL
            .into_iter()
            .find(|region| region.code() == code)
            .ok_or_else(|| EnrichmentError::UnknownRegion(s.to_string()))
    }
}
