//! Search page scraping.

use std::sync::LazyLock;

use regex::Regex;

use crate::enrichment::domain::Asin;

static DATA_ASIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"data-asin="(B0[A-Z0-9]{8})""#).unwrap());

/// Keywords sent to the search page for a title/author pair.
pub fn search_query(title: &str, author: &str) -> String {
    format!("{title} {author}")
}

/// Find the first `data-asin="B0…"` attribute in a search results page.
pub fn extract_asin(html: &str) -> Option<Asin> {
    DATA_ASIN
        .captures(html)
        .and_then(|caps| caps.get(1))
        .and_then(|m| Asin::parse(m.as_str()))
}
