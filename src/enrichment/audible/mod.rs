//! Audible search page integration
//!
//! There is no public lookup API, so ASINs are scraped from the regular
//! search results page: every result tile carries a `data-asin` attribute.
//! The first one on the page is taken as the match.

mod client;
mod region;
mod scrape;

pub use client::{AudibleClient, BROWSER_USER_AGENT};
pub use region::AudibleRegion;
pub use scrape::{extract_asin, search_query};
