//! ASIN enrichment - finds missing Audible identifiers for library books.
//!
//! # Architecture
//!
//! - **Domain models** (`domain.rs`) - [`Asin`], cache outcomes, errors
//! - **Cache** (`cache.rs`) - persistent title/author → ASIN memo
//! - **Audible** (`audible/`) - search page client and scraper
//! - **Traits** (`traits.rs`) - seams for swapping the search client in tests
//! - **Resolver** (`resolver.rs`) - cache-first, throttled lookup
//!
//! # Usage
//!
//! ```ignore
//! use enrichment::{AsinCache, AsinResolver, AudibleClient, AudibleRegion};
//!
//! let client = AudibleClient::new(AudibleRegion::De, Duration::from_secs(5))?;
//! let mut resolver = AsinResolver::new(client, AsinCache::load(AsinCache::default_path()));
//!
//! if let Some(asin) = resolver.resolve("The Case", "A. Writer").await {
//!     println!("ASIN: {asin}");
//! }
//! ```

pub mod audible;
pub mod cache;
pub mod domain;
pub mod resolver;
pub mod traits;

pub use audible::{AudibleClient, AudibleRegion};
pub use cache::{AsinCache, CacheStats};
pub use domain::{Asin, CacheEntry, EnrichmentError};
pub use resolver::{AsinResolver, DEFAULT_LOOKUP_DELAY};
pub use traits::AsinSearch;
