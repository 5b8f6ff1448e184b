//! Audiobookshelf API integration
//!
//! Reads series listings, writes resolved ASINs back to items, and handles
//! login and library discovery.
//!
//! API docs: https://api.audiobookshelf.org/

mod adapter;
mod client;
pub mod dto;
mod error;
pub mod traits;

pub use client::AbsClient;
pub use error::LibraryError;
pub use traits::LibraryApi;
