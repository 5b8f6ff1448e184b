//! Single-title ASIN lookup command.

use tokio::runtime::Runtime;

use super::{build_resolver, exit_with_error};
use crate::config::Config;
use crate::error::Error;
use crate::model::UNKNOWN_ASIN;

/// Look up one title (through the cache) and print the ASIN
pub fn cmd_resolve(rt: &Runtime, config: &Config, title: &str, author: &str) -> anyhow::Result<()> {
    if title.trim().is_empty() {
        exit_with_error(&Error::invalid_input("Title must not be empty"));
    }

    let mut resolver = match build_resolver(config) {
        Ok(resolver) => resolver,
        Err(e) => exit_with_error(&e),
    };

    let cached = resolver.cached(title, author).is_some();
    let asin = rt.block_on(resolver.resolve(title, author));

    match asin {
        Some(asin) => println!("{}", asin),
        None => {
            println!("{}", UNKNOWN_ASIN);
            if !cached {
                eprintln!("No match on {}", resolver.search_client().base_url());
            }
        }
    }
    Ok(())
}
