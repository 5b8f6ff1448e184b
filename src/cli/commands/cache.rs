//! ASIN cache maintenance command.

use crate::config::Config;
use crate::enrichment::AsinCache;

/// Print cache location and counts, or clear it
pub fn cmd_cache(config: &Config, clear: bool) -> anyhow::Result<()> {
    let mut cache = AsinCache::load(config.enrichment.cache_path());
    let path = cache.path().map(|p| p.display().to_string()).unwrap_or_default();

    if clear {
        let removed = cache.len();
        cache.clear();
        println!("Cleared {} cached lookups from {}", removed, path);
        return Ok(());
    }

    let stats = cache.stats();
    println!("ASIN Cache");
    println!("==========");
    println!("Path:      {}", path);
    println!("Entries:   {}", cache.len());
    println!("  ✓ Found:     {}", stats.found);
    println!("  ✗ Not found: {}", stats.not_found);
    Ok(())
}
