//! Cache command - inspect the artifact cache

use crate::artifact::{ArtifactCache, CacheEntry};
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::config::Config;
use crate::error::{CairnError, CairnResult};
use console::style;
use url::Url;

/// Execute the cache command
pub fn execute(args: CacheArgs, config: &Config) -> CairnResult<()> {
    match args.action {
        CacheAction::List { format, cache_dir } => {
            let cache = open_cache(cache_dir, config);
            list_entries(&cache, format)
        }
        CacheAction::Path { url, cache_dir } => {
            let cache = open_cache(cache_dir, config);
            show_path(&cache, &url)
        }
    }
}

fn open_cache(override_dir: Option<std::path::PathBuf>, config: &Config) -> ArtifactCache {
    ArtifactCache::new(override_dir.unwrap_or_else(|| config.cache.base_path.clone()))
}

fn list_entries(cache: &ArtifactCache, format: OutputFormat) -> CairnResult<()> {
    let entries = cache.entries()?;

    if entries.is_empty() {
        match format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Text => {
                println!("Cache at {} is empty", cache.root().display());
            }
        }
        return Ok(());
    }

    match format {
        OutputFormat::Text => print_table(cache, &entries),
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Plain => print_plain(&entries),
    }

    Ok(())
}

fn print_table(cache: &ArtifactCache, entries: &[CacheEntry]) {
    println!("Cache root: {}", cache.root().display());
    println!();
    println!(
        "{:<56} {:<16}",
        style("ENTRY").bold(),
        style("LAST USED").bold()
    );
    println!("{}", "-".repeat(72));

    for entry in entries {
        let last_used = entry
            .last_used
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!("{:<56} {:<16}", entry.rel_path.display(), last_used);
    }

    println!();
    println!("{} entries", entries.len());
}

fn print_json(entries: &[CacheEntry]) -> CairnResult<()> {
    let items: Vec<_> = entries
        .iter()
        .map(|entry| {
            serde_json::json!({
                "path": entry.rel_path,
                "lastUsed": entry.last_used.map(|t| t.to_rfc3339()),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(())
}

fn print_plain(entries: &[CacheEntry]) {
    for entry in entries {
        println!("{}", entry.rel_path.display());
    }
}

fn show_path(cache: &ArtifactCache, raw: &str) -> CairnResult<()> {
    let url = Url::parse(raw).map_err(|e| CairnError::UrlInvalid {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    println!("{}", cache.entry_path(&url)?.display());
    Ok(())
}
