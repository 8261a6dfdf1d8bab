//! Stats command implementation.

use serde::Serialize;
use std::path::Path;
use terra_core::CacheStats;
use terra_sync::{Catalog, HttpRemoteSource};

/// Cache report.
#[derive(Debug, Serialize)]
pub struct StatsReport {
    /// Data directory.
    pub path: String,
    /// In-memory cache statistics.
    pub cache: CacheStats,
    /// Size of the persisted snapshot in bytes.
    pub persisted_bytes: u64,
    /// Number of saved search queries.
    pub search_history: usize,
    /// Number of recently viewed records.
    pub recently_viewed: usize,
}

/// Runs the stats command.
pub fn run(
    catalog: &Catalog<HttpRemoteSource>,
    path: &Path,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = StatsReport {
        path: path.display().to_string(),
        cache: catalog.cache_stats(),
        persisted_bytes: catalog.store().persisted_size()?,
        search_history: catalog.preferences().search_history().len(),
        recently_viewed: catalog.preferences().recently_viewed().len(),
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_text_output(&report),
    }
    Ok(())
}

fn print_text_output(report: &StatsReport) {
    println!("Terra Cache");
    println!("===========");
    println!();
    println!("Path: {}", report.path);
    println!();
    println!("Cache:");
    println!("  Records:        {}", report.cache.count);
    println!("  Oldest entry:   {}", format_age(report.cache.oldest_age_ms));
    println!(
        "  Estimated size: {}",
        format_size(report.cache.estimated_size_bytes)
    );
    println!("  On disk:        {}", format_size(report.persisted_bytes));
    println!();
    println!("Preferences:");
    println!("  Saved searches:  {}", report.search_history);
    println!("  Recently viewed: {}", report.recently_viewed);
}

fn format_age(age_ms: Option<u64>) -> String {
    let Some(ms) = age_ms else {
        return "-".to_string();
    };
    let secs = ms / 1000;
    if secs < 60 {
        format!("{secs}s ago")
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86_400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86_400)
    }
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} bytes", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(None), "-");
        assert_eq!(format_age(Some(5_000)), "5s ago");
        assert_eq!(format_age(Some(120_000)), "2m ago");
        assert_eq!(format_age(Some(7_200_000)), "2h ago");
        assert_eq!(format_age(Some(172_800_000)), "2d ago");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 bytes");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
