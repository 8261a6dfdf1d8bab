//! Search command implementation.

use super::print_records;
use terra_core::{SearchFilters, SortOrder};
use terra_sync::{Catalog, HttpRemoteSource};

/// Runs the search command.
///
/// Starts from the saved filters; `regions` and `sort` override them for
/// this search only.
pub fn run(
    catalog: &Catalog<HttpRemoteSource>,
    query: &str,
    regions: Vec<String>,
    sort: Option<SortOrder>,
    save_history: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let filters = effective_filters(catalog.preferences().filters(), regions, sort);
    let results = catalog.browse(query, &filters);

    if save_history {
        catalog.preferences().add_search(query)?;
    }

    if results.is_empty() {
        if catalog.cache_stats().is_empty() {
            println!("No cached records. Run `terra fetch` first.");
        } else {
            println!("No matches.");
        }
        return Ok(());
    }

    print_records(&results);
    println!();
    println!("{} matches (sorted {})", results.len(), filters.sort);
    Ok(())
}

fn effective_filters(
    mut saved: SearchFilters,
    regions: Vec<String>,
    sort: Option<SortOrder>,
) -> SearchFilters {
    if !regions.is_empty() {
        saved.categories = regions.into_iter().collect();
    }
    if let Some(sort) = sort {
        saved.sort = sort;
    }
    saved
}
