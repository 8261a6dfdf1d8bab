//! Search history and recently viewed commands.

use terra_sync::{Catalog, HttpRemoteSource};

/// Lists saved queries, newest first.
pub fn list_history(catalog: &Catalog<HttpRemoteSource>) {
    let history = catalog.preferences().search_history();
    if history.is_empty() {
        println!("No saved searches.");
    }
    for entry in history {
        println!("{}", entry.query);
    }
}

/// Saves a query.
pub fn add_history(
    catalog: &Catalog<HttpRemoteSource>,
    query: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if !catalog.preferences().add_search(query)? {
        return Err("Query must not be blank".into());
    }
    Ok(())
}

/// Removes a saved query.
pub fn remove_history(
    catalog: &Catalog<HttpRemoteSource>,
    query: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if !catalog.preferences().remove_search(query)? {
        println!("No saved search matches {query:?}.");
    }
    Ok(())
}

/// Lists recently viewed records, newest first, with names when cached.
pub fn list_recent(catalog: &Catalog<HttpRemoteSource>) {
    let recent = catalog.preferences().recently_viewed();
    if recent.is_empty() {
        println!("Nothing viewed yet.");
    }
    for entry in recent {
        match catalog.store().get_by_code(&entry.code) {
            Some(record) => println!("{}  {}", entry.code, record.name),
            None => println!("{}", entry.code),
        }
    }
}
