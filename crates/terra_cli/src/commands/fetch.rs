//! Fetch command implementation.

use super::print_records;
use futures::StreamExt;
use terra_core::Record;
use terra_sync::{CachePolicy, Catalog, HttpRemoteSource, Resource};

/// Runs the fetch command.
///
/// Text output reports every state as it arrives; JSON output prints only
/// the final records.
pub async fn run(
    catalog: &Catalog<HttpRemoteSource>,
    policy: CachePolicy,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = format != "json";
    let mut states = catalog.fetch_catalog(policy);
    let mut last: Option<Vec<Record>> = None;

    while let Some(state) = states.next().await {
        match state {
            Resource::Loading => {
                if text {
                    println!("Loading catalog ({policy})...");
                }
            }
            Resource::Success(records) => {
                if text {
                    println!("Received {} records", records.len());
                }
                last = Some(records);
            }
            Resource::Error(error) => return Err(error.into()),
        }
    }

    let records = last.unwrap_or_default();
    if text {
        println!();
        print_records(&records);
    } else {
        println!("{}", serde_json::to_string_pretty(&records)?);
    }

    Ok(())
}
