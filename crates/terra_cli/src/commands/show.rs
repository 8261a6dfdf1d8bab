//! Show command implementation.

use super::format_count;
use terra_core::Record;
use terra_sync::{CachePolicy, Catalog, HttpRemoteSource};

/// Runs the show command. A successful lookup is recorded as recently
/// viewed.
pub async fn run(
    catalog: &Catalog<HttpRemoteSource>,
    code: &str,
    policy: CachePolicy,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let record = catalog.get_by_code(code, policy).settle().await?;
    catalog.preferences().add_recent(&record.code)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&record)?),
        _ => print_text_output(&record),
    }
    Ok(())
}

fn print_text_output(record: &Record) {
    println!("{} ({})", record.name, record.code);
    println!("{}", "=".repeat(record.name.len() + record.code.len() + 3));
    println!();
    println!("  Short code:  {}", record.short_code);
    println!("  Capital:     {}", record.capital);
    println!("  Region:      {}", record.category);
    println!("  Subregion:   {}", record.subcategory);
    println!("  Population:  {}", format_count(record.population));
    println!("  Area:        {:.1} km²", record.area);
    println!("  Dial code:   {}", record.dial_code);
    println!("  Location:    {:.2}, {:.2}", record.latitude, record.longitude);

    let languages: Vec<&str> = record
        .languages
        .iter()
        .filter_map(|l| l.name.as_deref())
        .collect();
    println!("  Languages:   {}", languages.join(", "));

    let currencies: Vec<String> = record
        .currencies
        .iter()
        .map(|c| {
            let code = c.code.as_deref().unwrap_or("?");
            match c.symbol.as_deref() {
                Some(symbol) => format!("{code} ({symbol})"),
                None => code.to_string(),
            }
        })
        .collect();
    println!("  Currencies:  {}", currencies.join(", "));

    if !record.flag_url.is_empty() {
        println!("  Flag:        {}", record.flag_url);
    }
}
