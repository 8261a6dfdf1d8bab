//! CLI command implementations.

pub mod fetch;
pub mod prefs;
pub mod search;
pub mod show;
pub mod stats;

use terra_core::Record;

/// Prints one line per record.
pub fn print_records(records: &[Record]) {
    for record in records {
        println!("{}", record_line(record));
    }
}

/// A one-line summary of a record.
pub fn record_line(record: &Record) -> String {
    let capital = if record.capital.is_empty() {
        "-"
    } else {
        record.capital.as_str()
    };
    format!(
        "{:<4} {:<32} {:<20} {:<10} {:>13}",
        record.code,
        record.name,
        capital,
        record.category,
        format_count(record.population)
    )
}

/// Formats a count with thousands separators.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(38_005_238), "38,005,238");
    }

    #[test]
    fn test_record_line_without_capital() {
        let record = Record::new("ATA", "Antarctica");
        let line = record_line(&record);
        assert!(line.starts_with("ATA  Antarctica"));
        assert!(line.contains(" - "));
    }
}
