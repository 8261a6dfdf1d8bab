//! Prefix suggestions over record names and capitals.

use terra_codec::Record;

/// Suggests completions for `query`.
///
/// Names starting with the query come first, in record order. Capitals
/// starting with the query fill any remaining slots, skipping values
/// already suggested. Matching ignores case; a blank query yields nothing.
#[must_use]
pub fn suggest(query: &str, records: &[Record], max_suggestions: usize) -> Vec<String> {
    if query.trim().is_empty() || max_suggestions == 0 {
        return Vec::new();
    }
    let prefix = query.to_lowercase();

    let mut out: Vec<String> = records
        .iter()
        .filter(|record| record.name.to_lowercase().starts_with(&prefix))
        .map(|record| record.name.clone())
        .take(max_suggestions)
        .collect();

    if out.len() < max_suggestions {
        for record in records {
            if out.len() == max_suggestions {
                break;
            }
            let capital = &record.capital;
            if !capital.is_empty()
                && capital.to_lowercase().starts_with(&prefix)
                && !out.contains(capital)
            {
                out.push(capital.clone());
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, capital: &str) -> Record {
        let mut record = Record::new("XXX", name);
        record.capital = capital.into();
        record
    }

    #[test]
    fn names_then_capitals() {
        let records = vec![record("Canada", "Ottawa"), record("Australia", "Canberra")];
        assert_eq!(suggest("can", &records, 5), ["Canada", "Canberra"]);
    }

    #[test]
    fn blank_query_is_empty() {
        let records = vec![record("Canada", "Ottawa")];
        assert!(suggest("", &records, 5).is_empty());
        assert!(suggest("  ", &records, 5).is_empty());
    }

    #[test]
    fn capital_equal_to_name_not_duplicated() {
        let records = vec![record("Singapore", "Singapore"), record("Monaco", "Monaco")];
        assert_eq!(suggest("s", &records, 5), ["Singapore"]);
    }

    #[test]
    fn trailing_space_is_matched() {
        let records = vec![
            record("New Zealand", "Wellington"),
            record("Newcaledonia", "Nouméa"),
        ];
        assert_eq!(suggest("new ", &records, 5), ["New Zealand"]);
        assert_eq!(suggest("new", &records, 5), ["New Zealand", "Newcaledonia"]);
    }

    #[test]
    fn truncates_to_max() {
        let records = vec![
            record("Malta", "Valletta"),
            record("Mali", "Bamako"),
            record("Mexico", "Mexico City"),
            record("Oman", "Muscat"),
        ];
        assert_eq!(suggest("M", &records, 2), ["Malta", "Mali"]);
        assert_eq!(suggest("m", &records, 4), ["Malta", "Mali", "Mexico", "Mexico City"]);
        assert!(suggest("m", &records, 0).is_empty());
    }

    #[test]
    fn capitals_fill_after_names() {
        let records = vec![record("Peru", "Lima"), record("Liechtenstein", "Vaduz")];
        assert_eq!(suggest("li", &records, 5), ["Liechtenstein", "Lima"]);
    }
}
