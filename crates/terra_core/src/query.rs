//! Query layer: derived views over a catalog snapshot.
//!
//! Every function here is pure. Results keep the input's natural order
//! unless a [`SortOrder`] is applied explicitly.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use terra_codec::Record;

/// Records whose name or capital contains `query`, ignoring case.
///
/// The query is matched as given, whitespace included. An empty query
/// returns the input unchanged.
#[must_use]
pub fn search_text(records: &[Record], query: &str) -> Vec<Record> {
    if query.is_empty() {
        return records.to_vec();
    }
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|record| {
            record.name.to_lowercase().contains(&needle)
                || record.capital.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Records whose category equals `category`, ignoring case.
///
/// A blank category returns the input unchanged.
#[must_use]
pub fn filter_category(records: &[Record], category: &str) -> Vec<Record> {
    let wanted = category.trim();
    if wanted.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| record.category.eq_ignore_ascii_case(wanted))
        .cloned()
        .collect()
}

/// Distinct non-empty categories, sorted.
#[must_use]
pub fn categories(records: &[Record]) -> Vec<String> {
    distinct(records.iter().map(|record| record.category.as_str()))
}

/// Distinct non-empty subcategories, sorted.
#[must_use]
pub fn subcategories(records: &[Record]) -> Vec<String> {
    distinct(records.iter().map(|record| record.subcategory.as_str()))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sort order applied by the query layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Name, A to Z.
    #[default]
    NameAsc,
    /// Name, Z to A.
    NameDesc,
    /// Smallest population first.
    PopulationAsc,
    /// Largest population first.
    PopulationDesc,
    /// Smallest area first.
    AreaAsc,
    /// Largest area first.
    AreaDesc,
}

impl SortOrder {
    /// All sort orders.
    pub const ALL: [SortOrder; 6] = [
        SortOrder::NameAsc,
        SortOrder::NameDesc,
        SortOrder::PopulationAsc,
        SortOrder::PopulationDesc,
        SortOrder::AreaAsc,
        SortOrder::AreaDesc,
    ];

    /// Stable textual name, e.g. `"population-desc"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SortOrder::NameAsc => "name-asc",
            SortOrder::NameDesc => "name-desc",
            SortOrder::PopulationAsc => "population-asc",
            SortOrder::PopulationDesc => "population-desc",
            SortOrder::AreaAsc => "area-asc",
            SortOrder::AreaDesc => "area-desc",
        }
    }

    /// Compares two records under this order.
    ///
    /// Population and area ties fall back to name ascending.
    #[must_use]
    pub fn compare(self, a: &Record, b: &Record) -> Ordering {
        match self {
            SortOrder::NameAsc => compare_names(a, b),
            SortOrder::NameDesc => compare_names(b, a),
            SortOrder::PopulationAsc => a
                .population
                .cmp(&b.population)
                .then_with(|| compare_names(a, b)),
            SortOrder::PopulationDesc => b
                .population
                .cmp(&a.population)
                .then_with(|| compare_names(a, b)),
            SortOrder::AreaAsc => a.area.total_cmp(&b.area).then_with(|| compare_names(a, b)),
            SortOrder::AreaDesc => b.area.total_cmp(&a.area).then_with(|| compare_names(a, b)),
        }
    }
}

fn compare_names(a: &Record, b: &Record) -> Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase())
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOrder::ALL
            .into_iter()
            .find(|order| order.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown sort order: {s}"))
    }
}

/// Sorts records in place. The sort is stable.
pub fn sort_records(records: &mut [Record], order: SortOrder) {
    records.sort_by(|a, b| order.compare(a, b));
}

/// Saved search filters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    /// Selected categories; empty selects all.
    pub categories: BTreeSet<String>,
    /// Selected subcategories; empty selects all.
    pub subcategories: BTreeSet<String>,
    /// Sort order.
    pub sort: SortOrder,
}

impl SearchFilters {
    /// Whether no category or subcategory is selected.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.categories.is_empty() && self.subcategories.is_empty()
    }

    /// Whether `record` passes the category selections.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        (self.categories.is_empty() || self.categories.contains(&record.category))
            && (self.subcategories.is_empty() || self.subcategories.contains(&record.subcategory))
    }

    /// Filters and sorts `records`.
    #[must_use]
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        let mut out: Vec<Record> = records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect();
        sort_records(&mut out, self.sort);
        out
    }
}
