//! Property tests for the local store and query layer over generated catalogs.

use terra_core::{query, suggest, LocalStore, Record, SortOrder};
use terra_testkit::prelude::*;

fn codes(records: &[Record]) -> Vec<String> {
    records.iter().map(|r| r.code.clone()).collect()
}

proptest! {
    #[test]
    fn replace_then_lookup(catalog in catalog_strategy(30)) {
        let store = LocalStore::in_memory();
        prop_assert_eq!(store.replace_all(&catalog).unwrap(), catalog.len());
        prop_assert_eq!(store.count(), catalog.len());

        for record in &catalog {
            let found = store.get_by_code(&record.code.to_lowercase()).unwrap();
            prop_assert_eq!(&found.code, &record.code);
            prop_assert_eq!(&found.name, &record.name);
        }
    }

    #[test]
    fn second_replace_discards_first(
        first in catalog_strategy(20),
        second in catalog_strategy(20),
    ) {
        let store = LocalStore::in_memory();
        store.replace_all(&first).unwrap();
        store.replace_all(&second).unwrap();

        prop_assert_eq!(codes(&store.get_all()), codes(&second));
    }

    #[test]
    fn search_results_match_query(catalog in catalog_strategy(30), q in query_strategy()) {
        let results = query::search_text(&catalog, &q);
        let needle = q.to_lowercase();
        if q.is_empty() {
            prop_assert_eq!(results.len(), catalog.len());
        }
        for record in &results {
            prop_assert!(
                record.name.to_lowercase().contains(&needle)
                    || record.capital.to_lowercase().contains(&needle)
            );
        }
    }

    #[test]
    fn sorting_keeps_every_record(catalog in catalog_strategy(30)) {
        for order in SortOrder::ALL {
            let mut sorted = catalog.clone();
            query::sort_records(&mut sorted, order);
            prop_assert_eq!(sorted.len(), catalog.len());
            for pair in sorted.windows(2) {
                prop_assert_ne!(order.compare(&pair[0], &pair[1]), std::cmp::Ordering::Greater);
            }
        }
    }

    #[test]
    fn suggestions_are_bounded_and_distinct(
        catalog in catalog_strategy(30),
        q in query_strategy(),
        max in 0usize..8,
    ) {
        let out = suggest(&q, &catalog, max);
        prop_assert!(out.len() <= max);
        if q.trim().is_empty() {
            prop_assert!(out.is_empty());
        }

        let prefix = q.to_lowercase();
        let name_hits = catalog
            .iter()
            .filter(|r| r.name.to_lowercase().starts_with(&prefix))
            .count()
            .min(max);
        for (i, s) in out.iter().enumerate() {
            prop_assert!(s.to_lowercase().starts_with(&prefix));
            // Capital fill-ins never repeat an earlier suggestion.
            if i >= name_hits {
                prop_assert!(!out[..i].contains(s));
            }
        }
    }

    #[test]
    fn replace_is_atomic_under_concurrent_reads(
        first in catalog_strategy(20),
        second in catalog_strategy(20),
    ) {
        let store = LocalStore::in_memory();
        store.replace_all(&first).unwrap();

        let first_codes = codes(&first);
        let second_codes = codes(&second);

        let mixed = std::thread::scope(|scope| {
            scope.spawn(|| {
                for round in 0..20 {
                    let next = if round % 2 == 0 { &second } else { &first };
                    store.replace_all(next).unwrap();
                }
            });
            let reader = scope.spawn(|| {
                (0..200)
                    .map(|_| codes(&store.get_all()))
                    .filter(|seen| *seen != first_codes && *seen != second_codes)
                    .count()
            });
            reader.join().unwrap()
        });
        prop_assert_eq!(mixed, 0);
    }
}
