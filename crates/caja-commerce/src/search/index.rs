//! Name index for filter-as-you-type lookup.

use crate::catalog::Catalog;
use crate::search::FilterResults;
use tracing::trace;

/// The distinct product names, in sorted order.
///
/// Filtering rescans the whole set on every call; catalogs are small
/// enough that nothing incremental is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchIndex {
    names: Vec<String>,
    folded: Vec<String>,
}

impl SearchIndex {
    /// Build the index from the catalog's names.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self::from_names(catalog.names())
    }

    /// Build the index from any set of names.
    ///
    /// Names are deduplicated and sorted.
    pub fn from_names<I, T>(names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        let folded = names.iter().map(|n| n.to_lowercase()).collect();
        Self { names, folded }
    }

    /// Names containing `query`, ignoring case. An empty query matches all.
    pub fn filter(&self, query: &str) -> FilterResults {
        if query.is_empty() {
            return FilterResults::new(query, self.names.clone());
        }

        let needle = query.to_lowercase();
        let matches: Vec<String> = self
            .names
            .iter()
            .zip(&self.folded)
            .filter(|(_, folded)| folded.contains(&needle))
            .map(|(name, _)| name.clone())
            .collect();

        trace!(query, matches = matches.len(), "filtered names");
        FilterResults::new(query, matches)
    }

    /// All indexed names.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of indexed names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if there is nothing to search.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn index() -> SearchIndex {
        SearchIndex::from_names(["Arroz", "Leche entera", "Leche descremada", "Café", "PAN"])
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let results = index().filter("");
        assert_eq!(results.len(), 5);
        assert_eq!(results.highlight(), Some("Arroz"));
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let results = index().filter("LECHE");
        assert_eq!(results.matches, vec!["Leche descremada", "Leche entera"]);
        assert_eq!(results.highlight(), Some("Leche descremada"));

        let results = index().filter("an");
        assert_eq!(results.matches, vec!["PAN"]);
    }

    #[test]
    fn test_filter_handles_accents() {
        let results = index().filter("CAFÉ");
        assert_eq!(results.matches, vec!["Café"]);
    }

    #[test]
    fn test_no_match_has_no_highlight() {
        let results = index().filter("yerba");
        assert!(results.is_empty());
        assert_eq!(results.highlight(), None);
    }

    #[test]
    fn test_names_are_deduplicated() {
        let index = SearchIndex::from_names(["Pan", "Pan", "Arroz"]);
        assert_eq!(index.names(), &["Arroz".to_string(), "Pan".to_string()]);
    }

    proptest! {
        #[test]
        fn prop_filter_returns_only_matching_names(
            names in proptest::collection::vec("[a-zA-Z ]{0,12}", 0..20),
            query in "[a-zA-Z]{1,3}",
        ) {
            let index = SearchIndex::from_names(names.clone());
            let results = index.filter(&query);
            let needle = query.to_lowercase();

            for name in &results.matches {
                prop_assert!(name.to_lowercase().contains(&needle));
            }
            for name in &names {
                if name.to_lowercase().contains(&needle) {
                    prop_assert!(results.matches.contains(name));
                }
            }
        }

        #[test]
        fn prop_empty_query_returns_every_distinct_name(
            names in proptest::collection::vec("[a-z]{0,6}", 0..20),
        ) {
            let index = SearchIndex::from_names(names.clone());
            let results = index.filter("");
            let distinct: std::collections::BTreeSet<String> = names.into_iter().collect();
            prop_assert_eq!(results.matches, distinct.into_iter().collect::<Vec<_>>());
        }
    }
}
