//! Catalog keyword search
//!
//! A deliberate single-pass linear scan: the tool is one-shot and the catalog
//! is loaded fresh each run, so building an index would not amortize.

use itertools::Itertools;
use tracing::debug;

use crate::engine::UnitCatalogEntry;

/// Matching entries in catalog order; `found` mirrors `!matches.is_empty()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult<'a> {
    pub matches: Vec<&'a UnitCatalogEntry>,
    pub found: bool,
}

/// Scan the catalog for entries whose code or joined alias list contains the
/// keyword. Matching is substring and case-insensitive on both sides; the
/// empty keyword matches every entry.
pub fn search<'a>(catalog: &'a [UnitCatalogEntry], keyword: &str) -> SearchResult<'a> {
    let keyword = keyword.trim().to_lowercase();
    let matches: Vec<&UnitCatalogEntry> = catalog
        .iter()
        .filter(|entry| {
            let code_lower = entry.code.to_lowercase();
            let names_lower = entry.names.iter().join(", ").to_lowercase();
            code_lower.contains(&keyword) || names_lower.contains(&keyword)
        })
        .collect();
    let found = !matches.is_empty();
    debug!("keyword {:?}: {} of {} entries match", keyword, matches.len(), catalog.len());
    SearchResult { matches, found }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(code: &str, names: &[&str]) -> UnitCatalogEntry {
        UnitCatalogEntry {
            code: code.to_string(),
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    #[test]
    fn given_keyword_spanning_alias_separator_when_searching_then_matches_joined_form() {
        // aliases are joined with ", " before matching
        let catalog = vec![entry("g", &["gram", "gramme"])];
        let result = search(&catalog, "m, g");
        assert!(result.found);
    }

    #[test]
    fn given_entry_without_aliases_when_searching_then_matches_on_code_only() {
        let catalog = vec![entry("mol", &[])];
        assert!(search(&catalog, "mo").found);
        assert!(!search(&catalog, "mole").found);
    }

    #[test]
    fn given_entry_with_empty_code_when_searching_then_behaves_as_empty_string() {
        let catalog = vec![entry("", &[])];
        assert!(!search(&catalog, "g").found);
        assert!(search(&catalog, "").found);
    }
}
