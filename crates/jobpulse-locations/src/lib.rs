//! Location lookups for the BDJobs search API.
//!
//! BDJobs filters by numeric location codes rather than place names. This crate
//! ships the static division/district table the API understands and a small
//! index over it that maps names to codes and back.
//!
//! ```rust
//! use jobpulse_locations::LocationIndex;
//!
//! let index = LocationIndex::embedded();
//! assert_eq!(index.resolve("  dhaka "), Some("14"));
//! assert_eq!(index.name_of("14"), Some("Dhaka"));
//! assert!(index.resolve("Atlantis").is_none());
//! ```

use ahash::AHashMap as HashMap;
use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::debug;

mod table;

/// One entry of a location table: the code BDJobs expects and its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    pub code: &'static str,
    pub name: &'static str,
}

static EMBEDDED: Lazy<LocationIndex> = Lazy::new(|| LocationIndex::new(table::BANGLADESH));

/// Bidirectional, case-insensitive index over a static location table.
///
/// Every lookup trims surrounding whitespace and ignores ASCII case. The table
/// itself is never mutated; [`LocationIndex::all`] returns it in table order.
#[derive(Debug, Clone)]
pub struct LocationIndex {
    entries: &'static [Location],
    by_name: HashMap<String, usize>,
    by_code: HashMap<&'static str, usize>,
}

impl LocationIndex {
    /// Index an arbitrary static table. When a name or code appears more than
    /// once the first entry wins.
    pub fn new(entries: &'static [Location]) -> Self {
        let mut by_name = HashMap::with_capacity(entries.len());
        let mut by_code = HashMap::with_capacity(entries.len());

        for (i, entry) in entries.iter().enumerate() {
            by_name.entry(normalize(entry.name)).or_insert(i);
            by_code.entry(entry.code).or_insert(i);
        }
        debug!(entries = entries.len(), "Built location index");

        Self {
            entries,
            by_name,
            by_code,
        }
    }

    /// The process-wide index over the built-in Bangladesh table.
    pub fn embedded() -> &'static Self {
        &EMBEDDED
    }

    /// Look up the code for a place name.
    pub fn resolve(&self, name: &str) -> Option<&'static str> {
        let key = normalize(name);
        if key.is_empty() {
            return None;
        }
        self.by_name.get(&key).map(|&i| self.entries[i].code)
    }

    /// Look up the canonical name for a code.
    pub fn name_of(&self, code: &str) -> Option<&'static str> {
        self.by_code
            .get(code.trim())
            .map(|&i| self.entries[i].name)
    }

    pub fn all(&self) -> &'static [Location] {
        self.entries
    }

    /// Entries whose name contains `query` anywhere, case-insensitively, in
    /// table order.
    ///
    /// An empty query matches nothing. A query of only whitespace trims to the
    /// empty needle, which every name contains, so it returns the whole table.
    pub fn search(&self, query: &str) -> Vec<&'static Location> {
        if query.is_empty() {
            return Vec::new();
        }
        let needle = normalize(query);
        self.entries
            .iter()
            .filter(|entry| entry.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LocationIndex {
    fn default() -> Self {
        EMBEDDED.clone()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_case_insensitive_and_trimmed() {
        let index = LocationIndex::embedded();
        assert_eq!(index.resolve("Dhaka"), Some("14"));
        assert_eq!(index.resolve("DHAKA"), Some("14"));
        assert_eq!(index.resolve("  dhaka\t"), Some("14"));
        assert_eq!(index.resolve("cox's bazar"), Some("13"));
    }

    #[test]
    fn test_division_and_district_are_distinct() {
        let index = LocationIndex::embedded();
        assert_eq!(index.resolve("Dhaka Division"), Some("1003"));
        assert_eq!(index.resolve("Dhaka"), Some("14"));
    }

    #[test]
    fn test_unknown_and_blank_names() {
        let index = LocationIndex::embedded();
        assert!(index.resolve("").is_none());
        assert!(index.resolve("   ").is_none());
        assert!(index.resolve("Kolkata").is_none());
        assert!(index.name_of("").is_none());
        assert!(index.name_of("999").is_none());
    }

    #[test]
    fn test_name_of_trims_code() {
        let index = LocationIndex::embedded();
        assert_eq!(index.name_of(" 62 "), Some("Sylhet"));
    }

    #[test]
    fn test_resolve_and_name_of_are_inverse() {
        let index = LocationIndex::embedded();
        for entry in index.all() {
            let code = index
                .resolve(&entry.name.to_uppercase())
                .expect("every table name resolves");
            assert_eq!(index.name_of(code), Some(entry.name));
        }
    }

    #[test]
    fn test_embedded_table_shape() {
        let index = LocationIndex::embedded();
        assert_eq!(index.len(), 72, "8 divisions and 64 districts");
        let divisions = index
            .all()
            .iter()
            .filter(|l| l.name.ends_with("Division"))
            .count();
        assert_eq!(divisions, 8);
        assert_eq!(index.all()[0].name, "Dhaka Division");
    }

    #[test]
    fn test_search_substring() {
        let index = LocationIndex::embedded();
        let names: Vec<_> = index.search("DHAKA").iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["Dhaka Division", "Dhaka"]);

        let names: Vec<_> = index.search("pur").iter().map(|l| l.name).collect();
        assert!(names.contains(&"Rangpur"));
        assert!(names.contains(&"Gazipur"));
        assert!(!names.contains(&"Dhaka"));
    }

    #[test]
    fn test_search_empty_query_matches_nothing() {
        let index = LocationIndex::embedded();
        assert!(index.search("").is_empty());
        assert!(index.search("zzz").is_empty());
    }

    #[test]
    fn test_search_whitespace_query_matches_everything() {
        let index = LocationIndex::embedded();
        let hits = index.search("  ");
        assert_eq!(hits.len(), index.len());
        assert_eq!(hits[0], &index.all()[0]);
    }

    static DUPLICATES: &[Location] = &[
        Location {
            code: "1",
            name: "Springfield",
        },
        Location {
            code: "2",
            name: "springfield",
        },
    ];

    #[test]
    fn test_custom_table_first_entry_wins() {
        let index = LocationIndex::new(DUPLICATES);
        assert_eq!(index.resolve("SPRINGFIELD"), Some("1"));
        assert_eq!(index.name_of("2"), Some("springfield"));
        assert_eq!(index.search("spring").len(), 2);
    }
}
