use std::collections::HashSet;

use dictum_types::Definition;

/// Whether a definition listing should be replaced by its database names.
///
/// Only results spanning several databases collapse, and only once there are
/// more than `threshold` of them. A threshold of 0 collapses any
/// multi-database listing.
pub fn should_collapse(results: &[Definition], threshold: usize) -> bool {
    if results.len() <= threshold {
        return false;
    }

    let mut seen = HashSet::new();
    results
        .iter()
        .any(|def| seen.insert(def.database.as_str()) && seen.len() > 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defs(databases: &[&str]) -> Vec<Definition> {
        databases
            .iter()
            .map(|db| Definition::new("apple", "a fruit", *db))
            .collect()
    }

    #[test]
    fn test_single_database_never_collapses() {
        for n in 0..20 {
            let results = defs(&vec!["wn"; n]);
            assert!(!should_collapse(&results, 0));
            assert!(!should_collapse(&results, 4));
        }
    }

    #[test]
    fn test_threshold_boundary() {
        let four = defs(&["wn", "gcide", "wn", "foldoc"]);
        assert!(!should_collapse(&four, 4));

        let five = defs(&["wn", "gcide", "wn", "foldoc", "gcide"]);
        assert!(should_collapse(&five, 4));
    }

    #[test]
    fn test_zero_threshold() {
        assert!(should_collapse(&defs(&["wn", "gcide"]), 0));
        assert!(!should_collapse(&defs(&[]), 0));
    }
}
