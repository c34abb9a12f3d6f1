//! Canonical hero identifier to index mapping
//!
//! Built once from training data and frozen for all serving.

use std::collections::HashMap;

use crate::MatchRecord;

/// Stable hero identifier to index mapping.
///
/// Indices are assigned in ascending lexicographic order over every
/// identifier observed in the training data. Names absent from the registry
/// resolve to `None` and are silently excluded downstream, never an error.
#[derive(Debug, Clone)]
pub struct HeroRegistry {
    names: Vec<String>,
    index: HashMap<String, usize>,
    lower_index: HashMap<String, usize>,
}

impl HeroRegistry {
    /// Build a registry from every non-empty identifier in the four list
    /// fields across all records.
    pub fn build(records: &[MatchRecord]) -> Self {
        let mut names: Vec<String> = records
            .iter()
            .flat_map(|r| {
                r.team1_picks
                    .iter()
                    .chain(&r.team2_picks)
                    .chain(&r.team1_bans)
                    .chain(&r.team2_bans)
            })
            .filter(|n| is_valid_name(n))
            .cloned()
            .collect();
        names.sort();
        names.dedup();

        Self::from_names(names)
    }

    /// Reconstruct a registry from a persisted name list.
    ///
    /// The list must already be sorted and deduplicated (as produced by
    /// `build` and stored in the statistics artifact).
    pub fn from_names(names: Vec<String>) -> Self {
        let index: HashMap<String, usize> = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
        let lower_index: HashMap<String, usize> = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.to_lowercase(), i))
            .collect();

        HeroRegistry {
            names,
            index,
            lower_index,
        }
    }

    /// Resolve an identifier to its index: exact match first, then
    /// case-insensitive. `None` marks an unknown hero.
    pub fn resolve(&self, name: &str) -> Option<usize> {
        self.index
            .get(name)
            .or_else(|| self.lower_index.get(&name.to_lowercase()))
            .copied()
    }

    /// Resolve a sequence of identifiers, dropping unknown names while
    /// preserving order.
    pub fn resolve_all(&self, names: &[String]) -> Vec<usize> {
        names.iter().filter_map(|n| self.resolve(n)).collect()
    }

    pub fn name(&self, idx: usize) -> &str {
        &self.names[idx]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Empty strings and literal "nan" placeholders are not hero names
pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.eq_ignore_ascii_case("nan")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(t1: &[&str], t2: &[&str]) -> MatchRecord {
        MatchRecord {
            team1_picks: t1.iter().map(|s| s.to_string()).collect(),
            team2_picks: t2.iter().map(|s| s.to_string()).collect(),
            team1_bans: vec![],
            team2_bans: vec![],
            team1_won: true,
        }
    }

    #[test]
    fn test_lexicographic_ordering() {
        let records = vec![record(&["Zed", "Ahri"], &["Milio", "Bard"])];
        let registry = HeroRegistry::build(&records);

        assert_eq!(registry.len(), 4);
        assert_eq!(registry.name(0), "Ahri");
        assert_eq!(registry.name(1), "Bard");
        assert_eq!(registry.name(2), "Milio");
        assert_eq!(registry.name(3), "Zed");
    }

    #[test]
    fn test_collects_all_four_fields() {
        let records = vec![MatchRecord {
            team1_picks: vec!["A".to_string()],
            team2_picks: vec!["B".to_string()],
            team1_bans: vec!["C".to_string()],
            team2_bans: vec!["D".to_string()],
            team1_won: false,
        }];
        let registry = HeroRegistry::build(&records);
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.resolve("C"), Some(2));
    }

    #[test]
    fn test_case_insensitive_fallback() {
        let registry = HeroRegistry::build(&[record(&["Ahri"], &["Zed"])]);
        assert_eq!(registry.resolve("Ahri"), Some(0));
        assert_eq!(registry.resolve("ahri"), Some(0));
        assert_eq!(registry.resolve("ZED"), Some(1));
    }

    #[test]
    fn test_unknown_is_none() {
        let registry = HeroRegistry::build(&[record(&["Ahri"], &["Zed"])]);
        assert_eq!(registry.resolve("Teemo"), None);
    }

    #[test]
    fn test_filters_empty_and_nan() {
        let registry = HeroRegistry::build(&[record(&["Ahri", "", "nan", "NaN"], &["Zed"])]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_resolve_all_drops_unknown() {
        let registry = HeroRegistry::build(&[record(&["Ahri", "Bard"], &["Zed"])]);
        let names = vec![
            "Zed".to_string(),
            "Teemo".to_string(),
            "Ahri".to_string(),
        ];
        assert_eq!(registry.resolve_all(&names), vec![2, 0]);
    }
}
