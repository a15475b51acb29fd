use crate::{AnalysisResult, CatalogEntry, PrecomputedAnalyses};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrecomputedStatus {
    #[default]
    Pending,
    Loaded,
    Missing,
}

/// Product list plus the precomputed analyses, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    precomputed: PrecomputedAnalyses,
    precomputed_status: PrecomputedStatus,
}

impl Catalog {
    pub(crate) fn set_entries(&mut self, entries: Vec<CatalogEntry>) {
        self.entries = entries;
    }

    pub(crate) fn set_precomputed(&mut self, precomputed: PrecomputedAnalyses) {
        self.precomputed = precomputed;
        self.precomputed_status = PrecomputedStatus::Loaded;
    }

    pub(crate) fn mark_precomputed_missing(&mut self) {
        self.precomputed.clear();
        self.precomputed_status = PrecomputedStatus::Missing;
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn entry(&self, brand: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.brand == brand)
    }

    pub fn lookup(&self, brand: &str) -> Option<&AnalysisResult> {
        self.precomputed.get(brand)
    }

    pub fn precomputed_len(&self) -> usize {
        self.precomputed.len()
    }

    pub fn precomputed_status(&self) -> PrecomputedStatus {
        self.precomputed_status
    }

    pub fn is_loading(&self) -> bool {
        self.precomputed_status == PrecomputedStatus::Pending
    }

    /// Finds a cached catalog brand containing `query`, ignoring case.
    ///
    /// Only brands with a precomputed analysis are candidates. An exact match
    /// wins, then the shortest brand; equal lengths keep catalog order.
    pub fn find_local_match(&self, query: &str) -> Option<&CatalogEntry> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        let mut best: Option<(&CatalogEntry, usize)> = None;
        for entry in self
            .entries
            .iter()
            .filter(|entry| self.precomputed.contains_key(&entry.brand))
        {
            let brand = entry.brand.to_lowercase();
            if !brand.contains(&needle) {
                continue;
            }
            if brand == needle {
                return Some(entry);
            }
            let len = brand.chars().count();
            match best {
                Some((_, best_len)) if best_len <= len => {}
                _ => best = Some((entry, len)),
            }
        }
        best.map(|(entry, _)| entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(brands: &[&str], cached: &[&str]) -> Catalog {
        let mut catalog = Catalog::default();
        catalog.set_entries(
            brands
                .iter()
                .map(|brand| CatalogEntry {
                    brand: brand.to_string(),
                    ingredients: format!("{brand} ingredients"),
                })
                .collect(),
        );
        catalog.set_precomputed(
            cached
                .iter()
                .map(|brand| {
                    (
                        brand.to_string(),
                        AnalysisResult {
                            success: true,
                            cereal_name: brand.to_string(),
                            ..AnalysisResult::default()
                        },
                    )
                })
                .collect(),
        );
        catalog
    }

    #[test]
    fn match_is_case_insensitive_substring() {
        let catalog = catalog(&["Honey Oat Crunch"], &["Honey Oat Crunch"]);
        let found = catalog.find_local_match("  oat CRUNCH ").unwrap();
        assert_eq!(found.brand, "Honey Oat Crunch");
    }

    #[test]
    fn exact_match_beats_earlier_longer_match() {
        let catalog = catalog(&["Oat Puffs Deluxe", "Oat Puffs"], &["Oat Puffs Deluxe", "Oat Puffs"]);
        assert_eq!(catalog.find_local_match("oat puffs").unwrap().brand, "Oat Puffs");
    }

    #[test]
    fn shortest_match_wins_then_catalog_order() {
        let catalog = catalog(
            &["Choco Bits Max", "Choco Bits A", "Choco Bits B"],
            &["Choco Bits Max", "Choco Bits A", "Choco Bits B"],
        );
        assert_eq!(catalog.find_local_match("choco").unwrap().brand, "Choco Bits A");
    }

    #[test]
    fn brands_without_analysis_are_not_candidates() {
        let catalog = catalog(&["Oat Rings", "Oat Rings Plus"], &["Oat Rings Plus"]);
        assert_eq!(catalog.find_local_match("oat rings").unwrap().brand, "Oat Rings Plus");
        assert!(catalog.find_local_match("   ").is_none());
        assert!(catalog.find_local_match("granola").is_none());
    }
}
