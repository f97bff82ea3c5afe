//! In-memory inventory store.
//!
//! Holds per-drug stock records, seeded once at creation and mutated only
//! through [`InventoryStore::try_decrement`] and
//! [`InventoryStore::increment`]. Other components read stock to gate
//! dispensing decisions but never write it directly.
//!
//! Behind a shared backend, two sessions dispensing the same drug must not
//! both pass the availability check before either deduction lands; the
//! caller owns that mutual exclusion (e.g., a transaction boundary around
//! the decrement).

use std::collections::HashMap;

use crate::models::DrugStock;

/// Per-drug stock store, keyed by drug name.
#[derive(Debug, Clone, Default)]
pub struct InventoryStore {
    items: HashMap<String, DrugStock>,
}

impl InventoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from an initial stock snapshot.
    ///
    /// A duplicated drug name keeps the last record seen.
    pub fn from_snapshot<I>(items: I) -> Self
    where
        I: IntoIterator<Item = DrugStock>,
    {
        Self {
            items: items
                .into_iter()
                .map(|item| (item.name.clone(), item))
                .collect(),
        }
    }

    /// Get a drug's full stock record.
    pub fn get(&self, name: &str) -> Option<&DrugStock> {
        self.items.get(name)
    }

    /// Current units on hand, or `None` for an unknown drug.
    pub fn stock(&self, name: &str) -> Option<u64> {
        self.items.get(name).map(|item| item.stock)
    }

    /// Atomic check-then-subtract. Rejects an unknown drug or an amount
    /// exceeding current stock; on rejection nothing changes.
    pub fn try_decrement(&mut self, name: &str, amount: u64) -> bool {
        match self.items.get_mut(name) {
            Some(item) if item.can_cover(amount) => {
                item.stock -= amount;
                tracing::debug!(drug = name, amount, remaining = item.stock, "stock deducted");
                true
            }
            _ => false,
        }
    }

    /// Add units back to a drug's stock. Rejects only an unknown drug;
    /// there is no upper bound in this domain.
    pub fn increment(&mut self, name: &str, amount: u64) -> bool {
        match self.items.get_mut(name) {
            Some(item) => {
                item.stock += amount;
                tracing::debug!(drug = name, amount, remaining = item.stock, "stock restocked");
                true
            }
            None => false,
        }
    }

    /// Ranked approximate search over drug names for inventory display.
    ///
    /// Substring matches rank first, then Jaro-Winkler similarity; results
    /// below a floor similarity are dropped.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&DrugStock> {
        const MIN_SIMILARITY: f64 = 0.70;

        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(f64, &DrugStock)> = self
            .items
            .values()
            .filter_map(|item| {
                let name = item.name.to_lowercase();
                let score = if name.contains(&needle) {
                    1.0
                } else {
                    strsim::jaro_winkler(&needle, &name)
                };
                (score >= MIN_SIMILARITY).then_some((score, item))
            })
            .collect();

        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.name.cmp(&b.1.name))
        });
        scored.into_iter().take(limit).map(|(_, item)| item).collect()
    }

    /// All stock records, sorted by drug name for stable display.
    pub fn list(&self) -> Vec<&DrugStock> {
        let mut items: Vec<&DrugStock> = self.items.values().collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_store() -> InventoryStore {
        InventoryStore::from_snapshot(vec![
            DrugStock {
                name: "Paracetamol".into(),
                stock: 100,
                form: "Tablet".into(),
                strength: "500mg".into(),
                category: "Analgesic".into(),
            },
            DrugStock {
                name: "Amoxicillin".into(),
                stock: 40,
                form: "Capsule".into(),
                strength: "250mg".into(),
                category: "Antibiotic".into(),
            },
            DrugStock::new("Cetirizine".into(), 0),
        ])
    }

    #[test]
    fn test_seed_and_read() {
        let store = seeded_store();
        assert_eq!(store.len(), 3);
        assert_eq!(store.stock("Paracetamol"), Some(100));
        assert_eq!(store.stock("Cetirizine"), Some(0));
        assert_eq!(store.stock("Ibuprofen"), None);
        assert_eq!(store.get("Amoxicillin").unwrap().category, "Antibiotic");
    }

    #[test]
    fn test_try_decrement() {
        let mut store = seeded_store();

        assert!(store.try_decrement("Paracetamol", 30));
        assert_eq!(store.stock("Paracetamol"), Some(70));

        // exact drain to zero is allowed
        assert!(store.try_decrement("Paracetamol", 70));
        assert_eq!(store.stock("Paracetamol"), Some(0));

        // over-draw is rejected as a whole
        assert!(!store.try_decrement("Paracetamol", 1));
        assert_eq!(store.stock("Paracetamol"), Some(0));

        // unknown drug is rejected
        assert!(!store.try_decrement("Ibuprofen", 1));
    }

    #[test]
    fn test_increment() {
        let mut store = seeded_store();

        assert!(store.increment("Cetirizine", 25));
        assert_eq!(store.stock("Cetirizine"), Some(25));

        assert!(!store.increment("Ibuprofen", 5));
    }

    #[test]
    fn test_decrement_increment_round_trip() {
        let mut store = seeded_store();

        assert!(store.try_decrement("Amoxicillin", 15));
        assert!(store.increment("Amoxicillin", 15));
        assert_eq!(store.stock("Amoxicillin"), Some(40));
    }

    #[test]
    fn test_search_substring_and_fuzzy() {
        let store = seeded_store();

        let hits = store.search("para", 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Paracetamol");

        // close misspelling still matches
        let hits = store.search("amoxicilin", 10);
        assert!(!hits.is_empty());
        assert_eq!(hits[0].name, "Amoxicillin");

        // unrelated query returns nothing
        assert!(store.search("zzzzqq", 10).is_empty());
        assert!(store.search("   ", 10).is_empty());
    }

    #[test]
    fn test_list_sorted() {
        let store = seeded_store();
        let names: Vec<&str> = store.list().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Amoxicillin", "Cetirizine", "Paracetamol"]);
    }
}
