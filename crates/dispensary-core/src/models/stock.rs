//! Inventory stock models.

use serde::{Deserialize, Serialize};

/// A single drug's stock record in the pharmacy inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrugStock {
    /// Drug name - unique identifier within the store
    pub name: String,
    /// Units on hand
    pub stock: u64,
    /// Dosage form (e.g., "Tablet", "Syrup", "Injection")
    pub form: String,
    /// Strength per unit (e.g., "500mg", "5mg/5mL")
    pub strength: String,
    /// Therapeutic category (e.g., "Analgesic", "Antibiotic")
    pub category: String,
}

impl DrugStock {
    /// Create a stock record with required fields.
    pub fn new(name: String, stock: u64) -> Self {
        Self {
            name,
            stock,
            form: String::new(),
            strength: String::new(),
            category: String::new(),
        }
    }

    /// Check whether `amount` units could be drawn without going negative.
    pub fn can_cover(&self, amount: u64) -> bool {
        amount <= self.stock
    }
}
