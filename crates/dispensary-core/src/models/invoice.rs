//! Normalized invoice models.

use serde::{Deserialize, Serialize};

/// One medicine entry on a normalized invoice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceLine {
    /// Line identifier from the payload, or a 1-based index when absent
    pub id: String,
    /// Medicine name
    pub medicine_name: String,
    /// Dosage description (e.g., "500mg twice daily")
    pub dosage: String,
    /// Dispensed quantity
    pub quantity: f64,
    /// Price per unit
    pub unit_price: f64,
    /// Line total; source value when present, otherwise quantity * unit_price
    pub line_total: f64,
}

/// Clinic letterhead metadata carried for rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClinicInfo {
    /// Clinic name
    pub name: String,
    /// Street address
    pub address: String,
    /// Contact phone
    pub phone: String,
}

impl Default for ClinicInfo {
    fn default() -> Self {
        Self {
            name: "-".into(),
            address: "-".into(),
            phone: "-".into(),
        }
    }
}

/// A canonical invoice derived from a raw backend payload.
///
/// Constructed once per payload fetch and immutable afterwards; a fresh
/// fetch produces a fresh invoice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    /// Invoice identifier (invoice ID or prescription ID, whichever keyed
    /// the source payload)
    pub id: String,
    /// Creation timestamp from the payload, or the capture time when absent
    pub created_at: String,
    /// Patient name
    pub patient_name: String,
    /// Patient age, kept as display text
    pub patient_age: String,
    /// Patient gender
    pub patient_gender: String,
    /// Ordered medicine lines
    pub lines: Vec<InvoiceLine>,
    /// Sum of line totals unless the payload supplied its own
    pub sub_total: f64,
    /// Service charge; zero when absent
    pub service_charge: f64,
    /// Grand total; `sub_total + service_charge` unless supplied
    pub total_amount: f64,
    /// Clinic letterhead
    pub clinic: ClinicInfo,
    /// Cashier identity when the payload carries one
    pub cashier: Option<String>,
}

impl Invoice {
    /// Sum of line totals, recomputed from the lines.
    pub fn computed_sub_total(&self) -> f64 {
        self.lines.iter().map(|line| line.line_total).sum()
    }
}
