//! Dispense slip rendering for fulfilled requests.

use serde::{Deserialize, Serialize};

use dispensary_core::models::{FulfillmentRecord, FulfillmentStatus};

/// Printable slip for one fulfilled dispensing record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispenseSlip {
    /// Request ID for traceability
    pub request_id: String,
    /// Patient name
    pub patient_name: String,
    /// Patient age
    pub patient_age: u32,
    /// Patient gender
    pub patient_gender: String,
    /// Arrival timestamp
    pub requested_at: String,
    /// Issue timestamp
    pub issued_at: String,
    /// Frozen remarks
    pub remarks: String,
    /// One entry per prescription line
    pub lines: Vec<SlipLine>,
}

/// Single line on a dispense slip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlipLine {
    /// Drug name
    pub drug: String,
    /// Dose description (e.g., "1 x 3/day x 5d")
    pub dose: String,
    /// Units dispensed for the full course
    pub quantity: u64,
    /// Whether this line was actually issued
    pub dispensed: bool,
}

impl DispenseSlip {
    /// Build a slip from a fulfilled record. Returns `None` for a record
    /// still in Requested or Pending.
    pub fn from_record(record: &FulfillmentRecord) -> Option<Self> {
        let (dispensed, remarks, issued_at) = match &record.status {
            FulfillmentStatus::Fulfilled {
                dispensed,
                remarks,
                issued_at,
            } => (dispensed, remarks, issued_at),
            _ => return None,
        };

        let lines = record
            .lines
            .iter()
            .enumerate()
            .map(|(index, line)| SlipLine {
                drug: line.drug.clone(),
                dose: format!(
                    "{} x {}/day x {}d",
                    line.dose_per_administration, line.times_per_day, line.duration_days
                ),
                quantity: line.required_quantity(),
                dispensed: dispensed.get(index).copied().unwrap_or(false),
            })
            .collect();

        Some(Self {
            request_id: record.id.clone(),
            patient_name: record.patient.name.clone(),
            patient_age: record.patient.age,
            patient_gender: record.patient.gender.clone(),
            requested_at: record.requested_at.clone(),
            issued_at: issued_at.clone(),
            remarks: remarks.clone(),
            lines,
        })
    }

    /// Render to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Render as a plain-text slip.
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        out.push_str("DISPENSE SLIP\n");
        out.push_str(&format!("Request : {}\n", self.request_id));
        out.push_str(&format!(
            "Patient : {} ({}, {})\n",
            self.patient_name, self.patient_age, self.patient_gender
        ));
        out.push_str(&format!("Issued  : {}\n", self.issued_at));
        out.push('\n');

        for line in &self.lines {
            let mark = if line.dispensed { "[x]" } else { "[ ]" };
            out.push_str(&format!(
                "{} {}  {}  ({} units)\n",
                mark, line.drug, line.dose, line.quantity
            ));
        }

        if !self.remarks.is_empty() {
            out.push('\n');
            out.push_str(&format!("Remarks : {}\n", self.remarks));
        }

        out
    }
}
