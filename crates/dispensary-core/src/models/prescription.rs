//! Prescription request and fulfillment models.

use serde::{Deserialize, Serialize};

/// Patient identity carried on a fulfillment request.
///
/// The core never interprets these fields; they pass through to listings and
/// printed slips verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Patient name
    pub name: String,
    /// Age in years
    pub age: u32,
    /// Gender as recorded at intake
    pub gender: String,
}

/// One prescribed drug line within a request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionLine {
    /// Drug name - lookup key into the inventory store, non-owning
    pub drug: String,
    /// Units taken per administration
    pub dose_per_administration: f64,
    /// Administrations per day
    pub times_per_day: u32,
    /// Course length in days
    pub duration_days: u32,
    /// Dosage form as prescribed (e.g., "Tablet", "Syrup")
    pub form_type: String,
}

impl PrescriptionLine {
    /// Create a line with required fields.
    pub fn new(drug: String, dose_per_administration: f64, times_per_day: u32, duration_days: u32) -> Self {
        Self {
            drug,
            dose_per_administration,
            times_per_day,
            duration_days,
            form_type: String::new(),
        }
    }

    /// Total units needed over the full course, rounded up to whole units.
    ///
    /// Recomputed on every call; availability checks and deductions must
    /// never see a stale value.
    pub fn required_quantity(&self) -> u64 {
        let units = self.dose_per_administration
            * f64::from(self.times_per_day)
            * f64::from(self.duration_days);
        units.ceil() as u64
    }
}

/// Fulfillment pipeline status - the single source of truth for which stage
/// a request is in. A record holds exactly one status at a time, so the
/// stage collections exposed to callers are filtered views and a record can
/// never appear in two stages at once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum FulfillmentStatus {
    /// Newly arrived, untouched
    Requested,
    /// Being dispensed; flags and remarks are mutable
    Pending {
        /// Per-line dispense flags, index-aligned with the record's lines
        dispensed: Vec<bool>,
        /// Free-text remarks (e.g., "issued all except Amoxicillin")
        remarks: String,
    },
    /// Finalized snapshot; no further mutation
    Fulfilled {
        /// Frozen per-line dispense flags
        dispensed: Vec<bool>,
        /// Frozen remarks
        remarks: String,
        /// Issue timestamp stamped at completion
        issued_at: String,
    },
}

impl FulfillmentStatus {
    /// Stage name for display and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            FulfillmentStatus::Requested => "Requested",
            FulfillmentStatus::Pending { .. } => "Pending",
            FulfillmentStatus::Fulfilled { .. } => "Fulfilled",
        }
    }
}

/// A prescription request moving through the dispensing pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FulfillmentRecord {
    /// Unique request ID, supplied by the intake source
    pub id: String,
    /// Patient identity
    pub patient: Patient,
    /// Ordered prescription lines
    pub lines: Vec<PrescriptionLine>,
    /// Arrival timestamp
    pub requested_at: String,
    /// Current pipeline stage
    pub status: FulfillmentStatus,
}

impl FulfillmentRecord {
    /// Create a new request with a generated ID, stamped now.
    pub fn new(patient: Patient, lines: Vec<PrescriptionLine>) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), patient, lines)
    }

    /// Create a new request under an externally assigned ID.
    pub fn with_id(id: String, patient: Patient, lines: Vec<PrescriptionLine>) -> Self {
        Self {
            id,
            patient,
            lines,
            requested_at: chrono::Utc::now().to_rfc3339(),
            status: FulfillmentStatus::Requested,
        }
    }

    pub fn is_requested(&self) -> bool {
        matches!(self.status, FulfillmentStatus::Requested)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, FulfillmentStatus::Pending { .. })
    }

    pub fn is_fulfilled(&self) -> bool {
        matches!(self.status, FulfillmentStatus::Fulfilled { .. })
    }

    /// Per-line dispense flags; `None` while still in Requested.
    pub fn dispensed_flags(&self) -> Option<&[bool]> {
        match &self.status {
            FulfillmentStatus::Requested => None,
            FulfillmentStatus::Pending { dispensed, .. }
            | FulfillmentStatus::Fulfilled { dispensed, .. } => Some(dispensed),
        }
    }

    /// Remarks text; `None` while still in Requested.
    pub fn remarks(&self) -> Option<&str> {
        match &self.status {
            FulfillmentStatus::Requested => None,
            FulfillmentStatus::Pending { remarks, .. }
            | FulfillmentStatus::Fulfilled { remarks, .. } => Some(remarks),
        }
    }

    /// Issue timestamp; present only once Fulfilled.
    pub fn issued_at(&self) -> Option<&str> {
        match &self.status {
            FulfillmentStatus::Fulfilled { issued_at, .. } => Some(issued_at),
            _ => None,
        }
    }

    /// Count of lines currently marked dispensed.
    pub fn dispensed_count(&self) -> usize {
        self.dispensed_flags()
            .map(|flags| flags.iter().filter(|f| **f).count())
            .unwrap_or(0)
    }
}
