//! Dispensing fulfillment pipeline.
//!
//! Tracks each prescription request through Requested → Pending → Fulfilled.
//! The pipeline holds one record set with an explicit status tag; the stage
//! collections exposed to callers are filtered views over it, so a record
//! can never appear in two stages at once. No backward transition exists:
//! a Pending or Fulfilled record does not return to Requested.
//!
//! The inventory store is injected at construction, and every stock
//! mutation the pipeline performs routes through the store's conditional
//! decrement and restock operations.

use thiserror::Error;

use crate::inventory::InventoryStore;
use crate::models::{FulfillmentRecord, FulfillmentStatus};

/// Fulfillment errors. All are local, recoverable conditions reported to
/// the caller; none aborts the pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FulfillmentError {
    #[error("request not found: {0}")]
    NotFound(String),

    #[error("request {id} is {actual}, expected {expected}")]
    InvalidState {
        id: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("request {id} has no line {line}")]
    InvalidLine { id: String, line: usize },

    #[error("insufficient stock of {drug}: need {required}, have {available}")]
    InsufficientStock {
        drug: String,
        required: u64,
        available: u64,
    },
}

pub type FulfillmentResult<T> = Result<T, FulfillmentError>;

/// The dispensing pipeline: owns the request set and the inventory store.
pub struct Dispensary {
    inventory: InventoryStore,
    records: Vec<FulfillmentRecord>,
}

impl Dispensary {
    /// Create a pipeline over an injected inventory store.
    pub fn new(inventory: InventoryStore) -> Self {
        Self {
            inventory,
            records: Vec::new(),
        }
    }

    /// Accept a new request into the Requested queue.
    ///
    /// Arrival order defines the queue order. Request IDs are unique by
    /// upstream contract; the pipeline does not deduplicate.
    pub fn intake(&mut self, record: FulfillmentRecord) {
        tracing::debug!(id = %record.id, lines = record.lines.len(), "request received");
        self.records.push(record);
    }

    /// Move a Requested record to Pending, initializing empty dispense
    /// flags and remarks. No inventory effect.
    pub fn advance_to_pending(&mut self, id: &str) -> FulfillmentResult<()> {
        let record = record_mut(&mut self.records, id)?;
        match record.status {
            FulfillmentStatus::Requested => {
                record.status = FulfillmentStatus::Pending {
                    dispensed: vec![false; record.lines.len()],
                    remarks: String::new(),
                };
                tracing::debug!(id, "request moved to pending");
                Ok(())
            }
            ref other => Err(FulfillmentError::InvalidState {
                id: id.to_string(),
                expected: "Requested",
                actual: other.name(),
            }),
        }
    }

    /// Flip the dispense flag for one prescription line of a Pending record.
    ///
    /// Flipping to `true` deducts the line's required quantity from stock;
    /// if stock cannot cover it the flip is rejected and nothing changes.
    /// Flipping to `false` restocks the previously deducted quantity, so
    /// stock always reflects exactly the lines currently marked dispensed.
    ///
    /// Lines referencing the same drug are each evaluated against the stock
    /// value current at toggle time: checking one line can make a sibling
    /// line of the same drug infeasible.
    ///
    /// Returns the new flag value.
    pub fn toggle_dispensed(&mut self, id: &str, line: usize) -> FulfillmentResult<bool> {
        let record = record_mut(&mut self.records, id)?;
        let dispensed = match &mut record.status {
            FulfillmentStatus::Pending { dispensed, .. } => dispensed,
            other => {
                return Err(FulfillmentError::InvalidState {
                    id: id.to_string(),
                    expected: "Pending",
                    actual: other.name(),
                })
            }
        };

        let prescription = record.lines.get(line).ok_or_else(|| FulfillmentError::InvalidLine {
            id: id.to_string(),
            line,
        })?;
        let flag = dispensed.get_mut(line).ok_or_else(|| FulfillmentError::InvalidLine {
            id: id.to_string(),
            line,
        })?;

        let required = prescription.required_quantity();
        if *flag {
            // un-check: return this line's deduction to stock
            self.inventory.increment(&prescription.drug, required);
            *flag = false;
            tracing::debug!(id, line, drug = %prescription.drug, "line un-dispensed");
            Ok(false)
        } else if self.inventory.try_decrement(&prescription.drug, required) {
            *flag = true;
            tracing::debug!(id, line, drug = %prescription.drug, "line dispensed");
            Ok(true)
        } else {
            Err(FulfillmentError::InsufficientStock {
                drug: prescription.drug.clone(),
                required,
                available: self.inventory.stock(&prescription.drug).unwrap_or(0),
            })
        }
    }

    /// Replace the remarks text of a Pending record.
    pub fn set_remarks(&mut self, id: &str, text: &str) -> FulfillmentResult<()> {
        let record = record_mut(&mut self.records, id)?;
        match &mut record.status {
            FulfillmentStatus::Pending { remarks, .. } => {
                *remarks = text.to_string();
                Ok(())
            }
            other => Err(FulfillmentError::InvalidState {
                id: id.to_string(),
                expected: "Pending",
                actual: other.name(),
            }),
        }
    }

    /// Finalize a Pending record: stamp the issue timestamp and freeze the
    /// dispense flags and remarks into a Fulfilled snapshot.
    ///
    /// Dispensing every line is not required; partial fulfillment (with the
    /// exception captured in remarks) is a supported end state.
    pub fn complete_fulfillment(&mut self, id: &str) -> FulfillmentResult<()> {
        let record = record_mut(&mut self.records, id)?;
        match &mut record.status {
            FulfillmentStatus::Pending { dispensed, remarks } => {
                let frozen = FulfillmentStatus::Fulfilled {
                    dispensed: std::mem::take(dispensed),
                    remarks: std::mem::take(remarks),
                    issued_at: chrono::Utc::now().to_rfc3339(),
                };
                record.status = frozen;
                tracing::debug!(id, "request fulfilled");
                Ok(())
            }
            other => Err(FulfillmentError::InvalidState {
                id: id.to_string(),
                expected: "Pending",
                actual: other.name(),
            }),
        }
    }

    /// Look up a record by ID in any stage.
    pub fn get(&self, id: &str) -> Option<&FulfillmentRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Requested records in arrival order.
    pub fn requested(&self) -> impl Iterator<Item = &FulfillmentRecord> {
        self.records.iter().filter(|r| r.is_requested())
    }

    /// Pending records in arrival order.
    pub fn pending(&self) -> impl Iterator<Item = &FulfillmentRecord> {
        self.records.iter().filter(|r| r.is_pending())
    }

    /// Fulfilled records in arrival order.
    pub fn fulfilled(&self) -> impl Iterator<Item = &FulfillmentRecord> {
        self.records.iter().filter(|r| r.is_fulfilled())
    }

    /// Read access to the inventory store.
    pub fn inventory(&self) -> &InventoryStore {
        &self.inventory
    }

    /// Tear down the pipeline, handing the inventory store back.
    pub fn into_inventory(self) -> InventoryStore {
        self.inventory
    }
}

fn record_mut<'a>(
    records: &'a mut [FulfillmentRecord],
    id: &str,
) -> FulfillmentResult<&'a mut FulfillmentRecord> {
    records
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| FulfillmentError::NotFound(id.to_string()))
}
