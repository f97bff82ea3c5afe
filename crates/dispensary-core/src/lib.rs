//! Dispensary Core Library
//!
//! Pharmacy dispensing workflow for clinic administration: a three-state
//! fulfillment pipeline coupled with inventory stock deduction, plus a
//! normalizer that maps heterogeneous backend invoice payloads into one
//! canonical invoice shape.
//!
//! # Architecture
//!
//! ```text
//! New requests ──▶ Requested ──advance──▶ Pending ──complete──▶ Fulfilled
//!                                            │
//!                                   per-line dispense toggle
//!                                            │
//!                                            ▼
//!                                     InventoryStore
//!                             (conditional decrement / restock)
//!
//! Raw invoice payload (any shape) ──normalize──▶ canonical Invoice
//! ```
//!
//! # Core Principle
//!
//! **Stock reflects exactly the dispensing decisions currently marked true.**
//! Checking a line deducts its required quantity; un-checking restocks it; a
//! line whose required quantity exceeds current stock is never marked
//! dispensed.
//!
//! # Modules
//!
//! - [`models`]: Domain types (DrugStock, FulfillmentRecord, Invoice, ...)
//! - [`inventory`]: In-memory per-drug stock store
//! - [`fulfillment`]: Dispensing state machine over the request set
//! - [`normalize`]: Permissive invoice payload normalization
//!
//! # Concurrency
//!
//! Single-actor, synchronous. Every operation completes immediately with
//! success or a named failure; nothing suspends, queues, or locks. A
//! deployment that shares one store across sessions must add its own
//! per-drug mutual exclusion around [`InventoryStore::try_decrement`];
//! the availability check and the deduction are not guarded here.

pub mod fulfillment;
pub mod inventory;
pub mod models;
pub mod normalize;

// Re-export commonly used types
pub use fulfillment::{Dispensary, FulfillmentError, FulfillmentResult};
pub use inventory::InventoryStore;
pub use models::{
    ClinicInfo, DrugStock, FulfillmentRecord, FulfillmentStatus, Invoice, InvoiceLine, Patient,
    PrescriptionLine,
};
pub use normalize::{normalize, normalize_at};
