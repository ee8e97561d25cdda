//! Domain record types
//!
//! Wire-faithful representations of the DentNotion REST resources. Record
//! identifiers are opaque server-assigned strings; server audit timestamps
//! (`created_at` / `updated_at` / `issued_at`) are carried verbatim and
//! never interpreted by the client.

pub mod appointment;
pub mod inventory;
pub mod invoice;
pub mod patient;
pub mod treatment;
pub mod user;
pub mod xray;

// Re-export record types for convenience
pub use appointment::{Appointment, AppointmentStatus, NewAppointment};
pub use inventory::{InventoryItem, InventoryStatus, NewInventoryItem};
pub use invoice::{Invoice, InvoiceStatus, NewInvoice};
pub use patient::{Gender, NewPatient, Patient};
pub use treatment::{NewTreatment, Treatment};
pub use user::UserIdentity;
pub use xray::{NewXray, XrayImage};
