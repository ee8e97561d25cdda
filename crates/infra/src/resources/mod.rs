//! Typed clients for the domain resources
//!
//! Each resource is the same thin set of conventional operations over
//! `GET/POST /{resource}/` and `GET/PUT/DELETE /{resource}/{id}/`; they vary
//! only by endpoint path and payload shape and add no logic of their own.
//! `list()` doubles as the explicit idempotent refetch operation.
//!
//! Bulk deletion is strictly sequential (one call at a time to bound
//! concurrent load on the backend) and stops at the first failure.

pub mod appointments;
pub mod inventory;
pub mod invoices;
pub mod patients;
pub mod treatments;
pub mod xrays;

use std::sync::Arc;

use thiserror::Error;

pub use appointments::AppointmentsApi;
pub use inventory::InventoryApi;
pub use invoices::InvoicesApi;
pub use patients::PatientsApi;
pub use treatments::TreatmentsApi;
pub use xrays::XraysApi;

use crate::api::{ApiClient, ApiError};

/// A bulk delete that stopped partway
///
/// `deleted` items are gone on the server while the rest remain; the local
/// view is inconsistent until a full refetch.
#[derive(Debug, Error)]
#[error("stopped after {deleted} deletions at {failed_id}: {source}")]
pub struct BulkDeleteError {
    /// Number of deletions that completed before the failure
    pub deleted: usize,
    /// Identifier of the item whose deletion failed
    pub failed_id: String,
    #[source]
    pub source: ApiError,
}

/// All resource clients over one shared API client
pub struct DentNotion {
    pub patients: PatientsApi,
    pub appointments: AppointmentsApi,
    pub treatments: TreatmentsApi,
    pub invoices: InvoicesApi,
    pub inventory: InventoryApi,
    pub xrays: XraysApi,
}

impl DentNotion {
    /// Bundle every resource client over the given API client
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            patients: PatientsApi::new(client.clone()),
            appointments: AppointmentsApi::new(client.clone()),
            treatments: TreatmentsApi::new(client.clone()),
            invoices: InvoicesApi::new(client.clone()),
            inventory: InventoryApi::new(client.clone()),
            xrays: XraysApi::new(client),
        }
    }
}
