//! Dashboard aggregation
//!
//! Pulls the three dashboard lists concurrently and joins them. Partial
//! results are never exposed: any failing list call fails the whole load,
//! and the caller resets to an empty view rather than merging.

use chrono::NaiveDate;
use dentnotion_domain::{Appointment, Invoice, InvoiceStatus};
use tracing::debug;

use crate::api::ApiError;
use crate::resources::DentNotion;

/// Number of appointments shown in the "recent" panel
const RECENT_APPOINTMENTS: usize = 10;

/// Aggregated dashboard view
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    /// Total patient count (the server-reported list count)
    pub total_patients: u64,
    /// Appointments scheduled for `today`
    pub today_appointments: u64,
    /// Sum of all paid invoice amounts
    pub total_revenue: f64,
    /// Number of unpaid invoices
    pub unpaid_invoices: u64,
    /// The first appointments in server order
    pub recent_appointments: Vec<Appointment>,
}

/// Load the dashboard in one concurrent sweep
///
/// # Errors
/// Returns the first failing list call's error; no partial stats are
/// produced
pub async fn load(api: &DentNotion, today: NaiveDate) -> Result<DashboardStats, ApiError> {
    let (patients, appointments, invoices) =
        tokio::try_join!(api.patients.list(), api.appointments.list(), api.invoices.list())?;

    debug!(
        patients = patients.count,
        appointments = appointments.count,
        invoices = invoices.count,
        "dashboard lists loaded"
    );

    let today_appointments =
        appointments.results.iter().filter(|appointment| appointment.date == today).count() as u64;

    let total_revenue: f64 = invoices
        .results
        .iter()
        .filter(|invoice| invoice.status == InvoiceStatus::Paid)
        .map(Invoice::amount_value)
        .sum();

    let unpaid_invoices =
        invoices.results.iter().filter(|invoice| invoice.status == InvoiceStatus::Unpaid).count()
            as u64;

    let recent_appointments =
        appointments.results.into_iter().take(RECENT_APPOINTMENTS).collect();

    Ok(DashboardStats {
        total_patients: patients.count,
        today_appointments,
        total_revenue,
        unpaid_invoices,
        recent_appointments,
    })
}
