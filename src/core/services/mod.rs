pub mod client_service;
pub mod dashboard_service;
pub mod expense_service;
pub mod import_service;
pub mod report_service;
pub mod session_service;

pub use client_service::ClientService;
pub use dashboard_service::{DashboardService, DashboardSummary, UnpaidSession};
pub use expense_service::ExpenseService;
pub use import_service::ImportService;
pub use report_service::{
    ClientIncome, MonthlyTotals, ReportService, YearReport, DEFAULT_MILEAGE_RATE,
};
pub use session_service::{SessionInput, SessionService};

use crate::errors::TutorError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] TutorError),
    #[error("{0}")]
    Invalid(String),
    #[error("{0} not found")]
    NotFound(String),
}

#[cfg(test)]
mod tests;
