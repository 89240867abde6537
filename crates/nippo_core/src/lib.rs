//! Core domain logic for the daily report service.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogTarget, LoggingError};
pub use model::employee::{Employee, EmployeeCode, EmployeeValidationError, Role};
pub use model::report::{Report, ReportId, ReportValidationError};
pub use repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
pub use repo::report_repo::{
    RepoError, RepoResult, ReportListQuery, ReportRepository, SqliteReportRepository,
};
pub use service::report_service::{
    ReportChanges, ReportService, ReportServiceError, ServiceResult,
};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
