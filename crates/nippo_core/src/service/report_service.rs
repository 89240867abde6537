//! Daily report use-case service.
//!
//! # Responsibility
//! - Enforce the one-report-per-employee-per-date rule before writes.
//! - Own bookkeeping fields: timestamps and the soft-delete flag.
//! - Expose listing/lookup entry points used by the web controller.
//!
//! # Invariants
//! - `save` always persists `is_deleted = false` and `created_at == updated_at`.
//! - `update` never changes owner, `created_at` or the delete flag.
//! - Lookups only return active reports.

use crate::model::employee::EmployeeCode;
use crate::model::report::{Report, ReportId, ReportValidationError};
use crate::repo::report_repo::{RepoError, ReportListQuery, ReportRepository};
use chrono::{NaiveDate, Utc};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Form attribute used to surface a duplicate report date.
pub const REPORT_DATE_ERROR_ATTRIBUTE: &str = "reportDateError";
/// User-facing message for a duplicate report date.
pub const REPORT_DATE_ERROR_MESSAGE: &str = "既に登録されている日付です";

/// Service error for report use-cases.
#[derive(Debug)]
pub enum ReportServiceError {
    /// Field rule violation.
    Validation(ReportValidationError),
    /// The employee already has an active report on this date.
    DuplicateReportDate {
        employee_code: EmployeeCode,
        report_date: NaiveDate,
    },
    /// Target report does not exist or is soft-deleted.
    ReportNotFound(ReportId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl ReportServiceError {
    /// Form attribute `(name, message)` for errors shown back to the user.
    ///
    /// Returns `None` for system failures.
    pub fn error_attribute(&self) -> Option<(String, String)> {
        match self {
            Self::DuplicateReportDate { .. } => Some((
                REPORT_DATE_ERROR_ATTRIBUTE.to_string(),
                REPORT_DATE_ERROR_MESSAGE.to_string(),
            )),
            Self::Validation(err) => Some((format!("{}Error", err.field()), err.to_string())),
            _ => None,
        }
    }
}

impl Display for ReportServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateReportDate {
                employee_code,
                report_date,
            } => write!(
                f,
                "employee {employee_code} already has a report on {report_date}"
            ),
            Self::ReportNotFound(id) => write!(f, "report not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent report state: {details}"),
        }
    }
}

impl Error for ReportServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ReportServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::ReportNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::DuplicateReportDate {
                employee_code,
                report_date,
            } => Self::DuplicateReportDate {
                employee_code,
                report_date,
            },
            other => Self::Repo(other),
        }
    }
}

impl From<ReportValidationError> for ReportServiceError {
    fn from(value: ReportValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type ServiceResult<T> = Result<T, ReportServiceError>;

/// Editable fields of an existing report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportChanges {
    pub report_date: NaiveDate,
    pub title: String,
    pub content: String,
}

/// Report service facade over repository implementations.
pub struct ReportService<R: ReportRepository> {
    repo: R,
    clock: fn() -> i64,
}

impl<R: ReportRepository> ReportService<R> {
    /// Creates a service stamping times from the system clock.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, now_epoch_ms)
    }

    /// Creates a service with a custom epoch-millisecond clock.
    pub fn with_clock(repo: R, clock: fn() -> i64) -> Self {
        Self { repo, clock }
    }

    /// Lists every active report.
    pub fn find_all(&self) -> ServiceResult<Vec<Report>> {
        Ok(self.repo.list_reports(&ReportListQuery::default())?)
    }

    /// Lists active reports owned by one employee.
    pub fn find_by_employee(&self, employee_code: &str) -> ServiceResult<Vec<Report>> {
        let query = ReportListQuery {
            employee_code: Some(employee_code.to_string()),
            include_deleted: false,
        };
        Ok(self.repo.list_reports(&query)?)
    }

    /// Gets one active report by id.
    pub fn find_by_id(&self, id: ReportId) -> ServiceResult<Option<Report>> {
        Ok(self.repo.get_report(id, false)?)
    }

    /// Persists a new report after the duplicate-date check.
    ///
    /// Timestamps and the delete flag on `report` are overwritten.
    pub fn save(&self, mut report: Report) -> ServiceResult<Report> {
        report.validate()?;

        if self
            .repo
            .exists_by_employee_and_date(&report.employee_code, report.report_date, None)?
        {
            warn!(
                "event=report_save module=service status=rejected reason=duplicate_date employee={} report_date={}",
                report.employee_code, report.report_date
            );
            return Err(ReportServiceError::DuplicateReportDate {
                employee_code: report.employee_code,
                report_date: report.report_date,
            });
        }

        let now = (self.clock)();
        report.created_at = now;
        report.updated_at = now;
        report.is_deleted = false;

        let id = self.repo.create_report(&report).map_err(|err| {
            log_write_failure("report_save", report.id, &err);
            err
        })?;
        info!("event=report_save module=service status=ok report_id={id}");

        self.repo
            .get_report(id, false)?
            .ok_or(ReportServiceError::InconsistentState(
                "saved report not found in read-back",
            ))
    }

    /// Replaces date, title and content of an active report.
    pub fn update(&self, id: ReportId, changes: ReportChanges) -> ServiceResult<Report> {
        let existing = self
            .repo
            .get_report(id, false)?
            .ok_or(ReportServiceError::ReportNotFound(id))?;

        let report = Report {
            report_date: changes.report_date,
            title: changes.title,
            content: changes.content,
            updated_at: (self.clock)(),
            ..existing
        };
        report.validate()?;

        if self.repo.exists_by_employee_and_date(
            &report.employee_code,
            report.report_date,
            Some(id),
        )? {
            warn!(
                "event=report_update module=service status=rejected reason=duplicate_date report_id={id} report_date={}",
                report.report_date
            );
            return Err(ReportServiceError::DuplicateReportDate {
                employee_code: report.employee_code,
                report_date: report.report_date,
            });
        }

        self.repo.update_report(&report).map_err(|err| {
            log_write_failure("report_update", id, &err);
            err
        })?;
        info!("event=report_update module=service status=ok report_id={id}");

        self.repo
            .get_report(id, false)?
            .ok_or(ReportServiceError::InconsistentState(
                "updated report not found in read-back",
            ))
    }

    /// Soft-deletes an active report.
    pub fn delete(&self, id: ReportId) -> ServiceResult<()> {
        if self.repo.get_report(id, false)?.is_none() {
            return Err(ReportServiceError::ReportNotFound(id));
        }

        self.repo
            .soft_delete_report(id, (self.clock)())
            .map_err(|err| {
                log_write_failure("report_delete", id, &err);
                err
            })?;
        info!("event=report_delete module=service status=ok report_id={id}");
        Ok(())
    }
}

fn log_write_failure(event: &str, id: ReportId, err: &RepoError) {
    match err {
        RepoError::DuplicateReportDate { .. } => warn!(
            "event={event} module=service status=rejected reason=duplicate_date_constraint report_id={id}"
        ),
        other => error!("event={event} module=service status=error report_id={id} error={other}"),
    }
}

/// Current Unix time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}
