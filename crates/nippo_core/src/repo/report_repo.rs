//! Report repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and existence queries over the `reports` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Report::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Existence checks only consider active (`is_deleted = 0`) rows.

use crate::db::DbError;
use crate::model::employee::{EmployeeCode, EmployeeValidationError};
use crate::model::report::{Report, ReportId, ReportValidationError};
use crate::repo::schema::ensure_schema_ready;
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";

const REPORT_SELECT_SQL: &str = "SELECT
    r.uuid,
    r.employee_code,
    e.name AS employee_name,
    r.report_date,
    r.title,
    r.content,
    r.is_deleted,
    r.created_at,
    r.updated_at
FROM reports r
LEFT JOIN employees e ON e.code = r.employee_code";

const REPORT_COLUMNS: &[&str] = &[
    "uuid",
    "employee_code",
    "report_date",
    "title",
    "content",
    "is_deleted",
    "created_at",
    "updated_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for report and employee persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(ReportValidationError),
    InvalidEmployee(EmployeeValidationError),
    Db(DbError),
    NotFound(ReportId),
    /// Referenced employee does not exist.
    EmployeeNotFound(EmployeeCode),
    /// Employee code already taken.
    DuplicateEmployee(EmployeeCode),
    /// Storage rejected a second active report for the same employee and date.
    DuplicateReportDate {
        employee_code: EmployeeCode,
        report_date: NaiveDate,
    },
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidEmployee(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "report not found: {id}"),
            Self::EmployeeNotFound(code) => write!(f, "employee not found: {code}"),
            Self::DuplicateEmployee(code) => write!(f, "employee already exists: {code}"),
            Self::DuplicateReportDate {
                employee_code,
                report_date,
            } => write!(
                f,
                "report already exists for employee {employee_code} on {report_date}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::InvalidEmployee(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ReportValidationError> for RepoError {
    fn from(value: ReportValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<EmployeeValidationError> for RepoError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::InvalidEmployee(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing reports.
#[derive(Debug, Clone, Default)]
pub struct ReportListQuery {
    /// Restrict to one owner; `None` lists every employee.
    pub employee_code: Option<EmployeeCode>,
    pub include_deleted: bool,
}

/// Repository interface for report persistence.
pub trait ReportRepository {
    fn create_report(&self, report: &Report) -> RepoResult<ReportId>;
    fn update_report(&self, report: &Report) -> RepoResult<()>;
    fn get_report(&self, id: ReportId, include_deleted: bool) -> RepoResult<Option<Report>>;
    fn list_reports(&self, query: &ReportListQuery) -> RepoResult<Vec<Report>>;
    /// Whether an active report exists for the employee and date,
    /// optionally ignoring one report id.
    fn exists_by_employee_and_date(
        &self,
        employee_code: &str,
        report_date: NaiveDate,
        exclude_id: Option<ReportId>,
    ) -> RepoResult<bool>;
    fn soft_delete_report(&self, id: ReportId, updated_at: i64) -> RepoResult<()>;
}

/// SQLite-backed report repository.
pub struct SqliteReportRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReportRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` on schema drift.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, "reports", REPORT_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl ReportRepository for SqliteReportRepository<'_> {
    fn create_report(&self, report: &Report) -> RepoResult<ReportId> {
        report.validate()?;

        self.conn
            .execute(
                "INSERT INTO reports (
                    uuid,
                    employee_code,
                    report_date,
                    title,
                    content,
                    is_deleted,
                    created_at,
                    updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
                params![
                    report.id.to_string(),
                    report.employee_code.as_str(),
                    report_date_to_db(report.report_date),
                    report.title.as_str(),
                    report.content.as_str(),
                    bool_to_int(report.is_deleted),
                    report.created_at,
                    report.updated_at,
                ],
            )
            .map_err(|err| map_constraint_error(err, report))?;

        Ok(report.id)
    }

    fn update_report(&self, report: &Report) -> RepoResult<()> {
        report.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE reports
                 SET
                    report_date = ?1,
                    title = ?2,
                    content = ?3,
                    is_deleted = ?4,
                    created_at = ?5,
                    updated_at = ?6
                 WHERE uuid = ?7;",
                params![
                    report_date_to_db(report.report_date),
                    report.title.as_str(),
                    report.content.as_str(),
                    bool_to_int(report.is_deleted),
                    report.created_at,
                    report.updated_at,
                    report.id.to_string(),
                ],
            )
            .map_err(|err| map_constraint_error(err, report))?;

        if changed == 0 {
            return Err(RepoError::NotFound(report.id));
        }

        Ok(())
    }

    fn get_report(&self, id: ReportId, include_deleted: bool) -> RepoResult<Option<Report>> {
        let mut stmt = self.conn.prepare(&format!(
            "{REPORT_SELECT_SQL}
             WHERE r.uuid = ?1
               AND (?2 = 1 OR r.is_deleted = 0);"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), bool_to_int(include_deleted)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_report_row(row)?));
        }

        Ok(None)
    }

    fn list_reports(&self, query: &ReportListQuery) -> RepoResult<Vec<Report>> {
        let mut sql = format!("{REPORT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if !query.include_deleted {
            sql.push_str(" AND r.is_deleted = 0");
        }

        if let Some(code) = query.employee_code.as_ref() {
            sql.push_str(" AND r.employee_code = ?");
            bind_values.push(Value::Text(code.clone()));
        }

        sql.push_str(" ORDER BY r.report_date DESC, r.created_at DESC, r.uuid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut reports = Vec::new();

        while let Some(row) = rows.next()? {
            reports.push(parse_report_row(row)?);
        }

        Ok(reports)
    }

    fn exists_by_employee_and_date(
        &self,
        employee_code: &str,
        report_date: NaiveDate,
        exclude_id: Option<ReportId>,
    ) -> RepoResult<bool> {
        let excluded = exclude_id.map(|id| id.to_string());
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM reports
                WHERE employee_code = ?1
                  AND report_date = ?2
                  AND is_deleted = 0
                  AND (?3 IS NULL OR uuid <> ?3)
            );",
            params![employee_code, report_date_to_db(report_date), excluded],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn soft_delete_report(&self, id: ReportId, updated_at: i64) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE reports
             SET
                is_deleted = 1,
                updated_at = ?2
             WHERE uuid = ?1;",
            params![id.to_string(), updated_at],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_report_row(row: &Row<'_>) -> RepoResult<Report> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in reports.uuid"))
    })?;

    let date_text: String = row.get("report_date")?;
    let report_date = parse_report_date(&date_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid date `{date_text}` in reports.report_date"
        ))
    })?;

    let is_deleted = match row.get::<_, i64>("is_deleted")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_deleted value `{other}` in reports.is_deleted"
            )));
        }
    };

    Ok(Report {
        id,
        employee_code: row.get("employee_code")?,
        employee_name: row.get("employee_name")?,
        report_date,
        title: row.get("title")?,
        content: row.get("content")?,
        is_deleted,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Maps constraint failures on report writes to semantic errors.
fn map_constraint_error(err: rusqlite::Error, report: &Report) -> RepoError {
    if let rusqlite::Error::SqliteFailure(failure, _) = &err {
        if failure.code == ErrorCode::ConstraintViolation {
            match failure.extended_code {
                rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE => {
                    return RepoError::DuplicateReportDate {
                        employee_code: report.employee_code.clone(),
                        report_date: report.report_date,
                    };
                }
                rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                    return RepoError::EmployeeNotFound(report.employee_code.clone());
                }
                _ => {}
            }
        }
    }
    err.into()
}

fn report_date_to_db(date: NaiveDate) -> String {
    date.format(REPORT_DATE_FORMAT).to_string()
}

fn parse_report_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, REPORT_DATE_FORMAT).ok()
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
