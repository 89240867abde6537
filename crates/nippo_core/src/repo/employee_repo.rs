//! Employee lookup repository.
//!
//! # Responsibility
//! - Resolve report owners and request principals by employee code.
//! - Seed employees for operators and tests.
//!
//! # Invariants
//! - `get_employee` never returns soft-deleted employees.

use crate::model::employee::{Employee, EmployeeCode, Role};
use crate::repo::report_repo::{bool_to_int, RepoError, RepoResult};
use crate::repo::schema::ensure_schema_ready;
use rusqlite::{params, Connection, ErrorCode, Row};

const EMPLOYEE_COLUMNS: &[&str] = &["code", "name", "role", "is_deleted"];

/// Repository interface for employee lookups.
pub trait EmployeeRepository {
    fn create_employee(&self, employee: &Employee) -> RepoResult<EmployeeCode>;
    fn get_employee(&self, code: &str) -> RepoResult<Option<Employee>>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, "employees", EMPLOYEE_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn create_employee(&self, employee: &Employee) -> RepoResult<EmployeeCode> {
        employee.validate()?;

        let code = employee.code.trim();
        self.conn
            .execute(
                "INSERT INTO employees (code, name, role, is_deleted)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    code,
                    employee.name.trim(),
                    employee.role.as_str(),
                    bool_to_int(employee.is_deleted),
                ],
            )
            .map_err(|err| match &err {
                rusqlite::Error::SqliteFailure(failure, _)
                    if failure.code == ErrorCode::ConstraintViolation =>
                {
                    RepoError::DuplicateEmployee(code.to_string())
                }
                _ => err.into(),
            })?;

        Ok(code.to_string())
    }

    fn get_employee(&self, code: &str) -> RepoResult<Option<Employee>> {
        let mut stmt = self.conn.prepare(
            "SELECT code, name, role, is_deleted
             FROM employees
             WHERE code = ?1
               AND is_deleted = 0;",
        )?;

        let mut rows = stmt.query([code])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }

        Ok(None)
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let role_text: String = row.get("role")?;
    let role = Role::parse(&role_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid role `{role_text}` in employees.role"))
    })?;

    Ok(Employee {
        code: row.get("code")?,
        name: row.get("name")?,
        role,
        is_deleted: row.get::<_, i64>("is_deleted")? != 0,
    })
}
