//! Employee model as seen by the report module.
//!
//! Employees own reports and carry the role used for visibility checks.
//! Their own lifecycle (hiring, password, profile edits) lives elsewhere;
//! core only needs identity, display name and role.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable employee identifier (the employee "code").
pub type EmployeeCode = String;

/// Authorization role of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Sees and manages every report.
    Admin,
    /// Sees and manages only their own reports.
    General,
}

impl Role {
    /// Storage/wire label (`ADMIN` / `GENERAL`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::General => "GENERAL",
        }
    }

    /// Parses a role label, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Some(Self::Admin),
            "GENERAL" => Some(Self::General),
            _ => None,
        }
    }
}

/// Employee record referenced by reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub code: EmployeeCode,
    pub name: String,
    pub role: Role,
    pub is_deleted: bool,
}

/// Validation failures for employee writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeValidationError {
    BlankCode,
    BlankName,
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankCode => write!(f, "employee code must not be blank"),
            Self::BlankName => write!(f, "employee name must not be blank"),
        }
    }
}

impl Error for EmployeeValidationError {}

impl Employee {
    /// Creates an active employee.
    pub fn new(code: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            role,
            is_deleted: false,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Checks identity fields before persistence.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        if self.code.trim().is_empty() {
            return Err(EmployeeValidationError::BlankCode);
        }
        if self.name.trim().is_empty() {
            return Err(EmployeeValidationError::BlankName);
        }
        Ok(())
    }
}
