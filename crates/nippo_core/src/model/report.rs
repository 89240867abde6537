//! Daily report domain model.
//!
//! # Responsibility
//! - Define the canonical daily report record.
//! - Provide field validation and soft-delete lifecycle helpers.
//!
//! # Invariants
//! - `id` is stable and never reused for another report.
//! - `is_deleted` is the source of truth for tombstone state.
//! - `(employee_code, report_date)` is unique among active reports. The
//!   service checks it before writes and storage backs it with an index.

use crate::model::employee::EmployeeCode;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a daily report.
pub type ReportId = Uuid;

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 100;
/// Maximum content length in characters.
pub const CONTENT_MAX_CHARS: usize = 600;

/// One employee's work report for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: ReportId,
    /// Owner of the report.
    pub employee_code: EmployeeCode,
    /// Owner display name. Filled on reads; ignored on writes.
    pub employee_name: Option<String>,
    pub report_date: NaiveDate,
    pub title: String,
    pub content: String,
    /// Soft delete tombstone.
    pub is_deleted: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

/// Field-level validation failure for a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportValidationError {
    BlankTitle,
    TitleTooLong { max: usize, actual: usize },
    BlankContent,
    ContentTooLong { max: usize, actual: usize },
}

impl ReportValidationError {
    /// Form field name the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::BlankTitle | Self::TitleTooLong { .. } => "title",
            Self::BlankContent | Self::ContentTooLong { .. } => "content",
        }
    }
}

impl Display for ReportValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "title must not be blank"),
            Self::TitleTooLong { max, actual } => {
                write!(f, "title must be at most {max} characters, got {actual}")
            }
            Self::BlankContent => write!(f, "content must not be blank"),
            Self::ContentTooLong { max, actual } => {
                write!(f, "content must be at most {max} characters, got {actual}")
            }
        }
    }
}

impl Error for ReportValidationError {}

impl Report {
    /// Creates an active report draft with a generated id.
    ///
    /// Timestamps start at zero; the service stamps them on save.
    pub fn new(
        employee_code: impl Into<String>,
        report_date: NaiveDate,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), employee_code, report_date, title, content)
    }

    /// Creates an active report draft with a caller-provided id.
    pub fn with_id(
        id: ReportId,
        employee_code: impl Into<String>,
        report_date: NaiveDate,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            employee_code: employee_code.into(),
            employee_name: None,
            report_date,
            title: title.into(),
            content: content.into(),
            is_deleted: false,
            created_at: 0,
            updated_at: 0,
        }
    }

    /// Returns the first validation failure, if any.
    pub fn validate(&self) -> Result<(), ReportValidationError> {
        match self.validation_errors().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Returns every validation failure, title rules first.
    pub fn validation_errors(&self) -> Vec<ReportValidationError> {
        let mut errors = Vec::new();

        let title_chars = self.title.chars().count();
        if self.title.trim().is_empty() {
            errors.push(ReportValidationError::BlankTitle);
        } else if title_chars > TITLE_MAX_CHARS {
            errors.push(ReportValidationError::TitleTooLong {
                max: TITLE_MAX_CHARS,
                actual: title_chars,
            });
        }

        let content_chars = self.content.chars().count();
        if self.content.trim().is_empty() {
            errors.push(ReportValidationError::BlankContent);
        } else if content_chars > CONTENT_MAX_CHARS {
            errors.push(ReportValidationError::ContentTooLong {
                max: CONTENT_MAX_CHARS,
                actual: content_chars,
            });
        }

        errors
    }

    /// Marks this report as softly deleted.
    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
    }

    /// Returns whether this report is visible in listings.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}
