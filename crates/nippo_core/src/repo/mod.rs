//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes enforce model validation before persistence.
//! - Repository APIs return semantic errors (`NotFound`,
//!   `DuplicateReportDate`) in addition to DB transport errors.

pub mod employee_repo;
pub mod report_repo;
mod schema;
