//! Domain model for employees and their daily reports.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep validation rules next to the records they guard.
//!
//! # Invariants
//! - Every report is identified by a stable `ReportId`.
//! - Deletion is represented by soft-delete tombstones, not hard delete.
//! - At most one active report exists per employee and report date.

pub mod employee;
pub mod report;
