//! HTTP surface for the daily report service.
//!
//! # Responsibility
//! - Expose report CRUD routes on top of `nippo_core` services.
//! - Resolve the requesting employee and apply the role-based view rules.
//!
//! # Invariants
//! - Handlers never touch SQL directly; they go through core services.
//! - SQLite work never runs on async worker threads.

pub mod auth;
pub mod config;
pub mod controller;
pub mod error;
pub mod extract;
pub mod form;
pub mod router;
pub mod state;
pub mod view;

pub use auth::{Principal, EMPLOYEE_CODE_HEADER};
pub use config::Config;
pub use error::AppError;
pub use router::app_router;
pub use state::AppState;
