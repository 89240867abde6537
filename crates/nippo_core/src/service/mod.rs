//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep the web and CLI layers decoupled from storage details.

pub mod report_service;
