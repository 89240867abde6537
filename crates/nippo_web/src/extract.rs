//! Request extractors whose rejections answer with the JSON error body.
//!
//! Wrap axum's `Path` and `Form`; a malformed id or a body that is not
//! form-encoded becomes an [`AppError::Rejected`] carrying axum's status.

use crate::error::AppError;
use axum::extract::rejection::{FormRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts};

/// Path parameters, rejected as [`AppError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

/// Form body, rejected as [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Form), rejection(AppError))]
pub struct Form<T>(pub T);

impl From<PathRejection> for AppError {
    fn from(value: PathRejection) -> Self {
        Self::Rejected(value.status(), value.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(value: FormRejection) -> Self {
        Self::Rejected(value.status(), value.body_text())
    }
}
