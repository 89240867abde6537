//! Principal resolution.
//!
//! Authentication happens upstream; the fronting proxy sets
//! `X-Employee-Code` and this layer only resolves it to an active employee.

use crate::error::AppError;
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use log::warn;
use nippo_core::{Employee, EmployeeRepository, Report, SqliteEmployeeRepository};

/// Header carrying the authenticated employee code.
pub const EMPLOYEE_CODE_HEADER: &str = "x-employee-code";

/// Employee on whose behalf the request runs.
#[derive(Debug, Clone)]
pub struct Principal(pub Employee);

impl Principal {
    pub fn employee(&self) -> &Employee {
        &self.0
    }

    /// ADMIN may act on any report; everyone else only on their own.
    pub fn can_access(&self, report: &Report) -> bool {
        self.0.is_admin() || report.employee_code == self.0.code
    }
}

/// Middleware attaching a [`Principal`] extension or rejecting with 401.
pub async fn require_principal(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let code = request
        .headers()
        .get(EMPLOYEE_CODE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::Unauthorized("missing employee code header".to_string()))?;

    let lookup = code.clone();
    let employee = state
        .run(move |conn| {
            let repo = SqliteEmployeeRepository::try_new(conn)?;
            Ok(repo.get_employee(&lookup)?)
        })
        .await?;

    let Some(employee) = employee else {
        warn!("event=auth module=web status=rejected reason=unknown_employee");
        return Err(AppError::Unauthorized(format!("unknown employee `{code}`")));
    };

    request.extensions_mut().insert(Principal(employee));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::Principal;
    use chrono::NaiveDate;
    use nippo_core::{Employee, Report, Role};

    fn report_of(code: &str) -> Report {
        let date = NaiveDate::from_ymd_opt(2024, 4, 1).expect("valid date");
        Report::new(code, date, "title", "content")
    }

    #[test]
    fn admin_can_access_any_report() {
        let admin = Principal(Employee::new("ADM", "Admin", Role::Admin));
        assert!(admin.can_access(&report_of("E001")));
    }

    #[test]
    fn general_employee_only_accesses_own_reports() {
        let general = Principal(Employee::new("E001", "Sato", Role::General));
        assert!(general.can_access(&report_of("E001")));
        assert!(!general.can_access(&report_of("E002")));
    }
}
