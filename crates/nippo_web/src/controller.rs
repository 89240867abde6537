//! Report controller.
//!
//! # Responsibility
//! - Map `/reports` routes to views and model attributes.
//! - Bind form input and surface service rejections back onto the form.
//!
//! # Invariants
//! - ADMIN lists every active report; other employees list only their own.
//! - Single-report routes answer 404 for missing reports and 403 for
//!   reports the principal may not access.
//! - Successful writes redirect to `/reports`.

use crate::auth::Principal;
use crate::error::AppError;
use crate::extract::{Form, Path};
use crate::form::{FieldError, ReportForm, ReportFormModel};
use crate::state::AppState;
use crate::view::{Page, View, DETAIL_VIEW, LIST_VIEW, NEW_VIEW, REPORTS_PATH, UPDATE_VIEW};
use axum::extract::State;
use axum::Extension;
use nippo_core::{
    Report, ReportChanges, ReportId, ReportService, ReportServiceError, SqliteReportRepository,
};
use rusqlite::Connection;

/// `GET /reports`
pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<View, AppError> {
    let reports = state
        .run(move |conn| {
            with_service(conn, |service| {
                let employee = principal.employee();
                let reports = if employee.is_admin() {
                    service.find_all()?
                } else {
                    service.find_by_employee(&employee.code)?
                };
                Ok(reports)
            })
        })
        .await?;

    Ok(View::new(LIST_VIEW)
        .attribute("listSize", reports.len())
        .attribute("reportList", reports))
}

/// `GET /reports/{id}/`
pub async fn detail(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<ReportId>,
) -> Result<View, AppError> {
    let report = state
        .run(move |conn| with_service(conn, |service| load_accessible(service, &principal, id)))
        .await?;

    Ok(View::new(DETAIL_VIEW).attribute("report", report))
}

/// `GET /reports/add`
pub async fn new_form(Extension(principal): Extension<Principal>) -> View {
    View::new(NEW_VIEW).attribute("report", ReportFormModel::blank(principal.employee()))
}

/// `POST /reports/add`
pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Form(form): Form<ReportForm>,
) -> Result<Page, AppError> {
    let writer = principal.employee().clone();
    let echo = ReportFormModel::from_submission(None, &writer.code, Some(&writer.name), &form);

    let bound = match form.bind() {
        Ok(bound) => bound,
        Err(errors) => return Ok(Page::Render(form_with_errors(NEW_VIEW, echo, errors))),
    };

    let draft = Report::new(
        writer.code.as_str(),
        bound.report_date,
        bound.title,
        bound.content,
    );
    let outcome = state
        .run(move |conn| with_service(conn, |service| Ok(service.save(draft))))
        .await?;

    match outcome {
        Ok(_) => Ok(Page::Redirect(REPORTS_PATH)),
        Err(err) => rejected_form(NEW_VIEW, echo, err),
    }
}

/// `GET /reports/{id}/update`
pub async fn edit_form(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<ReportId>,
) -> Result<View, AppError> {
    let report = state
        .run(move |conn| with_service(conn, |service| load_accessible(service, &principal, id)))
        .await?;

    Ok(View::new(UPDATE_VIEW).attribute("report", report))
}

/// `POST /reports/{id}/update`
pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<ReportId>,
    Form(form): Form<ReportForm>,
) -> Result<Page, AppError> {
    let (changes, errors) = match form.bind() {
        Ok(bound) => (
            Some(ReportChanges {
                report_date: bound.report_date,
                title: bound.title,
                content: bound.content,
            }),
            Vec::new(),
        ),
        Err(errors) => (None, errors),
    };

    let (existing, outcome) = state
        .run(move |conn| {
            with_service(conn, |service| {
                let existing = load_accessible(service, &principal, id)?;
                let outcome = changes.map(|changes| service.update(id, changes));
                Ok((existing, outcome))
            })
        })
        .await?;

    // The owner always comes from the stored report, never from the form.
    let echo = ReportFormModel::from_submission(
        Some(id),
        &existing.employee_code,
        existing.employee_name.as_deref(),
        &form,
    );

    match outcome {
        None => Ok(Page::Render(form_with_errors(UPDATE_VIEW, echo, errors))),
        Some(Ok(_)) => Ok(Page::Redirect(REPORTS_PATH)),
        Some(Err(err)) => rejected_form(UPDATE_VIEW, echo, err),
    }
}

/// `POST /reports/{id}/delete`
pub async fn delete(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<ReportId>,
) -> Result<Page, AppError> {
    state
        .run(move |conn| {
            with_service(conn, |service| {
                load_accessible(service, &principal, id)?;
                Ok(service.delete(id)?)
            })
        })
        .await?;

    Ok(Page::Redirect(REPORTS_PATH))
}

fn with_service<T>(
    conn: &Connection,
    f: impl FnOnce(&ReportService<SqliteReportRepository<'_>>) -> Result<T, AppError>,
) -> Result<T, AppError> {
    let repo = SqliteReportRepository::try_new(conn)?;
    f(&ReportService::new(repo))
}

fn load_accessible(
    service: &ReportService<SqliteReportRepository<'_>>,
    principal: &Principal,
    id: ReportId,
) -> Result<Report, AppError> {
    let report = service
        .find_by_id(id)?
        .ok_or_else(|| AppError::NotFound(format!("report {id}")))?;
    if !principal.can_access(&report) {
        return Err(AppError::Forbidden);
    }
    Ok(report)
}

fn form_with_errors(view: &'static str, echo: ReportFormModel, errors: Vec<FieldError>) -> View {
    View::new(view)
        .attribute("report", echo)
        .attribute("errors", errors)
}

fn rejected_form(
    view: &'static str,
    echo: ReportFormModel,
    err: ReportServiceError,
) -> Result<Page, AppError> {
    match err.error_attribute() {
        Some((name, message)) => Ok(Page::Render(
            View::new(view)
                .attribute("report", echo)
                .attribute(name, message),
        )),
        None => Err(err.into()),
    }
}
