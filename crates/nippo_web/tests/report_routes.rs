use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use nippo_core::db::open_db_in_memory;
use nippo_core::{Employee, EmployeeRepository, Role, SqliteEmployeeRepository};
use nippo_web::{app_router, AppState, EMPLOYEE_CODE_HEADER};
use serde_json::Value;
use tower::ServiceExt;

const ADMIN: &str = "ADM";
const SATO: &str = "E001";
const SUZUKI: &str = "E002";

struct TestResponse {
    status: StatusCode,
    location: Option<String>,
    body: Value,
}

fn app() -> Router {
    let conn = open_db_in_memory().unwrap();
    {
        let employees = SqliteEmployeeRepository::try_new(&conn).unwrap();
        employees
            .create_employee(&Employee::new(ADMIN, "Admin", Role::Admin))
            .unwrap();
        employees
            .create_employee(&Employee::new(SATO, "Sato", Role::General))
            .unwrap();
        employees
            .create_employee(&Employee::new(SUZUKI, "Suzuki", Role::General))
            .unwrap();
    }
    app_router(AppState::new(conn))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    employee: Option<&str>,
    form: Option<&str>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(code) = employee {
        builder = builder.header(EMPLOYEE_CODE_HEADER, code);
    }
    let body = match form {
        Some(form) => {
            builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
            Body::from(form.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|value| value.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    TestResponse {
        status,
        location,
        body,
    }
}

async fn get(app: &Router, uri: &str, employee: &str) -> TestResponse {
    send(app, Method::GET, uri, Some(employee), None).await
}

async fn post(app: &Router, uri: &str, employee: &str, form: &str) -> TestResponse {
    send(app, Method::POST, uri, Some(employee), Some(form)).await
}

async fn add_report(app: &Router, employee: &str, date: &str) -> String {
    let response = post(
        app,
        "/reports/add",
        employee,
        &format!("reportDate={date}&title=daily+work&content=wrote+code"),
    )
    .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let list = get(app, "/reports", employee).await;
    list.body["model"]["reportList"]
        .as_array()
        .unwrap()
        .iter()
        .find(|report| report["reportDate"] == date)
        .and_then(|report| report["id"].as_str())
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn health_does_not_require_principal() {
    let app = app();
    let response = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn reports_require_known_employee() {
    let app = app();

    let missing = send(&app, Method::GET, "/reports", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let unknown = get(&app, "/reports", "nobody").await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert!(unknown.body["error"].as_str().unwrap().contains("nobody"));
}

#[tokio::test]
async fn new_form_is_prefilled_with_writer() {
    let app = app();
    let response = get(&app, "/reports/add", SATO).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["view"], "reports/new");
    assert_eq!(response.body["model"]["report"]["employeeCode"], SATO);
    assert_eq!(response.body["model"]["report"]["employeeName"], "Sato");
    assert_eq!(response.body["model"]["report"]["title"], "");
}

#[tokio::test]
async fn create_redirects_and_report_appears_in_own_list() {
    let app = app();
    let response = post(
        &app,
        "/reports/add",
        SATO,
        "reportDate=2024-04-01&title=daily&content=done",
    )
    .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/reports"));

    let list = get(&app, "/reports", SATO).await;
    assert_eq!(list.body["view"], "reports/list");
    assert_eq!(list.body["model"]["listSize"], 1);
    let report = &list.body["model"]["reportList"][0];
    assert_eq!(report["employeeCode"], SATO);
    assert_eq!(report["employeeName"], "Sato");
    assert_eq!(report["reportDate"], "2024-04-01");
}

#[tokio::test]
async fn admin_sees_all_reports_and_general_sees_own() {
    let app = app();
    add_report(&app, SATO, "2024-04-01").await;
    add_report(&app, SUZUKI, "2024-04-01").await;

    let admin = get(&app, "/reports", ADMIN).await;
    assert_eq!(admin.body["model"]["listSize"], 2);

    let sato = get(&app, "/reports", SATO).await;
    assert_eq!(sato.body["model"]["listSize"], 1);
    assert_eq!(sato.body["model"]["reportList"][0]["employeeCode"], SATO);
}

#[tokio::test]
async fn duplicate_date_rerenders_form_with_report_date_error() {
    let app = app();
    add_report(&app, SATO, "2024-04-01").await;

    let response = post(
        &app,
        "/reports/add",
        SATO,
        "reportDate=2024-04-01&title=again&content=same+day",
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["view"], "reports/new");
    assert_eq!(
        response.body["model"]["reportDateError"],
        "既に登録されている日付です"
    );
    assert_eq!(response.body["model"]["report"]["title"], "again");

    let list = get(&app, "/reports", SATO).await;
    assert_eq!(list.body["model"]["listSize"], 1);
}

#[tokio::test]
async fn invalid_form_rerenders_with_field_errors() {
    let app = app();
    let response = post(&app, "/reports/add", SATO, "reportDate=&title=&content=x").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["view"], "reports/new");
    let fields: Vec<_> = response.body["model"]["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|error| error["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields, vec!["reportDate", "title"]);
}

#[tokio::test]
async fn detail_is_available_with_and_without_trailing_slash() {
    let app = app();
    let id = add_report(&app, SATO, "2024-04-01").await;

    let with_slash = get(&app, &format!("/reports/{id}/"), SATO).await;
    assert_eq!(with_slash.status, StatusCode::OK);
    assert_eq!(with_slash.body["view"], "reports/detail");
    assert_eq!(with_slash.body["model"]["report"]["id"], id.as_str());

    let without_slash = get(&app, &format!("/reports/{id}"), SATO).await;
    assert_eq!(without_slash.status, StatusCode::OK);
}

#[tokio::test]
async fn other_employees_report_is_forbidden_but_admin_may_view() {
    let app = app();
    let id = add_report(&app, SATO, "2024-04-01").await;

    let suzuki = get(&app, &format!("/reports/{id}/"), SUZUKI).await;
    assert_eq!(suzuki.status, StatusCode::FORBIDDEN);

    let admin = get(&app, &format!("/reports/{id}/"), ADMIN).await;
    assert_eq!(admin.status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_report_is_not_found() {
    let app = app();
    let response = get(
        &app,
        "/reports/00000000-0000-4000-8000-000000000000/",
        ADMIN,
    )
    .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_keeps_owner_even_when_admin_edits() {
    let app = app();
    let id = add_report(&app, SATO, "2024-04-01").await;

    let form = get(&app, &format!("/reports/{id}/update"), SATO).await;
    assert_eq!(form.body["view"], "reports/update");
    assert_eq!(form.body["model"]["report"]["title"], "daily work");

    let response = post(
        &app,
        &format!("/reports/{id}/update"),
        ADMIN,
        "reportDate=2024-04-02&title=revised&content=more+work",
    )
    .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let detail = get(&app, &format!("/reports/{id}/"), SATO).await;
    let report = &detail.body["model"]["report"];
    assert_eq!(report["employeeCode"], SATO);
    assert_eq!(report["title"], "revised");
    assert_eq!(report["reportDate"], "2024-04-02");
}

#[tokio::test]
async fn update_onto_taken_date_rerenders_update_view() {
    let app = app();
    add_report(&app, SATO, "2024-04-01").await;
    let second = add_report(&app, SATO, "2024-04-02").await;

    let response = post(
        &app,
        &format!("/reports/{second}/update"),
        SATO,
        "reportDate=2024-04-01&title=clash&content=x",
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["view"], "reports/update");
    assert_eq!(response.body["model"]["report"]["id"], second.as_str());
    assert!(response.body["model"]["reportDateError"].is_string());
}

#[tokio::test]
async fn invalid_update_form_rerenders_with_stored_owner() {
    let app = app();
    let id = add_report(&app, SATO, "2024-04-01").await;

    let response = post(
        &app,
        &format!("/reports/{id}/update"),
        ADMIN,
        "reportDate=2024-13-01&title=&content=x",
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["view"], "reports/update");
    assert_eq!(response.body["model"]["report"]["id"], id.as_str());
    assert_eq!(response.body["model"]["report"]["employeeCode"], SATO);
    assert_eq!(response.body["model"]["report"]["employeeName"], "Sato");
    let fields: Vec<_> = response.body["model"]["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|error| error["field"].as_str().unwrap().to_string())
        .collect();
    assert!(fields.contains(&"reportDate".to_string()));
    assert!(fields.contains(&"title".to_string()));

    let detail = get(&app, &format!("/reports/{id}/"), SATO).await;
    assert_eq!(detail.body["model"]["report"]["title"], "daily work");
}

#[tokio::test]
async fn non_form_body_is_rejected_with_json_error() {
    let app = app();
    let response = send(&app, Method::POST, "/reports/add", Some(SATO), None).await;

    assert_eq!(response.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(response.body["error"].is_string());
}

#[tokio::test]
async fn malformed_report_id_is_rejected_with_json_error() {
    let app = app();
    let response = get(&app, "/reports/not-a-uuid/", SATO).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].is_string());
}

#[tokio::test]
async fn deleting_twice_is_not_found() {
    let app = app();
    let id = add_report(&app, SATO, "2024-04-01").await;
    let uri = format!("/reports/{id}/delete");

    let first = send(&app, Method::POST, &uri, Some(SATO), None).await;
    assert_eq!(first.status, StatusCode::SEE_OTHER);

    let second = send(&app, Method::POST, &uri, Some(SATO), None).await;
    assert_eq!(second.status, StatusCode::NOT_FOUND);
    assert!(second.body["error"].is_string());
}

#[tokio::test]
async fn delete_hides_report_from_list_and_detail() {
    let app = app();
    let id = add_report(&app, SATO, "2024-04-01").await;

    let response = send(
        &app,
        Method::POST,
        &format!("/reports/{id}/delete"),
        Some(SATO),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/reports"));

    let list = get(&app, "/reports", ADMIN).await;
    assert_eq!(list.body["model"]["listSize"], 0);

    let detail = get(&app, &format!("/reports/{id}/"), SATO).await;
    assert_eq!(detail.status, StatusCode::NOT_FOUND);

    add_report(&app, SATO, "2024-04-01").await;
}

#[tokio::test]
async fn general_employee_cannot_delete_others_report() {
    let app = app();
    let id = add_report(&app, SATO, "2024-04-01").await;

    let response = send(
        &app,
        Method::POST,
        &format!("/reports/{id}/delete"),
        Some(SUZUKI),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let list = get(&app, "/reports", SATO).await;
    assert_eq!(list.body["model"]["listSize"], 1);
}
