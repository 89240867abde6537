//! Report form binding.
//!
//! Form input arrives as strings. Binding turns it into typed values and
//! collects every field error at once, so a re-rendered form can show all
//! of them.

use chrono::NaiveDate;
use nippo_core::{Employee, Report, ReportId};
use serde::{Deserialize, Serialize};

const FORM_DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw `application/x-www-form-urlencoded` report fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportForm {
    pub report_date: String,
    pub title: String,
    pub content: String,
}

/// One field-level binding or validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Successfully bound form values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundReport {
    pub report_date: NaiveDate,
    pub title: String,
    pub content: String,
}

/// Form echo used as the `report` attribute of form views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFormModel {
    pub id: Option<ReportId>,
    pub employee_code: String,
    pub employee_name: Option<String>,
    pub report_date: String,
    pub title: String,
    pub content: String,
}

impl ReportFormModel {
    /// Empty form owned by `writer`.
    pub fn blank(writer: &Employee) -> Self {
        Self {
            id: None,
            employee_code: writer.code.clone(),
            employee_name: Some(writer.name.clone()),
            report_date: String::new(),
            title: String::new(),
            content: String::new(),
        }
    }

    /// Echo of submitted values for an existing or new report.
    pub fn from_submission(
        id: Option<ReportId>,
        employee_code: &str,
        employee_name: Option<&str>,
        form: &ReportForm,
    ) -> Self {
        Self {
            id,
            employee_code: employee_code.to_string(),
            employee_name: employee_name.map(str::to_string),
            report_date: form.report_date.clone(),
            title: form.title.clone(),
            content: form.content.clone(),
        }
    }
}

impl ReportForm {
    /// Parses and validates all fields.
    ///
    /// Title and content follow the same rules the service enforces.
    pub fn bind(&self) -> Result<BoundReport, Vec<FieldError>> {
        let mut errors = Vec::new();

        let raw_date = self.report_date.trim();
        let report_date = if raw_date.is_empty() {
            errors.push(FieldError {
                field: "reportDate",
                message: "report date must not be empty".to_string(),
            });
            None
        } else {
            match NaiveDate::parse_from_str(raw_date, FORM_DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.push(FieldError {
                        field: "reportDate",
                        message: format!("report date must be YYYY-MM-DD, got `{raw_date}`"),
                    });
                    None
                }
            }
        };

        // Field rules live on the model; the date here is only a stand-in.
        let probe = Report::new(
            "",
            report_date.unwrap_or(NaiveDate::MIN),
            self.title.as_str(),
            self.content.as_str(),
        );
        errors.extend(probe.validation_errors().into_iter().map(|err| FieldError {
            field: err.field(),
            message: err.to_string(),
        }));

        match report_date {
            Some(report_date) if errors.is_empty() => Ok(BoundReport {
                report_date,
                title: self.title.clone(),
                content: self.content.clone(),
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ReportForm;
    use chrono::NaiveDate;

    fn form(date: &str, title: &str, content: &str) -> ReportForm {
        ReportForm {
            report_date: date.to_string(),
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn valid_form_binds_typed_values() {
        let bound = form("2024-04-01", "title", "content").bind().unwrap();
        assert_eq!(
            bound.report_date,
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
        );
        assert_eq!(bound.title, "title");
    }

    #[test]
    fn every_field_error_is_collected() {
        let errors = form("", " ", "").bind().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|err| err.field).collect();
        assert_eq!(fields, vec!["reportDate", "title", "content"]);
    }

    #[test]
    fn malformed_date_is_a_field_error() {
        let errors = form("04/01/2024", "title", "content").bind().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "reportDate");
        assert!(errors[0].message.contains("04/01/2024"));
    }
}
