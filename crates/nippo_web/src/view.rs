//! View-name plus model responses.
//!
//! Handlers answer with the name of the page they would render and the
//! attributes that page needs. Rendering itself is left to the client, so a
//! view goes out as JSON: `{ "view": ..., "model": { ... } }`.

use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use log::error;
use serde::Serialize;
use serde_json::{json, Map, Value};

pub const LIST_VIEW: &str = "reports/list";
pub const DETAIL_VIEW: &str = "reports/detail";
pub const NEW_VIEW: &str = "reports/new";
pub const UPDATE_VIEW: &str = "reports/update";

/// Redirect target after a successful write.
pub const REPORTS_PATH: &str = "/reports";

/// A named view and its model attributes.
#[derive(Debug, Clone)]
pub struct View {
    name: &'static str,
    model: Map<String, Value>,
}

impl View {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            model: Map::new(),
        }
    }

    /// Adds one model attribute, replacing any previous value under `key`.
    pub fn attribute(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let key = key.into();
        let value = serde_json::to_value(value).unwrap_or_else(|err| {
            error!("event=view_attribute module=web status=error key={key} error={err}");
            Value::Null
        });
        self.model.insert(key, value);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn model(&self) -> &Map<String, Value> {
        &self.model
    }
}

impl IntoResponse for View {
    fn into_response(self) -> Response {
        Json(json!({ "view": self.name, "model": self.model })).into_response()
    }
}

/// Handler outcome for form submissions.
#[derive(Debug)]
pub enum Page {
    /// Re-render a view, typically a form with errors.
    Render(View),
    /// `303 See Other` to a path.
    Redirect(&'static str),
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        match self {
            Self::Render(view) => view.into_response(),
            Self::Redirect(path) => Redirect::to(path).into_response(),
        }
    }
}
