//! Stateless HTTP request builder and response parser for the doable API.
//!
//! # Design
//! `ApiClient` holds only a `base_url` and carries no mutable state between
//! calls. Each remote operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The round-trip itself happens elsewhere (see
//! [`crate::gateway`]), which keeps this module deterministic.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;

use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{List, Todo};

/// Characters escaped when a todo id is placed in a path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Synchronous, stateless client for the doable API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_fetch_lists(&self) -> HttpRequest {
        self.get("api/lists")
    }

    pub fn build_fetch_todos(&self) -> HttpRequest {
        self.get("api/todos")
    }

    pub fn build_mark_complete(&self, id: &str) -> HttpRequest {
        self.put_flag(id, "check")
    }

    pub fn build_mark_incomplete(&self, id: &str) -> HttpRequest {
        self.put_flag(id, "uncheck")
    }

    /// `Ok(None)` means the server answered 200 with nothing to apply.
    pub fn parse_fetch_lists(&self, response: HttpResponse) -> Result<Option<Vec<List>>> {
        parse_snapshot(response)
    }

    /// `Ok(None)` means the server answered 200 with nothing to apply.
    pub fn parse_fetch_todos(&self, response: HttpResponse) -> Result<Option<Vec<Todo>>> {
        parse_snapshot(response)
    }

    pub fn parse_mark_complete(&self, response: HttpResponse) -> Result<()> {
        check_status(&response, 204)
    }

    pub fn parse_mark_incomplete(&self, response: HttpResponse) -> Result<()> {
        check_status(&response, 204)
    }

    fn get(&self, resource: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/{resource}", self.base_url),
            headers: vec![("accept".to_string(), "application/json".to_string())],
            body: None,
        }
    }

    fn put_flag(&self, id: &str, action: &str) -> HttpRequest {
        let id = utf8_percent_encode(id, SEGMENT);
        HttpRequest {
            method: HttpMethod::Put,
            path: format!("{}/api/todos/{id}/{action}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }
}

/// A blank body, a literal `null` or an empty array is a successful
/// "no update".
fn parse_snapshot<T: DeserializeOwned>(response: HttpResponse) -> Result<Option<Vec<T>>> {
    check_status(&response, 200)?;
    if response.body.trim().is_empty() {
        return Ok(None);
    }
    let items: Option<Vec<T>> = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::Deserialization(e.to_string()))?;
    Ok(items.filter(|items| !items.is_empty()))
}

/// Anything but the expected status is a failure carrying the body verbatim.
fn check_status(response: &HttpResponse, expected: u16) -> Result<()> {
    if response.status == expected {
        return Ok(());
    }
    Err(ApiError::Status {
        status: response.status,
        body: response.body.clone(),
    })
}
