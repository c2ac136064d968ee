//! Test doubles shared by the controller tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use doable_core::{
    HttpMethod, HttpRequest, HttpResponse, NotificationKind, Notifier, Renderer, Result,
    Transport, View,
};
use parking_lot::Mutex;

/// Records every rendered view and notification.
#[derive(Clone, Default)]
pub struct Recorder {
    pub views: Arc<Mutex<Vec<View>>>,
    pub notes: Arc<Mutex<Vec<(String, NotificationKind)>>>,
}

impl Recorder {
    pub fn last_view(&self) -> Option<View> {
        self.views.lock().last().cloned()
    }

    pub fn last_note(&self) -> Option<(String, NotificationKind)> {
        self.notes.lock().last().cloned()
    }
}

impl Renderer for Recorder {
    fn render(&mut self, view: &View) {
        self.views.lock().push(view.clone());
    }
}

impl Notifier for Recorder {
    fn notify(&mut self, message: &str, kind: NotificationKind) {
        self.notes.lock().push((message.to_string(), kind));
    }
}

struct Route {
    method: HttpMethod,
    suffix: String,
    delay: Duration,
    response: HttpResponse,
}

/// Scripted server: first matching route (method + path suffix) wins.
/// Unmatched requests get 404. Routes can be replaced between calls.
#[derive(Clone, Default)]
pub struct Scripted {
    routes: Arc<Mutex<Vec<Route>>>,
    pub seen: Arc<Mutex<Vec<HttpRequest>>>,
}

impl Scripted {
    pub fn on(&self, method: HttpMethod, suffix: &str, status: u16, body: &str) -> &Self {
        self.on_delayed(method, suffix, Duration::ZERO, status, body)
    }

    pub fn on_delayed(
        &self,
        method: HttpMethod,
        suffix: &str,
        delay: Duration,
        status: u16,
        body: &str,
    ) -> &Self {
        let mut routes = self.routes.lock();
        routes.retain(|r| !(r.method == method && r.suffix == suffix));
        routes.push(Route {
            method,
            suffix: suffix.to_string(),
            delay,
            response: HttpResponse::new(status, body),
        });
        self
    }

    pub fn requests_to(&self, suffix: &str) -> usize {
        self.seen
            .lock()
            .iter()
            .filter(|r| r.path.ends_with(suffix))
            .count()
    }
}

#[async_trait]
impl Transport for Scripted {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.seen.lock().push(request.clone());
        let hit = self
            .routes
            .lock()
            .iter()
            .find(|r| r.method == request.method && request.path.ends_with(&r.suffix))
            .map(|r| (r.delay, r.response.clone()));
        match hit {
            Some((delay, response)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(response)
            }
            None => Ok(HttpResponse::new(404, "no route")),
        }
    }
}

pub const LISTS: &str = r#"[{"id":"l1","name":"Groceries","color":[0,128,255]}]"#;

/// Scenario store: t1 "Buy milk" (open, newer), t2 "Buy bread" (done, older).
/// Served oldest first so the client has to sort.
pub const TODOS: &str = r#"[
    {"id":"t2","title":"Buy bread","description":"","listId":"","isCompleted":true,"lastModified":"2024-01-01"},
    {"id":"t1","title":"Buy milk","description":"","listId":"l1","isCompleted":false,"lastModified":"2024-01-02"}
]"#;

pub fn healthy() -> Scripted {
    let server = Scripted::default();
    server
        .on(HttpMethod::Get, "/api/lists", 200, LISTS)
        .on(HttpMethod::Get, "/api/todos", 200, TODOS);
    server
}
