use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct List {
    pub id: String,
    pub name: String,
    pub color: [u8; 3],
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub list_id: String,
    pub is_completed: bool,
    pub last_modified: String,
}

/// In-memory server state. `failure`, when set, makes both fetch routes
/// answer with that status and body.
#[derive(Debug, Default)]
pub struct Store {
    pub lists: Vec<List>,
    pub todos: Vec<Todo>,
    pub failure: Option<(u16, String)>,
}

impl Store {
    pub fn seeded(lists: Vec<List>, todos: Vec<Todo>) -> Self {
        Self {
            lists,
            todos,
            failure: None,
        }
    }

    pub fn fail_fetches(&mut self, status: u16, body: &str) {
        self.failure = Some((status, body.to_string()));
    }

    pub fn clear_failure(&mut self) {
        self.failure = None;
    }

    fn check_failure(&self) -> Result<(), (StatusCode, String)> {
        match &self.failure {
            Some((status, body)) => Err((
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                body.clone(),
            )),
            None => Ok(()),
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

type ApiResult<T> = Result<T, (StatusCode, String)>;

pub fn app() -> Router {
    app_with(Db::default())
}

pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/api/lists", get(list_lists))
        .route("/api/todos", get(list_todos))
        .route("/api/todos/{id}/check", put(check_todo))
        .route("/api/todos/{id}/uncheck", put(uncheck_todo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Db::default()).await
}

pub async fn run_with(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(db)).await
}

async fn list_lists(State(db): State<Db>) -> ApiResult<Json<Vec<List>>> {
    let store = db.read().await;
    store.check_failure()?;
    info!("todo lists requested");
    Ok(Json(store.lists.clone()))
}

async fn list_todos(State(db): State<Db>) -> ApiResult<Json<Vec<Todo>>> {
    let store = db.read().await;
    store.check_failure()?;
    info!("todos requested");
    Ok(Json(store.todos.clone()))
}

async fn check_todo(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    set_completion(&db, &id, true).await
}

async fn uncheck_todo(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    set_completion(&db, &id, false).await
}

async fn set_completion(db: &Db, id: &str, completed: bool) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    let todo = store.todos.iter_mut().find(|t| t.id == id).ok_or_else(|| {
        info!(id, "bad request: todo does not exist");
        (
            StatusCode::BAD_REQUEST,
            format!("Todo with id {id} does not exist"),
        )
    })?;

    let state = if completed { "completed" } else { "not completed" };
    if todo.is_completed == completed {
        info!(id, "bad request: todo is already {state}");
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Todo \"{}\" ({}) is already {state}", todo.title, todo.id),
        ));
    }

    todo.is_completed = completed;
    todo.last_modified = chrono::Local::now()
        .naive_local()
        .format(TIMESTAMP_FORMAT)
        .to_string();
    info!(id, "todo \"{}\" marked as {state}", todo.title);
    Ok(StatusCode::NO_CONTENT)
}
