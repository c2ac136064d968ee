//! Sync controller: drives the gateway, owns the store, re-renders, notifies.
//!
//! # Design
//! Session state (store, query, phase) sits behind one mutex that is only
//! taken between awaits, never across them. Concurrent flows on the same
//! controller (refreshes and any number of toggles) therefore interleave only
//! at network boundaries, and a reader never observes a half-applied snapshot.
//!
//! Views and notifications are computed under that lock but delivered after
//! it is released, so a renderer or notifier may read the controller back.
//!
//! Local state changes only after the server confirmed the operation.

use parking_lot::Mutex;
use tracing::{error, info, warn};

use crate::error::{ApiError, Result};
use crate::filter::{select as select_todos, FilterMode, Query, SearchField};
use crate::gateway::{RemoteGateway, Transport};
use crate::store::LocalStore;
use crate::types::{List, Todo};
use crate::view::{NotificationKind, Notifier, Renderer, View};

const SYNC_OK_MESSAGE: &str = "Data fetched successfully";

/// Startup/refresh flow state.
///
/// While any refresh is in flight the phase is `Syncing`; once none are, it
/// reflects the refresh that finished last.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncPhase {
    #[default]
    Idle,
    Syncing,
    /// Both fetches resolved successfully.
    Synced,
    /// At least one fetch failed, or the refresh was dropped before both resolved.
    SyncFailed,
}

/// What one fetch did to its snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Snapshot replaced with this many records.
    Replaced(usize),
    /// Success with an empty payload; snapshot kept.
    Unchanged,
    /// Snapshot kept; the error was notified.
    Failed(ApiError),
}

impl FetchOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub lists: FetchOutcome,
    pub todos: FetchOutcome,
}

/// Result of a check/uncheck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Server confirmed; the local record now looks like this.
    Applied(Todo),
    /// The id is not in the local snapshot; nothing changed locally.
    NotFound,
    /// Server refused or could not be reached; nothing changed.
    Rejected(ApiError),
}

/// Render and notification work queued while the session lock is held.
#[derive(Debug, Default)]
struct Effects {
    view: Option<View>,
    notes: Vec<(String, NotificationKind)>,
}

impl Effects {
    fn note(message: impl Into<String>, kind: NotificationKind) -> Self {
        let mut effects = Self::default();
        effects.notify(message, kind);
        effects
    }

    fn render(&mut self, view: View) {
        self.view = Some(view);
    }

    fn notify(&mut self, message: impl Into<String>, kind: NotificationKind) {
        self.notes.push((message.into(), kind));
    }
}

#[derive(Default)]
struct Session {
    store: LocalStore,
    query: Query,
    phase: SyncPhase,
    refreshes: usize,
}

impl Session {
    fn view(&self) -> View {
        View::from(&select_todos(self.store.todos(), &self.store, &self.query))
    }

    fn apply_lists(
        &mut self,
        result: Result<Option<Vec<List>>>,
        fx: &mut Effects,
    ) -> FetchOutcome {
        match result {
            Ok(Some(lists)) => {
                info!(count = lists.len(), "lists snapshot replaced");
                let count = lists.len();
                self.store.replace_lists(lists);
                FetchOutcome::Replaced(count)
            }
            Ok(None) => FetchOutcome::Unchanged,
            Err(err) => {
                error!(%err, "fetching lists failed");
                fx.notify(err.to_string(), NotificationKind::Error);
                FetchOutcome::Failed(err)
            }
        }
    }

    fn apply_todos(
        &mut self,
        result: Result<Option<Vec<Todo>>>,
        fx: &mut Effects,
    ) -> FetchOutcome {
        let outcome = match result {
            Ok(Some(todos)) => {
                info!(count = todos.len(), "todos snapshot replaced");
                let count = todos.len();
                self.store.replace_todos(todos);
                FetchOutcome::Replaced(count)
            }
            Ok(None) => FetchOutcome::Unchanged,
            Err(err) => {
                error!(%err, "fetching todos failed");
                fx.notify(err.to_string(), NotificationKind::Error);
                return FetchOutcome::Failed(err);
            }
        };
        // Rendered with whatever lists snapshot is current right now.
        fx.render(self.view());
        fx.notify(SYNC_OK_MESSAGE, NotificationKind::Success);
        outcome
    }

    fn apply_toggle(
        &mut self,
        id: &str,
        completed: bool,
        result: Result<()>,
        fx: &mut Effects,
    ) -> ToggleOutcome {
        if let Err(err) = result {
            error!(id, completed, %err, "completion change rejected");
            fx.notify(err.to_string(), NotificationKind::Error);
            return ToggleOutcome::Rejected(err);
        }
        let Some(todo) = self.store.set_completion(id, completed).cloned() else {
            warn!(id, completed, "confirmed todo is missing from the local snapshot");
            fx.notify(not_found_message(id), NotificationKind::Warning);
            return ToggleOutcome::NotFound;
        };
        fx.render(self.view());
        let state = if completed { "completed" } else { "not completed" };
        fx.notify(
            format!("\"{}\" marked as {state}", todo.title),
            NotificationKind::Success,
        );
        ToggleOutcome::Applied(todo)
    }
}

fn not_found_message(id: &str) -> String {
    format!("Todo {id} is not in the local list, refresh to see the latest data")
}

/// Counts one in-flight refresh; the last one out publishes its phase.
struct InFlight<'a> {
    session: &'a Mutex<Session>,
    result: SyncPhase,
}

impl<'a> InFlight<'a> {
    fn enter(session: &'a Mutex<Session>) -> Self {
        let mut guard = session.lock();
        guard.refreshes += 1;
        guard.phase = SyncPhase::Syncing;
        Self {
            session,
            result: SyncPhase::SyncFailed,
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut session = self.session.lock();
        session.refreshes = session.refreshes.saturating_sub(1);
        if session.refreshes == 0 {
            session.phase = self.result;
        }
    }
}

/// Orchestrates refreshes and completion toggles for one session.
pub struct SyncController<T, R, N> {
    gateway: RemoteGateway<T>,
    session: Mutex<Session>,
    renderer: Mutex<R>,
    notifier: Mutex<N>,
}

impl<T, R, N> SyncController<T, R, N>
where
    T: Transport,
    R: Renderer,
    N: Notifier,
{
    /// Controller with an empty store and the default query.
    pub fn new(gateway: RemoteGateway<T>, renderer: R, notifier: N) -> Self {
        Self {
            gateway,
            session: Mutex::new(Session::default()),
            renderer: Mutex::new(renderer),
            notifier: Mutex::new(notifier),
        }
    }

    /// Set the initial query without rendering.
    pub fn with_query(self, query: Query) -> Self {
        self.session.lock().query = query;
        self
    }

    pub fn gateway(&self) -> &RemoteGateway<T> {
        &self.gateway
    }

    pub fn phase(&self) -> SyncPhase {
        self.session.lock().phase
    }

    pub fn query(&self) -> Query {
        self.session.lock().query.clone()
    }

    /// Read access to the store under the session lock.
    pub fn with_store<F, O>(&self, f: F) -> O
    where
        F: FnOnce(&LocalStore) -> O,
    {
        f(&self.session.lock().store)
    }

    /// The view for the current snapshot and query, without rendering it.
    pub fn view(&self) -> View {
        self.session.lock().view()
    }

    pub fn render(&self) {
        let view = self.view();
        self.show(&view);
    }

    pub fn set_query(&self, query: Query) {
        self.update_query(|q| *q = query);
    }

    pub fn set_search_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.update_query(|q| q.text = text);
    }

    pub fn set_filter(&self, filter: FilterMode) {
        self.update_query(|q| q.filter = filter);
    }

    pub fn set_search_field(&self, field: SearchField) {
        self.update_query(|q| q.field = field);
    }

    /// Fetch lists and todos concurrently and apply each as it resolves.
    pub async fn refresh(&self) -> SyncReport {
        let mut in_flight = InFlight::enter(&self.session);
        info!("sync started");

        let lists = async {
            let result = self.gateway.fetch_lists().await;
            self.apply(|session, fx| session.apply_lists(result, fx))
        };
        let todos = async {
            let result = self.gateway.fetch_todos().await;
            self.apply(|session, fx| session.apply_todos(result, fx))
        };
        let (lists, todos) = futures::join!(lists, todos);

        in_flight.result = if lists.is_failure() || todos.is_failure() {
            SyncPhase::SyncFailed
        } else {
            SyncPhase::Synced
        };
        info!(result = ?in_flight.result, "sync finished");
        drop(in_flight);

        SyncReport { lists, todos }
    }

    /// Mark `id` completed on the server, then locally.
    pub async fn check(&self, id: &str) -> ToggleOutcome {
        let result = self.gateway.mark_complete(id).await;
        self.apply(|session, fx| session.apply_toggle(id, true, result, fx))
    }

    /// Mark `id` not completed on the server, then locally.
    pub async fn uncheck(&self, id: &str) -> ToggleOutcome {
        let result = self.gateway.mark_incomplete(id).await;
        self.apply(|session, fx| session.apply_toggle(id, false, result, fx))
    }

    /// Check or uncheck depending on the cached completion flag. An id that
    /// is not cached is reported without contacting the server.
    pub async fn toggle(&self, id: &str) -> ToggleOutcome {
        let completed = self.with_store(|store| store.todo(id).map(|todo| todo.is_completed));
        match completed {
            Some(false) => self.check(id).await,
            Some(true) => self.uncheck(id).await,
            None => {
                warn!(id, "toggle requested for unknown todo");
                self.deliver(Effects::note(not_found_message(id), NotificationKind::Warning));
                ToggleOutcome::NotFound
            }
        }
    }

    /// Run `f` under the session lock, then deliver what it queued.
    fn apply<O>(&self, f: impl FnOnce(&mut Session, &mut Effects) -> O) -> O {
        let mut effects = Effects::default();
        let outcome = f(&mut *self.session.lock(), &mut effects);
        self.deliver(effects);
        outcome
    }

    fn update_query(&self, f: impl FnOnce(&mut Query)) {
        self.apply(|session, fx| {
            f(&mut session.query);
            fx.render(session.view());
        });
    }

    fn show(&self, view: &View) {
        self.renderer.lock().render(view);
    }

    fn deliver(&self, effects: Effects) {
        if let Some(view) = effects.view {
            self.show(&view);
        }
        for (message, kind) in effects.notes {
            if message.is_empty() {
                error!(?kind, "dropping notification with empty text");
                continue;
            }
            self.notifier.lock().notify(&message, kind);
        }
    }
}
