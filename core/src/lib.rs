//! Client core for the doable todo service.
//!
//! # Overview
//! Pulls lists and todos from the REST API into an in-memory [`LocalStore`],
//! applies confirmed check/uncheck operations to it, and turns the snapshot
//! plus the user's filter/search selection into a renderable [`View`].
//!
//! # Design
//! - `ApiClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values without I/O; `RemoteGateway` runs them over a `Transport`.
//! - `LocalStore` is the only owner of the snapshots.
//! - `filter::select` is pure; `View` is its owned, markup-free form.
//! - `SyncController` sequences the flows and talks to the `Renderer` and
//!   `Notifier` collaborators.

pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod http;
pub mod logging;
pub mod store;
pub mod sync;
pub mod types;
pub mod view;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, Result};
pub use filter::{select, EmptyReason, FilterMode, ListLabel, Match, Query, SearchField, Selection};
pub use gateway::{RemoteGateway, ReqwestTransport, Transport};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use store::{ListIndex, LocalStore};
pub use sync::{FetchOutcome, SyncController, SyncPhase, SyncReport, ToggleOutcome};
pub use types::{List, Todo};
pub use view::{Badge, DisplayRecord, NotificationKind, Notifier, Renderer, ToggleAction, View};
