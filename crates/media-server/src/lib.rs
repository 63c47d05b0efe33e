//! HTTP API for the media catalog.
//!
//! Routes:
//!
//! | Method | Path                    | Handler              |
//! |--------|-------------------------|----------------------|
//! | GET    | `/media`                | list all entries     |
//! | POST   | `/media`                | create an entry      |
//! | GET    | `/media/search?name=X`  | first entry named X  |
//! | GET    | `/media/category/{cat}` | entries in category  |
//! | GET    | `/media/{id}`           | entry by id          |
//! | DELETE | `/media/{id}`           | delete entry by id   |
//!
//! The store is injected through [`AppState`]; handlers hold no state of
//! their own.

mod error;
mod handlers;

use std::future::Future;
use std::io;
use std::sync::Arc;

use anyhow::anyhow;
use axum::{routing::get, Router};
use media_core::{Config, Store};
use tokio::net::TcpListener;
use tokio::sync::RwLock;

pub use error::{ApiError, ErrorResponse};
pub use handlers::{DeleteResponse, EntryLookup, SearchParams};

/// Shared handler state
///
/// Reads take the lock shared; adds and deletes take it exclusively, so
/// catalog saves never interleave.
#[derive(Clone)]
pub struct AppState {
    store: Arc<RwLock<Store>>,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Handle on the shared store
    pub fn store(&self) -> &Arc<RwLock<Store>> {
        &self.store
    }
}

/// Open the configured catalog for serving
///
/// A failure names the file and, where one exists, what to do about it.
pub fn open_store(config: &Config) -> anyhow::Result<Store> {
    Store::open_with_config(config).map_err(|e| match e.recovery_suggestion() {
        Some(hint) => anyhow!("{}\n  hint: {}", e, hint),
        None => anyhow!("{}", e),
    })
}

/// Build the HTTP API router around the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/media",
            get(handlers::list_all).post(handlers::create_entry),
        )
        .route("/media/search", get(handlers::search_by_name))
        .route("/media/category/{category}", get(handlers::list_by_category))
        .route(
            "/media/{id}",
            get(handlers::get_entry).delete(handlers::delete_entry),
        )
        .with_state(state)
}

/// Serve the API on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
