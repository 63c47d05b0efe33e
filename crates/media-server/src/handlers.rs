//! Request handlers for the `/media` routes

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use media_core::{Entry, NewEntry};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::AppState;

/// Body of single-entry lookups: the entry, or `{}` when nothing matched
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum EntryLookup {
    Found(Entry),
    Empty {},
}

impl From<Option<Entry>> for EntryLookup {
    fn from(entry: Option<Entry>) -> Self {
        match entry {
            Some(entry) => EntryLookup::Found(entry),
            None => EntryLookup::Empty {},
        }
    }
}

impl EntryLookup {
    pub fn into_entry(self) -> Option<Entry> {
        match self {
            EntryLookup::Found(entry) => Some(entry),
            EntryLookup::Empty {} => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Query string of `/media/search`; a missing name searches for ""
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub name: String,
}

pub(crate) async fn list_all(State(state): State<AppState>) -> Json<Vec<Entry>> {
    let entries = state.store().read().await.get_all();
    debug!(count = entries.len(), "GET /media");
    Json(entries)
}

pub(crate) async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Json<Vec<Entry>> {
    let entries = state.store().read().await.get_by_category(&category);
    debug!(%category, count = entries.len(), "GET /media/category");
    Json(entries)
}

pub(crate) async fn search_by_name(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<EntryLookup> {
    let entry = state.store().read().await.get_by_name(&params.name);
    debug!(name = %params.name, found = entry.is_some(), "GET /media/search");
    Json(entry.into())
}

pub(crate) async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<EntryLookup> {
    let entry = state.store().read().await.get_by_id(&id);
    debug!(%id, found = entry.is_some(), "GET /media/{{id}}");
    Json(entry.into())
}

pub(crate) async fn create_entry(
    State(state): State<AppState>,
    payload: Result<Json<NewEntry>, JsonRejection>,
) -> Result<(StatusCode, Json<Entry>), ApiError> {
    let Json(new) = payload.map_err(|rejection| {
        debug!(error = %rejection, "Rejected create body");
        ApiError::MissingFields
    })?;

    let mut store = state.store().clone().write_owned().await;
    let entry = tokio::task::spawn_blocking(move || store.add(new)).await??;
    info!(id = %entry.id, name = %entry.name, "Created entry");
    Ok((StatusCode::CREATED, Json(entry)))
}

pub(crate) async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<DeleteResponse>), ApiError> {
    let mut store = state.store().clone().write_owned().await;
    let target = id.clone();
    let success = tokio::task::spawn_blocking(move || store.delete_by_id(&target)).await??;

    let status = if success {
        info!(%id, "Deleted entry");
        StatusCode::OK
    } else {
        debug!(%id, "Delete of unknown entry");
        StatusCode::NOT_FOUND
    };

    Ok((status, Json(DeleteResponse { success })))
}
