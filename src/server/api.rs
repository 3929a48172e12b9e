//! Read-only queries and directory creation. Every filesystem call runs on the blocking pool.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio::task;

use crate::core::errors::{Error, Result};
use crate::models::file_entry::DirectoryEntry;
use crate::server::AppState;
use crate::services::fs::listing::{self, ListParams};
use crate::services::fs::mkdir;
use crate::services::fs::resolve::resolve_dir;

#[derive(Debug, Deserialize)]
pub struct PathQuery {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub path: String,
    #[serde(default)]
    pub filter_single_link: bool,
    #[serde(default)]
    pub include_parent: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateDirQuery {
    pub path: String,
    pub name: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DefaultDir {
    pub dir: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CreatedDir {
    pub path: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Refreshed {
    pub cleared: usize,
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(f)
        .await
        .map_err(|err| Error::Other(format!("blocking task failed: {err}")))?
}

pub async fn default_dir(State(state): State<AppState>) -> Result<Json<DefaultDir>> {
    let raw = state.config.default_dir.to_string_lossy().into_owned();
    let dir = blocking(move || resolve_dir(&raw)).await?;
    Ok(Json(DefaultDir {
        dir: dir.to_string_lossy().into_owned(),
    }))
}

pub async fn list_dir(Query(query): Query<ListQuery>) -> Result<Json<Vec<DirectoryEntry>>> {
    let entries = listing::list_dir(ListParams {
        path: &query.path,
        filter_single_link: query.filter_single_link,
        include_parent: query.include_parent,
    })
    .await?;
    Ok(Json(entries))
}

/// Route name the browser client uses for its "filter source" toggle.
pub async fn filter_dir(Query(query): Query<PathQuery>) -> Result<Json<Vec<DirectoryEntry>>> {
    list_dir(Query(ListQuery {
        path: query.path,
        filter_single_link: true,
        include_parent: false,
    }))
    .await
}

pub async fn dir_size(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<Json<String>> {
    let sizes = state.sizes.clone();
    let size = blocking(move || sizes.size_of(&query.path)).await?;
    Ok(Json(size))
}

pub async fn create_dir(Query(query): Query<CreateDirQuery>) -> Result<Json<CreatedDir>> {
    let created = blocking(move || mkdir::create_dir(&query.path, &query.name)).await?;
    Ok(Json(CreatedDir {
        path: created.to_string_lossy().into_owned(),
    }))
}

pub async fn refresh(State(state): State<AppState>) -> Result<Json<Refreshed>> {
    let cleared = state.sizes.clear()?;
    Ok(Json(Refreshed { cleared }))
}
