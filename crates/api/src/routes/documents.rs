use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use quill_core::repo::DocumentFilter;
use quill_core::Document;

use super::{content_range_value, range_from_headers};
use crate::error::ApiResult;
use crate::state::AppState;

/// Unit used in `Range` / `Content-Range` headers on document listings.
const RANGE_UNIT: &str = "documents";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/documents", get(list).post(create))
        .route("/documents/{id}", get(by_id).put(update).delete(remove))
        .route("/documents/{id}/versions/{version}", get(by_id_version))
}

#[derive(Debug, Default, Deserialize)]
struct ListParams {
    /// Only documents of this class.
    class_id: Option<String>,
    /// Only children of this document; empty selects root documents.
    parent_id: Option<String>,
}

/// List current document revisions, optionally filtered by class or parent.
async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let filter = DocumentFilter {
        class_id: params.class_id,
        parent_id: params.parent_id,
        range: range_from_headers(&headers, RANGE_UNIT)?,
    };

    let (documents, range) = state.documents().list(&filter).await?;

    let (name, value) = content_range_value(&range, RANGE_UNIT)?;
    let mut response = Json(documents).into_response();
    response.headers_mut().insert(name, value);
    Ok(response)
}

/// Create version 1 of a document. The stored version is echoed back.
async fn create(
    State(state): State<AppState>,
    Json(mut doc): Json<Document>,
) -> ApiResult<impl IntoResponse> {
    state.documents().create(&mut doc).await?;
    Ok((StatusCode::CREATED, Json(doc)))
}

/// Fetch the current (highest-version) revision.
async fn by_id(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Document>> {
    Ok(Json(state.documents().by_id(&id).await?))
}

async fn by_id_version(
    State(state): State<AppState>,
    Path((id, version)): Path<(String, i64)>,
) -> ApiResult<Json<Document>> {
    Ok(Json(state.documents().by_id_version(&id, version).await?))
}

/// Append a new revision; the response carries the new version number.
async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut doc): Json<Document>,
) -> ApiResult<Json<Document>> {
    doc.id = id;
    state.documents().update(&mut doc).await?;
    Ok(Json(doc))
}

/// Remove the logical document, all versions included.
async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.documents().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
