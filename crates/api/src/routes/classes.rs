use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use quill_core::repo::ClassFilter;
use quill_core::Class;

use super::{content_range_value, range_from_headers};
use crate::error::ApiResult;
use crate::state::AppState;

/// Unit used in `Range` / `Content-Range` headers on class listings.
const RANGE_UNIT: &str = "classes";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/classes", get(list).post(create))
        .route("/classes/{id}", get(by_id).put(update).delete(remove))
}

/// List classes. The page is selected with a `Range: classes=<start>-<end>`
/// header; the response reports the fulfilled window and collection size in
/// `Content-Range`.
async fn list(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    let filter = ClassFilter {
        range: range_from_headers(&headers, RANGE_UNIT)?,
    };

    let (classes, range) = state.classes().list(&filter).await?;

    let (name, value) = content_range_value(&range, RANGE_UNIT)?;
    let mut response = Json(classes).into_response();
    response.headers_mut().insert(name, value);
    Ok(response)
}

async fn create(
    State(state): State<AppState>,
    Json(mut class): Json<Class>,
) -> ApiResult<impl IntoResponse> {
    state.classes().create(&mut class).await?;
    Ok((StatusCode::CREATED, Json(class)))
}

async fn by_id(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Class>> {
    Ok(Json(state.classes().by_id(&id).await?))
}

/// The path id wins over whatever id the body carries.
async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut class): Json<Class>,
) -> ApiResult<Json<Class>> {
    class.id = id;
    state.classes().update(&mut class).await?;
    Ok(Json(class))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.classes().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
