pub mod classes;
pub mod documents;
pub mod health;

use axum::http::header::{HeaderMap, HeaderValue, CONTENT_RANGE, RANGE};
use axum::Router;

use quill_core::Range;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(classes::routes())
        .merge(documents::routes())
        .with_state(state)
}

/// Last position of the default first page served when no window is asked
/// for.
const DEFAULT_PAGE_END: usize = 9;

/// Resolve the requested pagination window from an optional `Range` header.
/// An absent header leaves the range at its zero value, which stands for
/// the default first page, so it expands to `0-9`. A malformed header maps
/// to 416, matching the error the repository raises for an unsatisfiable
/// window.
fn range_from_headers(headers: &HeaderMap, unit: &str) -> ApiResult<Range> {
    let mut range = Range::default();
    if let Some(value) = headers.get(RANGE) {
        let value = value
            .to_str()
            .map_err(|_| ApiError::RangeNotSatisfiable("malformed range header".to_string()))?;
        range.parse_header(value, unit)?;
    }
    if range.is_zero() {
        range.end = DEFAULT_PAGE_END;
    }
    Ok(range)
}

/// Render the resolved window as a `Content-Range` header value.
fn content_range_value(range: &Range, unit: &str) -> ApiResult<(axum::http::HeaderName, HeaderValue)> {
    let value = HeaderValue::from_str(&range.content_range_header(unit))
        .map_err(|e| ApiError::Internal(format!("invalid content-range header: {e}")))?;
    Ok((CONTENT_RANGE, value))
}
