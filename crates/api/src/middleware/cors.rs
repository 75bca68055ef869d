use axum::http::header::{AUTHORIZATION, CONTENT_RANGE, CONTENT_TYPE, RANGE};
use tower_http::cors::{Any, CorsLayer};

/// Build the CORS layer. Any origin for development; the `Range` request
/// header must be allowed and `Content-Range` exposed or browser clients
/// cannot paginate list endpoints.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([CONTENT_TYPE, RANGE, AUTHORIZATION])
        .expose_headers([CONTENT_RANGE])
}
