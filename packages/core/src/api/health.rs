use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
};

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, [(header::CACHE_CONTROL, "no-store")], "ok")
}
