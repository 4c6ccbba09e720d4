//! Classification endpoints
//!
//! - `GET  /classification` - forecast for the stored modules (conditional
//!   GET via ETag / If-None-Match)
//! - `POST /classify`       - stateless forecast for a posted module list

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::Response,
    Json,
};

use super::headers::{conditional_json, CachePolicy};
use super::SharedState;
use crate::classification::{forecast, Forecast, Module};
use crate::error::AppError;
use crate::store::ModuleInput;

const FORECAST_CACHE: CachePolicy = CachePolicy {
    max_age: 0,
    stale_while_revalidate: 30,
};

fn record(state: &SharedState, forecast: &Forecast) {
    if let Some(metrics) = state.metrics.as_ref() {
        metrics.record_forecast(forecast);
    }
}

/// `GET /classification` - forecast for the stored module list.
///
/// Returns the credit breakdown in every case; `result` is `null` unless
/// the credits satisfy the 120-240, both-levels precondition.
pub async fn stored_forecast(
    State(state): State<SharedState>,
    request_headers: HeaderMap,
) -> Result<Response, AppError> {
    let (forecast, modified_at) = {
        let store = state.store.read().await;
        (store.forecast(), store.last_modified())
    };

    let body = serde_json::to_vec(&forecast)?;
    let response = conditional_json(&request_headers, body, modified_at, FORECAST_CACHE);
    // Revalidations reuse a forecast the client already counted.
    if response.status() != StatusCode::NOT_MODIFIED {
        record(&state, &forecast);
    }
    Ok(response)
}

/// `POST /classify` - forecast for the posted modules without storing them.
///
/// Names are optional here; every other field is validated exactly as the
/// store validates it.
pub async fn classify_modules(
    State(state): State<SharedState>,
    payload: Result<Json<Vec<ModuleInput>>, JsonRejection>,
) -> Result<Json<Forecast>, AppError> {
    let Json(body) = payload?;
    let modules = body
        .iter()
        .map(ModuleInput::validate_module)
        .collect::<Result<Vec<Module>, _>>()?;

    let forecast = forecast(&modules);
    record(&state, &forecast);
    Ok(Json(forecast))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::api::{api_router, ApiState};
    use crate::metrics::AppMetrics;
    use crate::store::ModuleInput;

    fn make_app(modules: &[(i64, i64, i64)]) -> Router {
        let state = ApiState::in_memory();
        {
            let mut store = state.store.try_write().unwrap();
            for (i, &(level, credits, grade)) in modules.iter().enumerate() {
                let fields = ModuleInput {
                    name: format!("M{i}"),
                    level,
                    credits,
                    grade,
                }
                .validate()
                .unwrap();
                store.add(fields);
            }
        }
        api_router(Arc::new(state))
    }

    async fn body_json(body: Body) -> serde_json::Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn stored_forecast_returns_result_when_eligible() {
        let app = make_app(&[(3, 60, 1), (3, 60, 1), (2, 60, 1), (2, 60, 1)]);
        let resp = app.oneshot(get("/classification")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key(header::ETAG));
        let json = body_json(resp.into_body()).await;
        assert_eq!(json["eligibility"]["status"], "eligible");
        assert_eq!(json["result"]["weighted_score"], 360);
        assert_eq!(json["result"]["qa_score"], 60);
        assert_eq!(json["result"]["classification"], "1st");
        assert_eq!(json["credits"]["total"], 240);
    }

    #[tokio::test]
    async fn stored_forecast_explains_missing_level() {
        let app = make_app(&[(3, 60, 1), (3, 60, 1), (3, 30, 2)]);
        let resp = app.oneshot(get("/classification")).await.unwrap();

        let json = body_json(resp.into_body()).await;
        assert_eq!(json["eligibility"]["status"], "missing_level2");
        assert!(json["result"].is_null());
        assert!(json["message"].as_str().unwrap().contains("Add Level 2 modules"));
    }

    #[tokio::test]
    async fn stored_forecast_honours_if_none_match() {
        let app = make_app(&[(3, 60, 2), (2, 60, 2)]);
        let first = app.clone().oneshot(get("/classification")).await.unwrap();
        let etag = first.headers()[header::ETAG].clone();

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/classification")
                    .header(header::IF_NONE_MATCH, etag)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn classify_is_stateless() {
        let app = make_app(&[]);
        let req = Request::builder()
            .method(Method::POST)
            .uri("/classify")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"[
                    {"level":3,"credits":60,"grade":4},
                    {"level":3,"credits":60,"grade":4},
                    {"level":2,"credits":60,"grade":4},
                    {"level":2,"credits":60,"grade":4}
                ]"#,
            ))
            .unwrap();

        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp.into_body()).await;
        assert_eq!(json["result"]["weighted_score"], 1440);
        assert_eq!(json["result"]["classification"], "3rd");

        let stored = app.oneshot(get("/classification")).await.unwrap();
        let json = body_json(stored.into_body()).await;
        assert_eq!(json["eligibility"]["status"], "no_modules");
    }

    #[tokio::test]
    async fn revalidated_forecast_is_not_counted_again() {
        let metrics = Arc::new(AppMetrics::new().unwrap());
        let mut state = ApiState::in_memory();
        state.metrics = Some(metrics.clone());
        let app = api_router(Arc::new(state));

        let first = app.clone().oneshot(get("/classification")).await.unwrap();
        let etag = first.headers()[header::ETAG].clone();

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/classification")
                    .header(header::IF_NONE_MATCH, etag)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
        assert!((metrics.forecasts_suppressed_total.get() - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn classify_rejects_malformed_body_as_json() {
        let app = make_app(&[]);
        let req = Request::builder()
            .method(Method::POST)
            .uri("/classify")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"level":3,"credits":60,"grade":1}"#))
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp.into_body()).await;
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn classify_rejects_bad_grade() {
        let app = make_app(&[]);
        let req = Request::builder()
            .method(Method::POST)
            .uri("/classify")
            .header("content-type", "application/json")
            .body(Body::from(r#"[{"level":3,"credits":60,"grade":0}]"#))
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp.into_body()).await;
        assert!(json["error"].as_str().unwrap().contains("Grade"));
    }
}
