use crate::infra::{AppState, InMemoryAdvisoryService};
use axum::http::{header, StatusCode};
use axum::middleware::from_fn_with_state;
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use invest_sim::advisory::advisory_router;
use invest_sim::usage::{track_usage, usage_router, UsageTracker};
use serde_json::json;
use std::sync::Arc;

/// Advisory and telemetry endpoints plus the operational probes, with usage tracking applied.
pub(crate) fn with_advisory_routes(
    service: Arc<InMemoryAdvisoryService>,
    tracker: Arc<UsageTracker>,
) -> axum::Router {
    advisory_router(service)
        .merge(usage_router(tracker.clone()))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .layer(from_fn_with_state(tracker, track_usage))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{build_service, DEMO_CLIENT};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::{TimeZone, Utc};
    use invest_sim::clock::{Clock, FixedClock};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn clock() -> Arc<dyn Clock> {
        let now = Utc
            .with_ymd_and_hms(2025, 11, 20, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        Arc::new(FixedClock(now))
    }

    fn state(ready: bool) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
        }
    }

    fn app(ready: bool) -> axum::Router {
        let clock = clock();
        let service = build_service(true, clock.clone()).expect("service builds");
        let tracker = Arc::new(UsageTracker::new(clock));
        with_advisory_routes(Arc::new(service), tracker).layer(Extension(state(ready)))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json payload")
    }

    #[tokio::test]
    async fn readiness_reflects_the_startup_flag() {
        let response = app(false)
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["status"], "initializing");

        let response = app(true)
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn demo_client_profile_is_served() {
        let uri = format!("/api/v1/risk-profile/{}", DEMO_CLIENT.0);
        let response = app(true)
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["profile"], "Moderate");
        assert_eq!(body["score"], 60);
    }

    #[tokio::test]
    async fn probes_are_left_out_of_usage_telemetry() {
        let router = app(true);
        router
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        router
            .clone()
            .oneshot(
                Request::get("/api/v1/recommended-products/conservative")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let response = router
            .oneshot(Request::get("/api/v1/telemetry").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = body_json(response).await;
        let services = body["services"].as_array().expect("services listed");
        assert_eq!(services.len(), 1);
        assert_eq!(
            services[0]["name"],
            "GET /api/v1/recommended-products/:profile"
        );
        assert_eq!(services[0]["calls"], 1);
    }
}
