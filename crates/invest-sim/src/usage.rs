//! Per-endpoint call counts and response times exposed at `/api/v1/telemetry`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;

pub const TELEMETRY_PATH: &str = "/api/v1/telemetry";

const IGNORED_PREFIXES: [&str; 4] = [TELEMETRY_PATH, "/metrics", "/health", "/ready"];

#[derive(Debug, Default, Clone, Copy)]
struct EndpointStats {
    calls: u64,
    total_ms: u64,
}

/// Thread-safe accumulator of request timings keyed by endpoint.
pub struct UsageTracker {
    stats: Mutex<HashMap<String, EndpointStats>>,
    started_on: NaiveDate,
    clock: Arc<dyn Clock>,
}

impl UsageTracker {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            stats: Mutex::new(HashMap::new()),
            started_on: clock.today(),
            clock,
        }
    }

    pub fn record(&self, endpoint: &str, elapsed_ms: u64) {
        let mut guard = self.stats.lock().expect("usage mutex poisoned");
        let entry = guard.entry(endpoint.to_string()).or_default();
        entry.calls += 1;
        entry.total_ms += elapsed_ms;
    }

    pub fn report(&self) -> UsageReport {
        let guard = self.stats.lock().expect("usage mutex poisoned");
        let mut services: Vec<EndpointUsage> = guard
            .iter()
            .map(|(name, stats)| EndpointUsage {
                name: name.clone(),
                calls: stats.calls,
                average_response_ms: stats.total_ms.checked_div(stats.calls).unwrap_or(0),
            })
            .collect();
        services.sort_by(|left, right| left.name.cmp(&right.name));

        UsageReport {
            services,
            period: UsagePeriod {
                start: self.started_on,
                end: self.clock.today(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointUsage {
    pub name: String,
    pub calls: u64,
    pub average_response_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsagePeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageReport {
    pub services: Vec<EndpointUsage>,
    pub period: UsagePeriod,
}

fn is_ignored(path: &str) -> bool {
    let path = path.to_ascii_lowercase();
    path.contains("favicon") || IGNORED_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Middleware timing every routed request that is not an operational endpoint.
///
/// Requests that matched no route carry no [`MatchedPath`] and are not recorded, so the
/// report only ever holds route templates.
pub async fn track_usage(
    State(tracker): State<Arc<UsageTracker>>,
    request: Request,
    next: Next,
) -> Response {
    if is_ignored(request.uri().path()) {
        return next.run(request).await;
    }
    let Some(endpoint) = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
    else {
        return next.run(request).await;
    };
    let method = request.method().clone();

    let started = Instant::now();
    let response = next.run(request).await;
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    tracker.record(&format!("{method} {endpoint}"), elapsed_ms);
    response
}

pub fn usage_router(tracker: Arc<UsageTracker>) -> Router {
    Router::new()
        .route(TELEMETRY_PATH, get(usage_handler))
        .with_state(tracker)
}

async fn usage_handler(State(tracker): State<Arc<UsageTracker>>) -> Json<UsageReport> {
    Json(tracker.report())
}
