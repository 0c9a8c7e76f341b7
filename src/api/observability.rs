use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use super::AppState;
use super::identity::Identity;

pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.prometheus_handle.as_ref().map_or_else(
        || "Metrics not enabled or failed to initialize".to_string(),
        metrics_exporter_prometheus::PrometheusHandle::render,
    )
}

/// Resolves the acting user, then runs the request inside a `request` span
/// and records the HTTP metrics.
///
/// The [`Identity`] is stored in the request extensions so handlers never
/// parse the header again.
pub async fn request_middleware(mut req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();

    let identity = Identity::from_headers(req.headers());
    let identified = identity.user_id().is_some();

    let method = req.method().to_string();
    let route = metrics_route(req.extensions().get::<MatchedPath>()).to_string();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %req.uri().path(),
        route = %route,
        user_id = identity.user_id(),
    );

    req.extensions_mut().insert(identity);

    async move {
        let response = next.run(req).await;
        let status = response.status().as_u16();

        let labels = [
            ("method", method),
            ("path", route),
            ("status", status.to_string()),
            ("identified", identified.to_string()),
        ];
        metrics::counter!("http_requests_total", &labels).increment(1);
        metrics::histogram!("http_request_duration_seconds", &labels)
            .record(start.elapsed().as_secs_f64());

        info!(
            duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            status_code = status,
            outcome = outcome(status),
            "Request finished"
        );

        response
    }
    .instrument(span)
    .await
}

/// Route template for metric labels, never the raw path.
fn metrics_route(matched: Option<&MatchedPath>) -> &str {
    matched.map_or("unmatched", MatchedPath::as_str)
}

const fn outcome(status: u16) -> &'static str {
    match status {
        500.. => "error",
        400..=499 => "client_error",
        _ => "success",
    }
}
