use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Off until [`init_metrics`] has installed a recorder.
pub fn is_observability_enabled() -> bool {
    OBSERVABILITY_ENABLED.get().copied().unwrap_or(false)
}

/// Installs the Prometheus recorder and its upkeep task. Returns `None` when
/// observability is switched off.
pub fn init_metrics(enabled: bool) -> Result<Option<PrometheusHandle>, BuildError> {
    if !enabled {
        let _ = OBSERVABILITY_ENABLED.set(false);
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5,
                10.0,
            ],
        )?
        .install_recorder()?;

    let _ = OBSERVABILITY_ENABLED.set(true);

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Ok(Some(handle))
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16();

    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status.to_string()).increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path).record(latency);

    let status_category = match status {
        200..=299 => "2xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    };
    counter!("http_requests_by_status", "status_category" => status_category).increment(1);

    gauge!("http_requests_active").decrement(1.0);

    response
}

/// Router for the separate metrics listener.
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

// Business metrics

pub fn track_user_registered() {
    if !is_observability_enabled() {
        return;
    }
    counter!("users_registered_total").increment(1);
}

pub fn track_user_login_success() {
    if !is_observability_enabled() {
        return;
    }
    counter!("user_logins_total", "status" => "success").increment(1);
}

pub fn track_user_login_failure(reason: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("user_logins_total", "status" => "failure", "reason" => reason).increment(1);
}

pub fn track_jwt_issued() {
    if !is_observability_enabled() {
        return;
    }
    counter!("jwt_tokens_issued_total").increment(1);
}

/// `reason` is either "expired" or "invalid".
pub fn track_jwt_rejected(reason: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("jwt_validations_total", "status" => reason).increment(1);
}

pub fn track_book_created() {
    if !is_observability_enabled() {
        return;
    }
    counter!("books_created_total").increment(1);
}

pub fn track_category_created() {
    if !is_observability_enabled() {
        return;
    }
    counter!("categories_created_total").increment(1);
}

pub fn track_read_logged(rating: i32) {
    if !is_observability_enabled() {
        return;
    }
    counter!("reads_logged_total", "rating" => rating.to_string()).increment(1);
}

pub fn track_avatar_uploaded(bytes: usize) {
    if !is_observability_enabled() {
        return;
    }
    counter!("avatars_uploaded_total").increment(1);
    histogram!("avatar_upload_bytes").record(bytes as f64);
}
