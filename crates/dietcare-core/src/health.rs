use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;

/// Handler for `GET /healthz`. The process is up if it can answer.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Outcome of one dependency probe run by a service's readiness handler.
#[derive(Debug, Clone, Serialize)]
pub struct Probe {
    pub name: &'static str,
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct ReadinessReport {
    pub ready: bool,
    pub probes: Vec<Probe>,
}

/// Fold dependency probes into a `/readyz` response: 200 when every probe passed, 503 otherwise.
pub fn readiness(probes: Vec<Probe>) -> (StatusCode, Json<ReadinessReport>) {
    let ready = probes.iter().all(|p| p.ok);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(ReadinessReport { ready, probes }))
}
