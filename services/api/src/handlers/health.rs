use axum::{Json, extract::State, http::StatusCode};

use dietcare_core::health::{Probe, ReadinessReport, readiness};

use crate::state::AppState;

// ── GET /readyz ──────────────────────────────────────────────────────────────

/// Ready when both the database and the session store answer.
pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<ReadinessReport>) {
    let database = state.db.ping().await.is_ok();
    let sessions = state.session_store().ping().await;
    readiness(vec![
        Probe {
            name: "database",
            ok: database,
        },
        Probe {
            name: "session_store",
            ok: sessions,
        },
    ])
}
