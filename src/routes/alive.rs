//! Liveness probe for container orchestration.
//!
//! Returns 200 OK whenever the process can answer HTTP at all; it checks
//! nothing else.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AliveResponse {
    pub status: &'static str,
}

/// `GET /alive` -> `{"status":"ok"}`
pub async fn alive() -> Json<AliveResponse> {
    Json(AliveResponse { status: "ok" })
}
